use serde::Serialize;
use tracing::{debug, info, instrument};

use shared_database::{DatabaseError, DatabaseHandle};

use crate::error::SchemaError;
use crate::hospital::hospital_indexes;
use crate::models::IndexDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexOutcome {
    Created,
    AlreadyPresent,
}

pub struct IndexService<'a> {
    db: &'a DatabaseHandle,
}

impl<'a> IndexService<'a> {
    pub fn new(db: &'a DatabaseHandle) -> Self {
        Self { db }
    }

    pub async fn provision(&self) -> Result<Vec<(&'static str, IndexOutcome)>, SchemaError> {
        let mut outcomes = Vec::new();

        for index in hospital_indexes() {
            let outcome = self.ensure_index(&index).await?;
            outcomes.push((index.name, outcome));
        }

        info!("Indexes created or already exist");
        Ok(outcomes)
    }

    /// Looks the index up by name and table in the catalog and creates it only when
    /// absent, then checks the catalog again. SQLite index names are global, so an
    /// index of the same name on another table turns `IF NOT EXISTS` into a no-op;
    /// that case is an error rather than a silent skip.
    /// Single writer only: two concurrent provisioners could both miss it.
    #[instrument(skip_all, fields(index = index.name, table = index.table))]
    pub async fn ensure_index(&self, index: &IndexDefinition) -> Result<IndexOutcome, SchemaError> {
        if self.db.index_exists(index.table, index.name).await? {
            debug!("Index {} already present", index.name);
            return Ok(IndexOutcome::AlreadyPresent);
        }

        let statement = index.create_statement(self.db.dialect());
        self.db
            .execute(&statement)
            .await
            .map_err(|source| SchemaError::Index {
                index: index.name.to_string(),
                source,
            })?;

        if !self.db.index_exists(index.table, index.name).await? {
            return Err(SchemaError::Index {
                index: index.name.to_string(),
                source: DatabaseError::Query(format!(
                    "name is already taken by an index outside {}",
                    index.table
                )),
            });
        }

        debug!("Index {} created on {}({})", index.name, index.table, index.column);
        Ok(IndexOutcome::Created)
    }
}
