use std::collections::HashSet;

use tracing::{debug, info, instrument};

use shared_database::DatabaseHandle;

use crate::error::SchemaError;
use crate::hospital::hospital_tables;
use crate::models::TableDefinition;

pub struct SchemaService<'a> {
    db: &'a DatabaseHandle,
}

impl<'a> SchemaService<'a> {
    pub fn new(db: &'a DatabaseHandle) -> Self {
        Self { db }
    }

    /// Declares the six hospital tables. Safe to call against a schema that already
    /// holds some or all of them.
    pub async fn provision(&self) -> Result<Vec<&'static str>, SchemaError> {
        self.provision_tables(&hospital_tables()).await
    }

    /// Issues `CREATE TABLE IF NOT EXISTS` for each table in order. A foreign key must
    /// point at a table declared earlier in `tables` or already present in the engine;
    /// otherwise the run stops with [`SchemaError::MissingParent`] before the statement
    /// is sent.
    #[instrument(skip_all, fields(dialect = self.db.dialect().name(), tables = tables.len()))]
    pub async fn provision_tables(
        &self,
        tables: &[TableDefinition],
    ) -> Result<Vec<&'static str>, SchemaError> {
        let mut declared: HashSet<&'static str> = HashSet::new();
        let mut provisioned = Vec::with_capacity(tables.len());

        for table in tables {
            for parent in table.parents() {
                if declared.contains(parent) {
                    continue;
                }
                if !self.db.table_exists(parent).await? {
                    return Err(SchemaError::MissingParent {
                        table: table.name.to_string(),
                        parent: parent.to_string(),
                    });
                }
            }

            let statement = table.create_statement(self.db.dialect());
            self.db
                .execute(&statement)
                .await
                .map_err(|source| SchemaError::Declaration {
                    object: table.name.to_string(),
                    source,
                })?;

            debug!("Table {} declared", table.name);
            declared.insert(table.name);
            provisioned.push(table.name);
        }

        info!("Tables with constraints created: {}", provisioned.join(", "));
        Ok(provisioned)
    }
}
