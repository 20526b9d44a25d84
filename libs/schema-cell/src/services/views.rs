use tracing::{debug, info};

use shared_database::DatabaseHandle;

use crate::error::SchemaError;
use crate::hospital::hospital_views;
use crate::models::ViewDefinition;

pub struct ViewService<'a> {
    db: &'a DatabaseHandle,
}

impl<'a> ViewService<'a> {
    pub fn new(db: &'a DatabaseHandle) -> Self {
        Self { db }
    }

    pub async fn provision(&self) -> Result<Vec<&'static str>, SchemaError> {
        let mut replaced = Vec::new();

        for view in hospital_views() {
            self.replace_view(&view).await?;
            replaced.push(view.name);
        }

        info!("Views created");
        Ok(replaced)
    }

    /// Redefines the view unconditionally; no catalog check is needed.
    pub async fn replace_view(&self, view: &ViewDefinition) -> Result<(), SchemaError> {
        let statements = view.replace_statements(self.db.dialect());

        self.db
            .execute_in_transaction(&statements)
            .await
            .map_err(|source| SchemaError::View {
                view: view.name.to_string(),
                source,
            })?;

        debug!("View {} replaced", view.name);
        Ok(())
    }
}
