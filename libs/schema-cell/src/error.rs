use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::AppError;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Table {table} references {parent}, which is not declared")]
    MissingParent { table: String, parent: String },

    #[error("Failed to declare {object}: {source}")]
    Declaration { object: String, source: DatabaseError },

    #[error("Failed to create index {index}: {source}")]
    Index { index: String, source: DatabaseError },

    #[error("Failed to replace view {view}: {source}")]
    View { view: String, source: DatabaseError },

    #[error("Catalog lookup failed: {0}")]
    Catalog(#[from] DatabaseError),
}

impl SchemaError {
    fn database_source(&self) -> Option<&DatabaseError> {
        match self {
            SchemaError::MissingParent { .. } => None,
            SchemaError::Declaration { source, .. }
            | SchemaError::Index { source, .. }
            | SchemaError::View { source, .. } => Some(source),
            SchemaError::Catalog(source) => Some(source),
        }
    }
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        match err.database_source() {
            Some(DatabaseError::Connection(_)) => AppError::Connection(err.to_string()),
            _ => AppError::Schema(err.to_string()),
        }
    }
}
