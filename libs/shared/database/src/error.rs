use thiserror::Error;

use shared_models::AppError;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unsupported database URL: {0}")]
    UnsupportedUrl(String),

    #[error("Invalid identifier `{0}`")]
    InvalidIdentifier(String),
}

impl DatabaseError {
    pub fn connection(err: sqlx::Error) -> Self {
        DatabaseError::Connection(err.to_string())
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation(_))
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DatabaseError::UniqueViolation(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                DatabaseError::ForeignKeyViolation(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                DatabaseError::CheckViolation(db_err.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => DatabaseError::Connection(err.to_string()),
            _ => DatabaseError::Query(err.to_string()),
        }
    }
}

impl From<DatabaseError> for AppError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Connection(msg) => AppError::Connection(msg),
            DatabaseError::UnsupportedUrl(_) | DatabaseError::InvalidIdentifier(_) => {
                AppError::Config(err.to_string())
            }
            DatabaseError::UniqueViolation(msg) => AppError::UniquenessViolation(msg),
            other => AppError::Database(other.to_string()),
        }
    }
}
