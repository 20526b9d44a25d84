use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Uniqueness violation: {0}")]
    UniquenessViolation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    /// Only a uniqueness collision can succeed on a second attempt, and only with a
    /// freshly generated batch.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::UniquenessViolation(_))
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::Connection(_) => 3,
            AppError::Schema(_) => 4,
            AppError::UniquenessViolation(_) => 5,
            AppError::Database(_) => 6,
            AppError::Export(_) => 7,
        }
    }

    pub fn report(&self) {
        let category = match self {
            AppError::Config(_) => "config",
            AppError::Connection(_) => "connection",
            AppError::Schema(_) => "schema",
            AppError::UniquenessViolation(_) => "uniqueness",
            AppError::Database(_) => "database",
            AppError::Export(_) => "export",
        };

        tracing::error!(category, retryable = self.is_retryable(), "Error: {}", self);
    }
}
