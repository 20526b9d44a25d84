use chrono::NaiveDate;
use thiserror::Error;

use shared_database::DatabaseError;
use shared_models::AppError;

#[derive(Error, Debug)]
pub enum PatientError {
    #[error("Patient batch rejected by a uniqueness constraint: {0}")]
    UniquenessViolation(String),

    #[error("Invalid patient record: {0}")]
    InvalidRecord(String),

    #[error("Reference pool `{0}` is empty")]
    EmptyPool(&'static str),

    #[error("Birth date range {start}..={end} is empty")]
    InvalidBirthDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Could not draw {requested} patients with distinct contact details (stopped at {generated})")]
    ContactSpaceExhausted { requested: usize, generated: usize },

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for PatientError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation(msg) => PatientError::UniquenessViolation(msg),
            other => PatientError::Database(other),
        }
    }
}

impl From<sqlx::Error> for PatientError {
    fn from(err: sqlx::Error) -> Self {
        DatabaseError::from(err).into()
    }
}

impl From<PatientError> for AppError {
    fn from(err: PatientError) -> Self {
        match err {
            PatientError::UniquenessViolation(msg) => AppError::UniquenessViolation(msg),
            PatientError::Database(db_err) => db_err.into(),
            PatientError::InvalidRecord(_) => AppError::Database(err.to_string()),
            PatientError::EmptyPool(_)
            | PatientError::InvalidBirthDateRange { .. }
            | PatientError::ContactSpaceExhausted { .. } => AppError::Config(err.to_string()),
        }
    }
}
