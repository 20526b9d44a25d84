use std::path::PathBuf;

use thiserror::Error;

use patient_cell::PatientError;
use shared_models::AppError;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot create export folder {}: {source}", .path.display())]
    Folder {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {message}", .path.display())]
    Write { path: PathBuf, message: String },

    #[error("Failed to read patients for export: {0}")]
    Read(#[from] PatientError),
}

impl ExportError {
    pub fn write(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        ExportError::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        AppError::Export(err.to_string())
    }
}
