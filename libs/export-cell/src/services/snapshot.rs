use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};

use patient_cell::PatientService;
use shared_database::DatabaseHandle;

use crate::error::ExportError;
use crate::models::{ExportTarget, GenderDistribution, PatientSnapshot};

/// Serialization sink for a patient snapshot: rows in, one file out.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotSink {
    fn write_snapshot(&self, path: &Path, snapshot: &PatientSnapshot) -> Result<(), ExportError>;
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub path: PathBuf,
    pub rows: usize,
    pub distribution: GenderDistribution,
    pub snapshot: PatientSnapshot,
}

pub struct ExportService<'a, S> {
    db: &'a DatabaseHandle,
    sink: S,
    target: ExportTarget,
}

impl<'a, S: SnapshotSink> ExportService<'a, S> {
    pub fn new(db: &'a DatabaseHandle, sink: S, target: ExportTarget) -> Self {
        Self { db, sink, target }
    }

    pub fn target(&self) -> &ExportTarget {
        &self.target
    }

    pub async fn load_snapshot(&self) -> Result<PatientSnapshot, ExportError> {
        let rows = PatientService::new(self.db).fetch_all().await?;
        Ok(PatientSnapshot::new(rows))
    }

    /// Reads the Patient table back and writes it under the run timestamp. Nothing
    /// here touches the seeding transaction, which is already committed.
    #[instrument(skip_all, fields(folder = %self.target.folder.display()))]
    pub async fn export(&self, run_at: NaiveDateTime) -> Result<ExportReport, ExportError> {
        let snapshot = self.load_snapshot().await?;
        let distribution = snapshot.distribution();

        for (value, count) in distribution.ranked() {
            info!(gender = value, count, "Gender distribution");
        }

        let path = self.write(&snapshot, run_at)?;
        info!("Excel exported successfully to: {}", path.display());

        Ok(ExportReport {
            path,
            rows: snapshot.len(),
            distribution,
            snapshot,
        })
    }

    pub fn write(&self, snapshot: &PatientSnapshot, run_at: NaiveDateTime) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.target.folder).map_err(|source| ExportError::Folder {
            path: self.target.folder.clone(),
            source,
        })?;

        let path = self.target.path_for(run_at);
        debug!("Writing {} rows to {}", snapshot.len(), path.display());
        self.sink.write_snapshot(&path, snapshot)?;

        Ok(path)
    }
}
