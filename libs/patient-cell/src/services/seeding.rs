use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument, warn};

use shared_database::{DatabaseBackend, DatabaseHandle};

use crate::error::PatientError;
use crate::models::NewPatient;
use crate::services::generator::PatientGenerator;

const DELETE_PATIENTS: &str = "DELETE FROM Patient";
const INSERT_PATIENT: &str = "INSERT INTO Patient \
     (Name, DateOfBirth, Gender, Address, PhoneNumber, Email) \
     VALUES (?, ?, ?, ?, ?, ?)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub deleted: u64,
    pub inserted: u64,
}

// Both pools expose the same transaction API but no common trait the binds can be
// written against, so the body is expanded once per backend.
macro_rules! replace_patients {
    ($pool:expr, $records:expr) => {{
        let mut tx = $pool.begin().await?;

        let deleted = sqlx::query(DELETE_PATIENTS)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let mut inserted = 0u64;
        for (position, record) in $records.iter().enumerate() {
            let result = sqlx::query(INSERT_PATIENT)
                .bind(&record.name)
                .bind(record.date_of_birth)
                .bind(record.gender.as_str())
                .bind(&record.address)
                .bind(&record.phone_number)
                .bind(&record.email)
                .execute(&mut *tx)
                .await;

            match result {
                Ok(done) => inserted += done.rows_affected(),
                Err(err) => {
                    let err = PatientError::from(err);
                    warn!("Insert {} of {} failed, rolling back: {}", position + 1, $records.len(), err);
                    tx.rollback().await?;
                    return Err(err);
                }
            }
        }

        tx.commit().await?;
        SeedReport { deleted, inserted }
    }};
}

pub struct SeedingService<'a> {
    db: &'a DatabaseHandle,
}

impl<'a> SeedingService<'a> {
    pub fn new(db: &'a DatabaseHandle) -> Self {
        Self { db }
    }

    /// Replaces every Patient row with `records` in one transaction. If any insert is
    /// rejected the delete is rolled back too, so the previous population survives.
    /// There is no retry; a caller that hits [`PatientError::UniquenessViolation`]
    /// should generate a fresh batch.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn reseed(&self, records: &[NewPatient]) -> Result<SeedReport, PatientError> {
        let report = match self.db.backend() {
            DatabaseBackend::MySql(pool) => replace_patients!(pool, records),
            DatabaseBackend::Sqlite(pool) => replace_patients!(pool, records),
        };

        info!("{} random patients inserted ({} replaced)", report.inserted, report.deleted);
        Ok(report)
    }

    pub async fn seed<R: Rng>(
        &self,
        generator: &mut PatientGenerator<R>,
        count: usize,
    ) -> Result<SeedReport, PatientError> {
        let records = generator.generate_batch(count)?;
        self.reseed(&records).await
    }
}
