use chrono::NaiveDate;
use sqlx::{ColumnIndex, Decode, Row, Type};
use tracing::{debug, instrument};

use shared_database::{DatabaseBackend, DatabaseHandle, Dialect};

use crate::error::PatientError;
use crate::models::{Gender, Patient};

pub struct PatientService<'a> {
    db: &'a DatabaseHandle,
}

impl<'a> PatientService<'a> {
    pub fn new(db: &'a DatabaseHandle) -> Self {
        Self { db }
    }

    /// Every Patient row in key order.
    #[instrument(skip_all)]
    pub async fn fetch_all(&self) -> Result<Vec<Patient>, PatientError> {
        let query = select_patients(self.db.dialect());

        let patients = match self.db.backend() {
            DatabaseBackend::MySql(pool) => sqlx::query(&query)
                .fetch_all(pool)
                .await?
                .iter()
                .map(|row| patient_from_row(row))
                .collect::<Result<Vec<_>, _>>()?,
            DatabaseBackend::Sqlite(pool) => sqlx::query(&query)
                .fetch_all(pool)
                .await?
                .iter()
                .map(|row| patient_from_row(row))
                .collect::<Result<Vec<_>, _>>()?,
        };

        debug!("Fetched {} patients", patients.len());
        Ok(patients)
    }

    pub async fn count(&self) -> Result<i64, PatientError> {
        let count: i64 = match self.db.backend() {
            DatabaseBackend::MySql(pool) => {
                sqlx::query_scalar("SELECT COUNT(1) FROM Patient").fetch_one(pool).await?
            }
            DatabaseBackend::Sqlite(pool) => {
                sqlx::query_scalar("SELECT COUNT(1) FROM Patient").fetch_one(pool).await?
            }
        };

        Ok(count)
    }
}

fn select_patients(dialect: Dialect) -> String {
    // MySQL reports INT keys as 32-bit; widen so both engines decode into i64.
    let key = match dialect {
        Dialect::MySql => "CAST(PatientID AS SIGNED) AS PatientID",
        Dialect::Sqlite => "PatientID",
    };

    format!(
        "SELECT {}, Name, DateOfBirth, Gender, Address, PhoneNumber, Email \
         FROM Patient ORDER BY PatientID",
        key
    )
}

fn patient_from_row<'r, R>(row: &'r R) -> Result<Patient, PatientError>
where
    R: Row,
    usize: ColumnIndex<R>,
    i64: Decode<'r, R::Database> + Type<R::Database>,
    String: Decode<'r, R::Database> + Type<R::Database>,
    NaiveDate: Decode<'r, R::Database> + Type<R::Database>,
{
    // Positions follow PATIENT_COLUMNS.
    let gender: Option<String> = row.try_get(3)?;

    Ok(Patient {
        patient_id: row.try_get(0)?,
        name: row.try_get(1)?,
        date_of_birth: row.try_get(2)?,
        gender: gender.as_deref().map(str::parse::<Gender>).transpose()?,
        address: row.try_get(4)?,
        phone_number: row.try_get(5)?,
        email: row.try_get(6)?,
    })
}
