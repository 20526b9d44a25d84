use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

use patient_cell::{Patient, PATIENT_COLUMNS};
use shared_config::AppConfig;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Label used for rows whose Gender is NULL.
pub const MISSING_VALUE: &str = "NULL";

const PREVIEW_ROWS: usize = 5;

/// `<folder>/<base_name>_<YYYYMMDD_HHMMSS>.<extension>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportTarget {
    pub folder: PathBuf,
    pub base_name: String,
    pub extension: String,
}

impl ExportTarget {
    pub fn new(folder: impl Into<PathBuf>, base_name: &str, extension: &str) -> Self {
        Self {
            folder: folder.into(),
            base_name: base_name.to_string(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.export_folder.clone(),
            &config.export_base_name,
            &config.export_extension,
        )
    }

    /// Second granularity: two runs within the same second share a name.
    pub fn file_name(&self, run_at: NaiveDateTime) -> String {
        format!(
            "{}_{}.{}",
            self.base_name,
            run_at.format(TIMESTAMP_FORMAT),
            self.extension
        )
    }

    pub fn path_for(&self, run_at: NaiveDateTime) -> PathBuf {
        self.folder.join(self.file_name(run_at))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenderDistribution {
    counts: BTreeMap<String, usize>,
}

impl GenderDistribution {
    pub fn from_patients(patients: &[Patient]) -> Self {
        let mut counts = BTreeMap::new();

        for patient in patients {
            let key = patient
                .gender
                .map(|gender| gender.as_str())
                .unwrap_or(MISSING_VALUE);
            *counts.entry(key.to_string()).or_insert(0) += 1;
        }

        Self { counts }
    }

    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Largest count first; ties in name order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(value, count)| (value.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

impl fmt::Display for GenderDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Gender")?;
        for (value, count) in self.ranked() {
            writeln!(f, "{:<10}{:>6}", value, count)?;
        }
        Ok(())
    }
}

/// The Patient table as read back after seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientSnapshot {
    pub rows: Vec<Patient>,
}

impl PatientSnapshot {
    pub fn new(rows: Vec<Patient>) -> Self {
        Self { rows }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &PATIENT_COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn distribution(&self) -> GenderDistribution {
        GenderDistribution::from_patients(&self.rows)
    }

    /// Text cells in column order; absent values are empty.
    pub fn cells(patient: &Patient) -> [String; 7] {
        [
            patient.patient_id.to_string(),
            patient.name.clone(),
            patient
                .date_of_birth
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            patient.gender.map(|g| g.to_string()).unwrap_or_default(),
            patient.address.clone().unwrap_or_default(),
            patient.phone_number.clone().unwrap_or_default(),
            patient.email.clone().unwrap_or_default(),
        ]
    }
}

impl fmt::Display for PatientSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.columns().join("\t"))?;

        let write_row = |f: &mut fmt::Formatter<'_>, patient: &Patient| {
            writeln!(f, "{}", Self::cells(patient).join("\t"))
        };

        if self.rows.len() <= PREVIEW_ROWS * 2 {
            for patient in &self.rows {
                write_row(f, patient)?;
            }
        } else {
            for patient in &self.rows[..PREVIEW_ROWS] {
                write_row(f, patient)?;
            }
            writeln!(f, "{}", vec!["..."; self.columns().len()].join("\t"))?;
            for patient in &self.rows[self.rows.len() - PREVIEW_ROWS..] {
                write_row(f, patient)?;
            }
        }

        write!(f, "{} rows × {} columns", self.rows.len(), self.columns().len())
    }
}
