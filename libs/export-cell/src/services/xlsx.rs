use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::ExportError;
use crate::models::PatientSnapshot;
use crate::services::snapshot::SnapshotSink;

/// Writes the snapshot as a single-sheet workbook: a bold header row with the Patient
/// columns, then one row per patient. No extra index column is added.
#[derive(Debug, Clone)]
pub struct XlsxSink {
    sheet_name: String,
}

impl Default for XlsxSink {
    fn default() -> Self {
        Self {
            sheet_name: "Patient".to_string(),
        }
    }
}

impl XlsxSink {
    pub fn with_sheet_name(sheet_name: &str) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
        }
    }
}

impl SnapshotSink for XlsxSink {
    fn write_snapshot(&self, path: &Path, snapshot: &PatientSnapshot) -> Result<(), ExportError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(&self.sheet_name)
            .map_err(|e| ExportError::write(path, e))?;

        for (col, title) in snapshot.columns().iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *title, &header)
                .map_err(|e| ExportError::write(path, e))?;
        }

        for (index, patient) in snapshot.rows.iter().enumerate() {
            let row = u32::try_from(index + 1).map_err(|e| ExportError::write(path, e))?;

            worksheet
                .write_number(row, 0, patient.patient_id as f64)
                .map_err(|e| ExportError::write(path, e))?;

            let cells = PatientSnapshot::cells(patient);
            for (col, value) in cells.iter().enumerate().skip(1) {
                if value.is_empty() {
                    continue;
                }
                worksheet
                    .write_string(row, col as u16, value)
                    .map_err(|e| ExportError::write(path, e))?;
            }
        }

        worksheet.autofit();
        workbook.save(path).map_err(|e| ExportError::write(path, e))?;

        Ok(())
    }
}
