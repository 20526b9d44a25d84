//! The hospital schema: six tables declared parents-first, two secondary indexes and
//! two lookup views.

use crate::models::{ColumnDefinition, ColumnType, IndexDefinition, TableDefinition, ViewDefinition};

pub const PATIENT_TABLE: &str = "Patient";
pub const DEPARTMENT_TABLE: &str = "Department";
pub const DOCTOR_TABLE: &str = "Doctor";
pub const APPOINTMENT_TABLE: &str = "Appointment";
pub const PRESCRIPTION_TABLE: &str = "Prescription";
pub const BILLING_TABLE: &str = "Billing";

pub const PATIENT_NAME_INDEX: &str = "idx_patient_name";
pub const APPOINTMENT_DATE_INDEX: &str = "idx_appointment_date";

pub const PATIENT_APPOINTMENTS_VIEW: &str = "PatientAppointmentsView";
pub const DOCTOR_DEPARTMENT_VIEW: &str = "DoctorDepartmentView";

pub const GENDER_VALUES: &[&str] = &["Male", "Female"];

pub fn patient_table() -> TableDefinition {
    TableDefinition::new(PATIENT_TABLE)
        .column(ColumnDefinition::serial("PatientID"))
        .column(ColumnDefinition::new("Name", ColumnType::VarChar(100)).not_null())
        .column(ColumnDefinition::new("DateOfBirth", ColumnType::Date))
        .column(ColumnDefinition::new("Gender", ColumnType::VarChar(10)).one_of(GENDER_VALUES))
        .column(ColumnDefinition::new("Address", ColumnType::VarChar(100)))
        .column(ColumnDefinition::new("PhoneNumber", ColumnType::VarChar(15)).unique())
        .column(ColumnDefinition::new("Email", ColumnType::VarChar(100)).unique())
}

pub fn department_table() -> TableDefinition {
    TableDefinition::new(DEPARTMENT_TABLE)
        .column(ColumnDefinition::serial("DepartmentID"))
        .column(
            ColumnDefinition::new("DepartmentName", ColumnType::VarChar(100))
                .not_null()
                .unique(),
        )
        .column(ColumnDefinition::new("Location", ColumnType::VarChar(100)))
}

pub fn doctor_table() -> TableDefinition {
    TableDefinition::new(DOCTOR_TABLE)
        .column(ColumnDefinition::serial("DoctorID"))
        .column(ColumnDefinition::new("Name", ColumnType::VarChar(100)).not_null())
        .column(ColumnDefinition::new("Specialization", ColumnType::VarChar(100)))
        .column(ColumnDefinition::new("PhoneNumber", ColumnType::VarChar(15)).unique())
        .column(ColumnDefinition::new("Email", ColumnType::VarChar(100)).unique())
        .column(ColumnDefinition::new("DepartmentID", ColumnType::Int))
        .references("DepartmentID", DEPARTMENT_TABLE, "DepartmentID")
}

pub fn appointment_table() -> TableDefinition {
    TableDefinition::new(APPOINTMENT_TABLE)
        .column(ColumnDefinition::serial("AppointmentID"))
        .column(ColumnDefinition::new("PatientID", ColumnType::Int))
        .column(ColumnDefinition::new("DoctorID", ColumnType::Int))
        .column(ColumnDefinition::new("AppointmentDate", ColumnType::Date))
        .column(ColumnDefinition::new("AppointmentTime", ColumnType::Time))
        .column(ColumnDefinition::new("Status", ColumnType::VarChar(50)).default_text("Scheduled"))
        .references("PatientID", PATIENT_TABLE, "PatientID")
        .references("DoctorID", DOCTOR_TABLE, "DoctorID")
}

pub fn prescription_table() -> TableDefinition {
    TableDefinition::new(PRESCRIPTION_TABLE)
        .column(ColumnDefinition::serial("PrescriptionID"))
        .column(ColumnDefinition::new("AppointmentID", ColumnType::Int))
        .column(ColumnDefinition::new("MedicationDetails", ColumnType::VarChar(255)))
        .column(ColumnDefinition::new("Dosage", ColumnType::VarChar(100)))
        .column(ColumnDefinition::new("Duration", ColumnType::VarChar(100)))
        .references("AppointmentID", APPOINTMENT_TABLE, "AppointmentID")
}

pub fn billing_table() -> TableDefinition {
    TableDefinition::new(BILLING_TABLE)
        .column(ColumnDefinition::serial("BillID"))
        .column(ColumnDefinition::new("PatientID", ColumnType::Int))
        .column(ColumnDefinition::new(
            "Amount",
            ColumnType::Decimal { precision: 10, scale: 2 },
        ))
        .column(ColumnDefinition::new("BillDate", ColumnType::Date))
        .column(ColumnDefinition::new("PaymentStatus", ColumnType::VarChar(50)).default_text("Pending"))
        .references("PatientID", PATIENT_TABLE, "PatientID")
}

/// Parents before children, so every foreign key points at an already-declared table.
pub fn hospital_tables() -> Vec<TableDefinition> {
    vec![
        patient_table(),
        department_table(),
        doctor_table(),
        appointment_table(),
        prescription_table(),
        billing_table(),
    ]
}

pub fn hospital_indexes() -> Vec<IndexDefinition> {
    vec![
        IndexDefinition::new(PATIENT_NAME_INDEX, PATIENT_TABLE, "Name"),
        IndexDefinition::new(APPOINTMENT_DATE_INDEX, APPOINTMENT_TABLE, "AppointmentDate"),
    ]
}

pub fn hospital_views() -> Vec<ViewDefinition> {
    vec![
        ViewDefinition::new(
            PATIENT_APPOINTMENTS_VIEW,
            r#"
SELECT
    p.PatientID,
    p.Name AS PatientName,
    a.AppointmentDate,
    a.Status
FROM Patient p
JOIN Appointment a ON p.PatientID = a.PatientID
"#,
        ),
        ViewDefinition::new(
            DOCTOR_DEPARTMENT_VIEW,
            r#"
SELECT
    d.Name AS DoctorName,
    d.Specialization,
    dp.DepartmentName
FROM Doctor d
JOIN Department dp ON d.DepartmentID = dp.DepartmentID
"#,
        ),
    ]
}
