use schema_cell::*;
use shared_database::CatalogKind;
use shared_utils::test_utils::TestDatabase;

async fn provisioned_database() -> TestDatabase {
    let db = TestDatabase::new().await.expect("Failed to create test database");
    SchemaService::new(db.handle()).provision().await.expect("Provisioning failed");
    ViewService::new(db.handle()).provision().await.expect("View provisioning failed");
    db
}

#[tokio::test]
async fn test_views_are_replaceable() {
    let db = provisioned_database().await;

    let replaced = ViewService::new(db.handle()).provision().await.unwrap();

    assert_eq!(replaced, vec![PATIENT_APPOINTMENTS_VIEW, DOCTOR_DEPARTMENT_VIEW]);
    let views = db
        .handle()
        .catalog_objects()
        .await
        .unwrap()
        .into_iter()
        .filter(|o| o.kind == CatalogKind::View)
        .count();
    assert_eq!(views, 2);

    db.close().await;
}

#[tokio::test]
async fn test_patient_appointments_view_is_inner_join() {
    let db = provisioned_database().await;

    db.execute("INSERT INTO Patient (Name, Gender) VALUES ('Rahul Sharma', 'Male')").await.unwrap();
    db.execute("INSERT INTO Patient (Name, Gender) VALUES ('Priya Gupta', 'Female')").await.unwrap();
    db.execute("INSERT INTO Doctor (Name, Specialization) VALUES ('Dr. Iyer', 'Cardiology')").await.unwrap();
    db.execute(
        "INSERT INTO Appointment (PatientID, DoctorID, AppointmentDate, AppointmentTime) \
         VALUES (1, 1, '2024-05-02', '10:30:00')",
    )
    .await
    .unwrap();

    let rows: Vec<(i64, String, String, String)> = sqlx::query_as(
        "SELECT PatientID, PatientName, AppointmentDate, Status FROM PatientAppointmentsView",
    )
    .fetch_all(db.pool())
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![(1, "Rahul Sharma".to_string(), "2024-05-02".to_string(), "Scheduled".to_string())]
    );

    db.close().await;
}

#[tokio::test]
async fn test_doctor_department_view_skips_unassigned_doctors() {
    let db = provisioned_database().await;

    db.execute("INSERT INTO Department (DepartmentName, Location) VALUES ('Neurology', 'Block C')")
        .await
        .unwrap();
    db.execute("INSERT INTO Doctor (Name, Specialization, DepartmentID) VALUES ('Dr. Nair', 'Neurologist', 1)")
        .await
        .unwrap();
    db.execute("INSERT INTO Doctor (Name, Specialization) VALUES ('Dr. Bose', 'Locum')")
        .await
        .unwrap();

    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT DoctorName, Specialization, DepartmentName FROM DoctorDepartmentView",
    )
    .fetch_all(db.pool())
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![("Dr. Nair".to_string(), "Neurologist".to_string(), "Neurology".to_string())]
    );

    db.close().await;
}
