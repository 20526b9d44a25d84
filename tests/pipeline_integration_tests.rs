//! End-to-end runs of the seeder pipeline against an in-memory SQLite database:
//! provisioning, seeding and export in one pass, the way the binary drives them.

use std::fs;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveDateTime};

use export_cell::{ExportError, XlsxSink};
use hospital_seeder::run_pipeline;
use patient_cell::{PatientGenerator, PatientService, ReferencePools, SeedingService};
use schema_cell::{IndexOutcome, SchemaService, PATIENT_TABLE};
use shared_database::CatalogKind;
use shared_models::AppError;
use shared_utils::test_utils::{TestConfig, TestDatabase};

fn run_at(second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 18)
        .unwrap()
        .and_hms_opt(15, 50, second)
        .unwrap()
}

#[tokio::test]
async fn test_pipeline_provisions_seeds_and_exports() {
    let db = TestDatabase::new().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = TestConfig::with_export_folder(dir.path()).to_app_config();

    let report = run_pipeline(db.handle(), &config, XlsxSink::default(), run_at(0))
        .await
        .unwrap();

    assert_eq!(report.tables.len(), 6);
    assert_eq!(report.views.len(), 2);
    assert!(report
        .indexes
        .iter()
        .all(|(_, outcome)| *outcome == IndexOutcome::Created));
    assert_eq!(report.seed.inserted, config.seed_count as u64);
    assert_eq!(report.export.rows, config.seed_count);
    assert!(report.export.path.starts_with(dir.path()));
    assert!(report.export.path.exists());

    db.close().await;
}

#[tokio::test]
async fn test_rerun_is_idempotent_and_replaces_patients() {
    let db = TestDatabase::new().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = TestConfig::with_export_folder(dir.path()).to_app_config();

    let first = run_pipeline(db.handle(), &config, XlsxSink::default(), run_at(0))
        .await
        .unwrap();
    let objects_after_first = db.handle().catalog_objects().await.unwrap();

    let second = run_pipeline(db.handle(), &config, XlsxSink::default(), run_at(1))
        .await
        .unwrap();
    let objects_after_second = db.handle().catalog_objects().await.unwrap();

    assert_eq!(objects_after_first, objects_after_second);
    assert_eq!(
        objects_after_second
            .iter()
            .filter(|object| object.kind == CatalogKind::Index)
            .count(),
        2
    );
    assert!(second
        .indexes
        .iter()
        .all(|(_, outcome)| *outcome == IndexOutcome::AlreadyPresent));

    assert_eq!(second.seed.deleted, config.seed_count as u64);
    assert_eq!(db.count_rows(PATIENT_TABLE).await.unwrap(), config.seed_count as i64);
    assert_ne!(first.export.path, second.export.path);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);

    db.close().await;
}

#[tokio::test]
async fn test_full_population_export_matches_seed_count() {
    let db = TestDatabase::new().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = TestConfig::with_export_folder(dir.path())
        .seed_count(1000)
        .to_app_config();

    let report = run_pipeline(db.handle(), &config, XlsxSink::default(), run_at(0))
        .await
        .unwrap();

    assert_eq!(report.seed.inserted, 1000);
    assert_eq!(report.export.rows, 1000);
    assert_eq!(report.export.distribution.total(), 1000);
    assert_eq!(
        report.export.distribution.count("Male") + report.export.distribution.count("Female"),
        1000
    );

    db.close().await;
}

#[tokio::test]
async fn test_fixed_seed_reproduces_the_same_five_patients() {
    let pools = ReferencePools::with_first_names(&["Rahul", "Amit"], &["Anita", "Sunita"]);
    let mut runs = Vec::new();

    for _ in 0..2 {
        let db = TestDatabase::new().await.unwrap();
        SchemaService::new(db.handle()).provision().await.unwrap();

        let mut generator = PatientGenerator::seeded(42, pools.clone()).unwrap();
        SeedingService::new(db.handle()).seed(&mut generator, 5).await.unwrap();

        let drawn: Vec<_> = PatientService::new(db.handle())
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| (p.name, p.gender, p.address))
            .collect();
        runs.push(drawn);

        db.close().await;
    }

    assert_eq!(runs[0].len(), 5);
    assert_eq!(runs[0], runs[1]);
    for (name, _, _) in &runs[0] {
        let first = name.split(' ').next().unwrap();
        assert!(["Rahul", "Amit", "Anita", "Sunita"].contains(&first));
    }
}

#[tokio::test]
async fn test_export_failure_keeps_committed_seed() {
    let db = TestDatabase::new().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("occupied");
    fs::write(&blocker, b"file in the way").unwrap();
    let config = TestConfig::with_export_folder(&blocker.join("exports")).to_app_config();

    let result = run_pipeline(db.handle(), &config, XlsxSink::default(), run_at(0)).await;

    let err = result.unwrap_err();
    assert_matches!(err, AppError::Export(_));
    assert_eq!(err.exit_code(), 7);
    assert!(!err.is_retryable());
    assert_eq!(db.count_rows(PATIENT_TABLE).await.unwrap(), config.seed_count as i64);

    db.close().await;
}

#[tokio::test]
async fn test_schema_failure_aborts_before_seeding() {
    let db = TestDatabase::new().await.unwrap();
    let dir = tempfile::tempdir().unwrap();
    let config = TestConfig::with_export_folder(dir.path()).to_app_config();

    // A drifted Patient table without a Name column is kept as is, so indexing it fails.
    db.execute("CREATE TABLE Patient (PatientID INTEGER PRIMARY KEY)").await.unwrap();

    let result = run_pipeline(db.handle(), &config, XlsxSink::default(), run_at(0)).await;

    assert_matches!(result, Err(AppError::Schema(_)));
    assert_eq!(db.count_rows(PATIENT_TABLE).await.unwrap(), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    db.close().await;
}

#[test]
fn test_export_errors_map_to_export_category() {
    let err: AppError = ExportError::write(std::path::Path::new("out.xlsx"), "disk full").into();

    assert_matches!(err, AppError::Export(ref message) if message.contains("disk full"));
}
