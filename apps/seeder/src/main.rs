use std::process::ExitCode;

use chrono::{Local, NaiveDateTime};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use export_cell::XlsxSink;
use hospital_seeder::{run_pipeline, PipelineReport};
use shared_config::AppConfig;
use shared_database::DatabaseHandle;
use shared_models::AppError;

#[tokio::main]
async fn main() -> ExitCode {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlx=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hospital database seeder");

    // Load configuration
    let config = AppConfig::from_env();

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.report();
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(config: &AppConfig) -> Result<(), AppError> {
    // Captured once so the file name reflects when the run started
    let run_at = Local::now().naive_local();

    let db = DatabaseHandle::connect(config).await?;
    info!("Connected using {} dialect", db.dialect().name());

    let report = run_and_close(db, config, run_at).await?;
    println!("{}", report.export.snapshot);
    println!();
    print!("{}", report.export.distribution);

    Ok(())
}

/// Takes ownership of the handle so it is closed whether or not a stage failed.
async fn run_and_close(
    db: DatabaseHandle,
    config: &AppConfig,
    run_at: NaiveDateTime,
) -> Result<PipelineReport, AppError> {
    let result = run_pipeline(&db, config, XlsxSink::default(), run_at).await;

    db.close().await;
    info!("Database connection closed");

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use shared_database::DatabaseBackend;
    use shared_utils::test_utils::{init_test_tracing, TestConfig};

    fn run_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 18)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_connection_closed_after_successful_run() {
        init_test_tracing();
        let dir = tempfile::tempdir().unwrap();
        let config = TestConfig::with_export_folder(dir.path()).seed_count(10).to_app_config();

        let db = DatabaseHandle::in_memory().await.unwrap();
        let pool = match db.backend() {
            DatabaseBackend::Sqlite(pool) => pool.clone(),
            DatabaseBackend::MySql(_) => panic!("in-memory handle must be SQLite"),
        };

        let report = run_and_close(db, &config, run_at()).await.unwrap();

        assert_eq!(report.export.rows, 10);
        assert!(pool.is_closed());
    }

    #[tokio::test]
    async fn test_connection_closed_when_a_stage_fails() {
        init_test_tracing();
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("occupied");
        std::fs::write(&blocker, b"file in the way").unwrap();
        let config = TestConfig::with_export_folder(&blocker.join("exports")).to_app_config();

        let db = DatabaseHandle::in_memory().await.unwrap();
        let pool = match db.backend() {
            DatabaseBackend::Sqlite(pool) => pool.clone(),
            DatabaseBackend::MySql(_) => panic!("in-memory handle must be SQLite"),
        };

        let result = run_and_close(db, &config, run_at()).await;

        assert_matches!(result, Err(AppError::Export(_)));
        assert!(pool.is_closed());
    }
}
