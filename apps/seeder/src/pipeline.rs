use chrono::NaiveDateTime;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use export_cell::{ExportReport, ExportService, ExportTarget, SnapshotSink};
use patient_cell::{PatientGenerator, ReferencePools, SeedReport, SeedingService};
use schema_cell::{IndexOutcome, IndexService, SchemaService, ViewService};
use shared_config::AppConfig;
use shared_database::DatabaseHandle;
use shared_models::AppError;

#[derive(Debug)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub tables: Vec<&'static str>,
    pub indexes: Vec<(&'static str, IndexOutcome)>,
    pub views: Vec<&'static str>,
    pub seed: SeedReport,
    pub export: ExportReport,
}

/// Schema, indexes, views, seed, export; strictly in that order. The first failing
/// stage aborts the rest. Closing `db` is left to the caller on every path.
pub async fn run_pipeline<S: SnapshotSink>(
    db: &DatabaseHandle,
    config: &AppConfig,
    sink: S,
    run_at: NaiveDateTime,
) -> Result<PipelineReport, AppError> {
    let run_id = Uuid::new_v4();
    let span = info_span!("seed_run", run_id = %run_id, dialect = db.dialect().name());

    run_stages(run_id, db, config, sink, run_at)
        .instrument(span)
        .await
}

async fn run_stages<S: SnapshotSink>(
    run_id: Uuid,
    db: &DatabaseHandle,
    config: &AppConfig,
    sink: S,
    run_at: NaiveDateTime,
) -> Result<PipelineReport, AppError> {
    let tables = SchemaService::new(db).provision().await?;

    let indexes = IndexService::new(db).provision().await?;

    let views = ViewService::new(db).provision().await?;

    let pools = ReferencePools::default();
    let mut generator = match config.seed_rng {
        Some(seed) => {
            info!("Using fixed generator seed {}", seed);
            PatientGenerator::seeded(seed, pools)?
        }
        None => PatientGenerator::from_entropy(pools)?,
    };
    let seed = SeedingService::new(db)
        .seed(&mut generator, config.seed_count)
        .await?;

    let export = ExportService::new(db, sink, ExportTarget::from_config(config))
        .export(run_at)
        .await?;

    Ok(PipelineReport {
        run_id,
        tables,
        indexes,
        views,
        seed,
        export,
    })
}
