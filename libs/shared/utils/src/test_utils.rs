use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{anyhow, Result};
use sqlx::SqlitePool;

use shared_config::AppConfig;
use shared_database::{DatabaseBackend, DatabaseHandle};

static TRACING: Once = Once::new();

/// Routes `tracing` output through the test harness when `RUST_LOG` is set.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        }
    });
}

/// Fresh in-memory SQLite database per test, with foreign keys enforced.
pub struct TestDatabase {
    handle: DatabaseHandle,
}

impl TestDatabase {
    pub async fn new() -> Result<Self> {
        init_test_tracing();
        let handle = DatabaseHandle::in_memory().await?;
        Ok(Self { handle })
    }

    pub fn handle(&self) -> &DatabaseHandle {
        &self.handle
    }

    pub fn pool(&self) -> &SqlitePool {
        match self.handle.backend() {
            DatabaseBackend::Sqlite(pool) => pool,
            DatabaseBackend::MySql(_) => unreachable!("test databases are always SQLite"),
        }
    }

    pub async fn execute(&self, statement: &str) -> Result<u64> {
        Ok(self.handle.execute(statement).await?)
    }

    pub async fn count_rows(&self, table: &str) -> Result<i64> {
        if !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(anyhow!("refusing to count rows of `{}`", table));
        }

        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(1) FROM {}", table))
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// The `CREATE` statement SQLite stored for an object, if it exists.
    pub async fn stored_definition(&self, name: &str) -> Result<Option<String>> {
        let sql: Option<Option<String>> =
            sqlx::query_scalar("SELECT sql FROM sqlite_master WHERE name = ?")
                .bind(name)
                .fetch_optional(self.pool())
                .await?;
        Ok(sql.flatten())
    }

    pub async fn close(self) {
        self.handle.close().await;
    }
}

pub struct TestConfig {
    pub export_folder: PathBuf,
    pub seed_count: usize,
    pub seed_rng: Option<u64>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            export_folder: std::env::temp_dir().join("hospital-seeder-tests"),
            seed_count: 25,
            seed_rng: Some(42),
        }
    }
}

impl TestConfig {
    pub fn with_export_folder(folder: &Path) -> Self {
        Self {
            export_folder: folder.to_path_buf(),
            ..Self::default()
        }
    }

    pub fn seed_count(mut self, count: usize) -> Self {
        self.seed_count = count;
        self
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: Some("sqlite::memory:".to_string()),
            seed_count: self.seed_count,
            seed_rng: self.seed_rng,
            export_folder: self.export_folder.clone(),
            ..AppConfig::default()
        }
    }
}
