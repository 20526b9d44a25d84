use std::str::FromStr;

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{ConnectOptions, Connection, Executor};
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::error::DatabaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

#[derive(Debug)]
pub enum DatabaseBackend {
    MySql(MySqlPool),
    Sqlite(SqlitePool),
}

/// Scoped handle to the hospital schema. Acquired once per run and released with
/// [`DatabaseHandle::close`]; every stage borrows it instead of reaching for a global.
#[derive(Debug)]
pub struct DatabaseHandle {
    backend: DatabaseBackend,
    schema: String,
}

impl DatabaseHandle {
    /// Opens the configured target. Without `DATABASE_URL` this connects to the MySQL
    /// server, creates the schema if it is missing and then binds the pool to it.
    pub async fn connect(config: &AppConfig) -> Result<Self, DatabaseError> {
        if let Some(url) = &config.database_url {
            return Self::connect_url(url).await;
        }

        validate_identifier(&config.db_name)?;

        let server = MySqlConnectOptions::new()
            .host(&config.db_host)
            .port(config.db_port)
            .username(&config.db_user)
            .password(&config.db_password);

        debug!("Bootstrapping schema {} on {}:{}", config.db_name, config.db_host, config.db_port);
        let mut conn = server.connect().await.map_err(DatabaseError::connection)?;
        conn.execute(format!("CREATE DATABASE IF NOT EXISTS `{}`", config.db_name).as_str())
            .await?;
        conn.close().await.map_err(DatabaseError::connection)?;

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(server.database(&config.db_name))
            .await
            .map_err(DatabaseError::connection)?;

        info!("Connected to MySQL schema {}", config.db_name);

        Ok(Self {
            backend: DatabaseBackend::MySql(pool),
            schema: config.db_name.clone(),
        })
    }

    pub async fn connect_url(url: &str) -> Result<Self, DatabaseError> {
        if url.starts_with("sqlite:") {
            let options = SqliteConnectOptions::from_str(url)
                .map_err(|e| DatabaseError::UnsupportedUrl(e.to_string()))?
                .create_if_missing(true)
                .foreign_keys(true);

            // An in-memory database lives and dies with its connection, so the pool is
            // pinned to a single connection that never idles out.
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
                .map_err(DatabaseError::connection)?;

            info!("Connected to SQLite database {}", url);

            return Ok(Self {
                backend: DatabaseBackend::Sqlite(pool),
                schema: "main".to_string(),
            });
        }

        if url.starts_with("mysql:") || url.starts_with("mariadb:") {
            let options = MySqlConnectOptions::from_str(url)
                .map_err(|e| DatabaseError::UnsupportedUrl(e.to_string()))?;
            let pool = MySqlPoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await
                .map_err(DatabaseError::connection)?;

            let schema: Option<String> = sqlx::query_scalar("SELECT DATABASE()")
                .fetch_one(&pool)
                .await?;
            let schema = schema.ok_or_else(|| {
                DatabaseError::UnsupportedUrl("MySQL URL must name a database".to_string())
            })?;

            info!("Connected to MySQL schema {}", schema);

            return Ok(Self {
                backend: DatabaseBackend::MySql(pool),
                schema,
            });
        }

        Err(DatabaseError::UnsupportedUrl(url.to_string()))
    }

    pub async fn in_memory() -> Result<Self, DatabaseError> {
        Self::connect_url("sqlite::memory:").await
    }

    pub fn backend(&self) -> &DatabaseBackend {
        &self.backend
    }

    pub fn dialect(&self) -> Dialect {
        match self.backend {
            DatabaseBackend::MySql(_) => Dialect::MySql,
            DatabaseBackend::Sqlite(_) => Dialect::Sqlite,
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Runs one unprepared statement and returns the affected row count.
    pub async fn execute(&self, statement: &str) -> Result<u64, DatabaseError> {
        debug!("Executing: {}", statement.trim());

        let affected = match &self.backend {
            DatabaseBackend::MySql(pool) => pool.execute(statement).await?.rows_affected(),
            DatabaseBackend::Sqlite(pool) => pool.execute(statement).await?.rows_affected(),
        };

        Ok(affected)
    }

    /// Runs the statements in one transaction. MySQL commits DDL implicitly, so
    /// all-or-nothing only holds for SQLite when the batch contains DDL.
    pub async fn execute_in_transaction(&self, statements: &[String]) -> Result<(), DatabaseError> {
        match &self.backend {
            DatabaseBackend::MySql(pool) => {
                let mut tx = pool.begin().await?;
                for statement in statements {
                    debug!("Executing: {}", statement.trim());
                    (&mut *tx).execute(statement.as_str()).await?;
                }
                tx.commit().await?;
            }
            DatabaseBackend::Sqlite(pool) => {
                let mut tx = pool.begin().await?;
                for statement in statements {
                    debug!("Executing: {}", statement.trim());
                    (&mut *tx).execute(statement.as_str()).await?;
                }
                tx.commit().await?;
            }
        }

        Ok(())
    }

    pub async fn close(self) {
        match self.backend {
            DatabaseBackend::MySql(pool) => pool.close().await,
            DatabaseBackend::Sqlite(pool) => pool.close().await,
        }
        debug!("Connection pool for {} closed", self.schema);
    }
}

/// Schema names are spliced into DDL, so only plain identifiers are accepted.
pub fn validate_identifier(name: &str) -> Result<(), DatabaseError> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(DatabaseError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("HospitalDB").is_ok());
        assert!(validate_identifier("hospital_db_2").is_ok());
        assert_matches!(validate_identifier(""), Err(DatabaseError::InvalidIdentifier(_)));
        assert_matches!(
            validate_identifier("HospitalDB`; DROP DATABASE x; --"),
            Err(DatabaseError::InvalidIdentifier(_))
        );
    }

    #[tokio::test]
    async fn test_in_memory_handle_reports_sqlite() {
        let db = DatabaseHandle::in_memory().await.expect("Failed to open in-memory database");

        assert_eq!(db.dialect(), Dialect::Sqlite);
        assert_eq!(db.schema(), "main");

        db.close().await;
    }

    #[tokio::test]
    async fn test_unknown_scheme_is_rejected() {
        let result = DatabaseHandle::connect_url("postgres://localhost/hospital").await;

        assert_matches!(result, Err(DatabaseError::UnsupportedUrl(_)));
    }

    #[tokio::test]
    async fn test_transaction_rolls_back_on_failure() {
        let db = DatabaseHandle::in_memory().await.expect("Failed to open in-memory database");
        db.execute("CREATE TABLE Ward (Name VARCHAR(50) UNIQUE)").await.unwrap();

        let result = db
            .execute_in_transaction(&[
                "INSERT INTO Ward (Name) VALUES ('North')".to_string(),
                "INSERT INTO Ward (Name) VALUES ('North')".to_string(),
            ])
            .await;

        assert_matches!(result, Err(DatabaseError::UniqueViolation(_)));

        let DatabaseBackend::Sqlite(pool) = db.backend() else {
            panic!("expected sqlite backend");
        };
        let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM Ward")
            .fetch_one(pool)
            .await
            .unwrap();
        assert_eq!(count, 0);

        db.close().await;
    }
}
