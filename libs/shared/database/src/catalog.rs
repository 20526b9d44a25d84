use std::fmt;

use tracing::debug;

use crate::connection::{DatabaseBackend, DatabaseHandle};
use crate::error::DatabaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CatalogKind {
    Table,
    Index,
    View,
}

impl CatalogKind {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "table" | "base table" => Some(CatalogKind::Table),
            "index" => Some(CatalogKind::Index),
            "view" => Some(CatalogKind::View),
            _ => None,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CatalogKind::Table => "table",
            CatalogKind::Index => "index",
            CatalogKind::View => "view",
        };
        f.write_str(label)
    }
}

/// One named object in the schema's metadata catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CatalogObject {
    pub kind: CatalogKind,
    pub name: String,
    pub table: String,
}

const MYSQL_TABLES: &str = "SELECT CAST(TABLE_TYPE AS CHAR), CAST(TABLE_NAME AS CHAR), CAST(TABLE_NAME AS CHAR) \
     FROM information_schema.tables WHERE table_schema = DATABASE()";
const MYSQL_INDEXES: &str = "SELECT DISTINCT 'index', CAST(INDEX_NAME AS CHAR), CAST(TABLE_NAME AS CHAR) \
     FROM information_schema.statistics WHERE table_schema = DATABASE() AND INDEX_NAME <> 'PRIMARY'";
const SQLITE_OBJECTS: &str = "SELECT type, name, tbl_name FROM sqlite_master \
     WHERE type IN ('table', 'index', 'view') AND name NOT LIKE 'sqlite_%'";

impl DatabaseHandle {
    pub async fn table_exists(&self, table: &str) -> Result<bool, DatabaseError> {
        let count: i64 = match self.backend() {
            DatabaseBackend::MySql(pool) => {
                sqlx::query_scalar(
                    "SELECT COUNT(1) FROM information_schema.tables \
                     WHERE table_schema = DATABASE() AND table_name = ? AND table_type = 'BASE TABLE'",
                )
                .bind(table)
                .fetch_one(pool)
                .await?
            }
            DatabaseBackend::Sqlite(pool) => {
                sqlx::query_scalar("SELECT COUNT(1) FROM sqlite_master WHERE type = 'table' AND name = ?")
                    .bind(table)
                    .fetch_one(pool)
                    .await?
            }
        };

        Ok(count > 0)
    }

    /// True when an index of exactly this name exists on exactly this table.
    pub async fn index_exists(&self, table: &str, index: &str) -> Result<bool, DatabaseError> {
        let count: i64 = match self.backend() {
            DatabaseBackend::MySql(pool) => {
                sqlx::query_scalar(
                    "SELECT COUNT(1) FROM information_schema.statistics \
                     WHERE table_schema = DATABASE() AND table_name = ? AND index_name = ?",
                )
                .bind(table)
                .bind(index)
                .fetch_one(pool)
                .await?
            }
            DatabaseBackend::Sqlite(pool) => {
                sqlx::query_scalar(
                    "SELECT COUNT(1) FROM sqlite_master WHERE type = 'index' AND tbl_name = ? AND name = ?",
                )
                .bind(table)
                .bind(index)
                .fetch_one(pool)
                .await?
            }
        };

        debug!("Catalog lookup {}.{} -> {}", table, index, count);
        Ok(count > 0)
    }

    /// Tables, secondary indexes and views of the schema, sorted by kind then name.
    /// Engine-internal objects (primary keys, SQLite auto-indexes) are left out.
    pub async fn catalog_objects(&self) -> Result<Vec<CatalogObject>, DatabaseError> {
        let rows: Vec<(String, String, String)> = match self.backend() {
            DatabaseBackend::MySql(pool) => {
                let mut rows: Vec<(String, String, String)> =
                    sqlx::query_as(MYSQL_TABLES).fetch_all(pool).await?;
                rows.extend(
                    sqlx::query_as::<_, (String, String, String)>(MYSQL_INDEXES)
                        .fetch_all(pool)
                        .await?,
                );
                rows
            }
            DatabaseBackend::Sqlite(pool) => sqlx::query_as(SQLITE_OBJECTS).fetch_all(pool).await?,
        };

        let mut objects: Vec<CatalogObject> = rows
            .into_iter()
            .filter_map(|(kind, name, table)| {
                CatalogKind::parse(&kind).map(|kind| CatalogObject { kind, name, table })
            })
            .collect();
        objects.sort();

        Ok(objects)
    }
}
