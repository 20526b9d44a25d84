use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_SEED_COUNT: usize = 1000;
pub const DEFAULT_DB_NAME: &str = "HospitalDB";
pub const DEFAULT_EXPORT_BASE_NAME: &str = "HospitalDB_Complete_Assignment";
pub const DEFAULT_EXPORT_EXTENSION: &str = "xlsx";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub seed_count: usize,
    pub seed_rng: Option<u64>,
    pub export_folder: PathBuf,
    pub export_base_name: String,
    pub export_extension: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            db_host: "localhost".to_string(),
            db_port: 3306,
            db_user: "root".to_string(),
            db_password: String::new(),
            db_name: DEFAULT_DB_NAME.to_string(),
            seed_count: DEFAULT_SEED_COUNT,
            seed_rng: None,
            export_folder: PathBuf::from("exports"),
            export_base_name: DEFAULT_EXPORT_BASE_NAME.to_string(),
            export_extension: DEFAULT_EXPORT_EXTENSION.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            db_host: env::var("HOSPITAL_DB_HOST")
                .unwrap_or_else(|_| {
                    warn!("HOSPITAL_DB_HOST not set, using {}", defaults.db_host);
                    defaults.db_host.clone()
                }),
            db_port: parse_or("HOSPITAL_DB_PORT", defaults.db_port),
            db_user: env::var("HOSPITAL_DB_USER")
                .unwrap_or_else(|_| {
                    warn!("HOSPITAL_DB_USER not set, using {}", defaults.db_user);
                    defaults.db_user.clone()
                }),
            db_password: env::var("HOSPITAL_DB_PASSWORD")
                .unwrap_or_else(|_| {
                    warn!("HOSPITAL_DB_PASSWORD not set, using empty value");
                    String::new()
                }),
            db_name: env::var("HOSPITAL_DB_NAME")
                .unwrap_or_else(|_| defaults.db_name.clone()),
            seed_count: parse_or("SEED_COUNT", defaults.seed_count),
            seed_rng: env::var("SEED_RNG_SEED")
                .ok()
                .and_then(|raw| match raw.parse::<u64>() {
                    Ok(seed) => Some(seed),
                    Err(_) => {
                        warn!("SEED_RNG_SEED={} is not a valid u64, using OS entropy", raw);
                        None
                    }
                }),
            export_folder: env::var("EXPORT_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_folder),
            export_base_name: env::var("EXPORT_BASE_NAME")
                .unwrap_or(defaults.export_base_name),
            export_extension: env::var("EXPORT_EXTENSION")
                .map(|ext| ext.trim_start_matches('.').to_string())
                .unwrap_or(defaults.export_extension),
        };

        if !config.is_configured() {
            warn!("Database target not fully configured - set DATABASE_URL or HOSPITAL_DB_* variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        self.database_url.is_some()
            || (!self.db_host.is_empty() && !self.db_user.is_empty() && !self.db_name.is_empty())
    }
}

fn parse_or<T: FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{}={} is invalid, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
