//! Runtime configuration.
//!
//! Read from a TOML file, then overridden by environment variables:
//!
//! | Variable | Field |
//! |---|---|
//! | `PATIENT_RECORDS_DB` | `database_path` |
//! | `PATIENT_RECORDS_PAGE_SIZE` | `page_size` |
//! | `PATIENT_RECORDS_LOG` | `log_filter` |

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::DEFAULT_PAGE_SIZE;

pub const ENV_DATABASE_PATH: &str = "PATIENT_RECORDS_DB";
pub const ENV_PAGE_SIZE: &str = "PATIENT_RECORDS_PAGE_SIZE";
pub const ENV_LOG_FILTER: &str = "PATIENT_RECORDS_LOG";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding the record collection
    pub database_path: PathBuf,
    /// Records per page in the listing
    pub page_size: usize,
    /// `tracing` filter directive, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("patient_records.db"),
            page_size: DEFAULT_PAGE_SIZE,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from a TOML file and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)?
            .with_overrides(|key| std::env::var(key).ok())?
            .validated()
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> ConfigResult<Self> {
        Self::default()
            .with_overrides(|key| std::env::var(key).ok())?
            .validated()
    }

    /// Parse TOML without consulting the environment.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from `lookup`, keyed by the `PATIENT_RECORDS_*` names.
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATABASE_PATH) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(size) = lookup(ENV_PAGE_SIZE) {
            self.page_size = size.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "page_size",
                reason: format!("not a number: {size:?}"),
            })?;
        }
        if let Some(filter) = lookup(ENV_LOG_FILTER) {
            self.log_filter = filter;
        }
        Ok(self)
    }

    fn validated(self) -> ConfigResult<Self> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}
