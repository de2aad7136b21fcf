//! Runtime configuration, read from the environment (and an optional `.env`).

use crate::{
    error::{BoardError, Result},
    storage::{CustomStateStorage, FileStorage},
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Where the custom board is persisted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(BoardError::ConfigError(format!(
                "Invalid storage backend '{}'. Valid backends: file, sqlite",
                other
            ))),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory the local board data lives under
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
    /// `tracing` filter directive, e.g. `info` or `pms_board_core=debug`
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            storage: StorageBackend::File,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub const DATA_DIR_VAR: &'static str = "PMS_BOARD_DATA_DIR";
    pub const STORAGE_VAR: &'static str = "PMS_BOARD_STORAGE";
    pub const LOG_VAR: &'static str = "PMS_BOARD_LOG";

    /// Reads configuration from the process environment, loading `.env`
    /// first if one exists
    pub fn from_env() -> Result<Self> {
        check_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables from `path`
    /// instead of the nearest `.env`
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        check_dotenv(dotenvy::from_path(path.as_ref()))?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; unset keys fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(Self::DATA_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(storage) = lookup(Self::STORAGE_VAR) {
            config.storage = storage.parse()?;
        }
        if let Some(filter) = lookup(Self::LOG_VAR).filter(|v| !v.trim().is_empty()) {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Opens the configured storage backend
    pub fn open_storage(&self) -> Result<Box<dyn CustomStateStorage + Send>> {
        match self.storage {
            StorageBackend::File => Ok(Box::new(FileStorage::new(&self.data_dir))),
            #[cfg(feature = "sqlite-storage")]
            StorageBackend::Sqlite => {
                std::fs::create_dir_all(&self.data_dir)?;
                let storage =
                    crate::storage::sqlite_storage::SqliteStorage::new(self.data_dir.join("pms-board.db"))?;
                Ok(Box::new(storage))
            }
            #[cfg(not(feature = "sqlite-storage"))]
            StorageBackend::Sqlite => Err(BoardError::ConfigError(
                "sqlite storage requires the 'sqlite-storage' feature".to_string(),
            )),
        }
    }
}

/// A missing `.env` is fine; one that exists but cannot be parsed is not
fn check_dotenv<T>(result: std::result::Result<T, dotenvy::Error>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(BoardError::ConfigError(format!(
            "Failed to read .env file: {}",
            err
        ))),
    }
}
