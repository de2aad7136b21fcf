use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("{what} title must not be empty")]
    EmptyTitle { what: &'static str },

    #[error("Invalid task status: {0}")]
    InvalidStatus(String),

    #[error("Invalid custom task ID format: {0}")]
    InvalidCustomTaskId(String),

    #[error("Custom column not found: {0}")]
    CustomColumnNotFound(String),

    #[error("Custom task not found: {0}")]
    CustomTaskNotFound(String),

    #[error("Card not found on board: {0}")]
    CardNotFound(String),

    #[error("Maintenance task not found: {0}")]
    TaskNotFound(String),

    #[error("Task service error: {0}")]
    Backend(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "sqlite-storage")]
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}
