use crate::{
    domain::CustomBoardState,
    error::Result,
    storage::CustomStateStorage,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite key/value storage holding the custom board snapshot
pub struct SqliteStorage {
    connection: Connection,
}

impl SqliteStorage {
    const STATE_KEY: &'static str = "custom_board";

    /// Opens (or creates) the database at `database_path`
    pub fn new(database_path: impl AsRef<Path>) -> Result<Self> {
        Self::with_connection(Connection::open(database_path)?)
    }

    /// Opens a private in-memory database
    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> Result<Self> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(Self { connection })
    }
}

impl CustomStateStorage for SqliteStorage {
    fn load(&self) -> Result<CustomBoardState> {
        let value: Option<String> = self
            .connection
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![Self::STATE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(CustomBoardState::default()),
        }
    }

    fn save(&self, state: &CustomBoardState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.connection.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![Self::STATE_KEY, json],
        )?;
        Ok(())
    }
}
