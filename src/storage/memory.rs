//! In-memory storage for ephemeral boards and tests.

use crate::{
    domain::CustomBoardState,
    error::{BoardError, Result},
    storage::CustomStateStorage,
};
use std::sync::{Arc, RwLock};

/// Shared in-memory snapshot. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    state: CustomBoardState,
    saves: usize,
    fail_writes: bool,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing snapshot
    pub fn with_state(state: CustomBoardState) -> Self {
        let storage = Self::default();
        if let Ok(mut inner) = storage.inner.write() {
            inner.state = state;
        }
        storage
    }

    /// Makes every following `save` fail until reset
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.write() {
            inner.fail_writes = fail;
        }
    }

    /// Last successfully saved snapshot
    pub fn snapshot(&self) -> Result<CustomBoardState> {
        self.load()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.inner.read().map(|inner| inner.saves).unwrap_or_default()
    }
}

fn lock_error<T>(_: T) -> BoardError {
    BoardError::StorageError("in-memory storage lock poisoned".to_string())
}

impl CustomStateStorage for InMemoryStorage {
    fn load(&self) -> Result<CustomBoardState> {
        let inner = self.inner.read().map_err(lock_error)?;
        Ok(inner.state.clone())
    }

    fn save(&self, state: &CustomBoardState) -> Result<()> {
        let mut inner = self.inner.write().map_err(lock_error)?;
        if inner.fail_writes {
            return Err(BoardError::StorageError("write rejected".to_string()));
        }
        inner.state = state.clone();
        inner.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CustomColumn;

    #[test]
    fn test_clones_share_state() {
        let storage = InMemoryStorage::new();
        let other = storage.clone();

        let state = CustomBoardState {
            columns: vec![CustomColumn::new("Spares".to_string())],
            tasks: Vec::new(),
        };
        storage.save(&state).unwrap();

        assert_eq!(other.load().unwrap(), state);
        assert_eq!(other.save_count(), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_snapshot() {
        let storage = InMemoryStorage::new();
        storage.set_fail_writes(true);

        let state = CustomBoardState {
            columns: vec![CustomColumn::new("Spares".to_string())],
            tasks: Vec::new(),
        };
        assert!(storage.save(&state).is_err());
        assert_eq!(storage.snapshot().unwrap(), CustomBoardState::default());
        assert_eq!(storage.save_count(), 0);
    }
}
