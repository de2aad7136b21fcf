use crate::{domain::CustomBoardState, error::Result};

pub mod file_storage;
pub mod memory;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

pub use file_storage::FileStorage;
pub use memory::InMemoryStorage;

/// Device-local persistence for the custom board.
///
/// Loaded once at startup and written after every mutation. Calls are
/// synchronous; a failed `save` must leave the previously saved snapshot
/// intact.
pub trait CustomStateStorage {
    /// Loads the saved snapshot, or an empty one if nothing has been saved
    fn load(&self) -> Result<CustomBoardState>;

    /// Replaces the saved snapshot
    fn save(&self, state: &CustomBoardState) -> Result<()>;
}

impl<S: CustomStateStorage + ?Sized> CustomStateStorage for Box<S> {
    fn load(&self) -> Result<CustomBoardState> {
        (**self).load()
    }

    fn save(&self, state: &CustomBoardState) -> Result<()> {
        (**self).save(state)
    }
}
