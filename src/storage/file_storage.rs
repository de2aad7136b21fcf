use crate::{
    domain::CustomBoardState,
    error::Result,
    storage::CustomStateStorage,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// JSON-file storage for the custom board
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const DATA_DIR: &'static str = ".pms-board";
    const STATE_FILE: &'static str = "custom_board.json";
    const TMP_SUFFIX: &'static str = "tmp";

    /// Creates a FileStorage keeping its data under `root/.pms-board`
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().join(Self::DATA_DIR),
        }
    }

    pub fn state_file(&self) -> PathBuf {
        self.root_path.join(Self::STATE_FILE)
    }

    fn tmp_file(&self) -> PathBuf {
        self.state_file().with_extension(Self::TMP_SUFFIX)
    }

    fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_path.exists() {
            fs::create_dir_all(&self.root_path)?;
        }
        Ok(())
    }
}

impl CustomStateStorage for FileStorage {
    fn load(&self) -> Result<CustomBoardState> {
        let file_path = self.state_file();

        if !file_path.exists() {
            return Ok(CustomBoardState::default());
        }

        let contents = fs::read_to_string(&file_path)?;
        let state: CustomBoardState = serde_json::from_str(&contents)?;

        Ok(state)
    }

    fn save(&self, state: &CustomBoardState) -> Result<()> {
        self.ensure_directory_exists()?;

        let json = serde_json::to_string_pretty(state)?;

        // Write then rename so a failed write never truncates the last snapshot
        let tmp = self.tmp_file();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.state_file())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomColumn, CustomTag, CustomTask, CustomTaskId};
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_state() -> CustomBoardState {
        let mut column = CustomColumn::new("Drydock Prep".to_string());
        column.task_ids.push(CustomTaskId::new(1));
        CustomBoardState {
            columns: vec![column],
            tasks: vec![CustomTask {
                id: CustomTaskId::new(1),
                title: "Inspect rudder".to_string(),
                description: "Check pintle wear".to_string(),
                tag: CustomTag::Inspection,
                created_at: Utc::now(),
            }],
        }
    }

    #[test]
    fn test_load_without_saved_state_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let state = storage.load().unwrap();
        assert_eq!(state, CustomBoardState::default());
        assert!(!storage.state_file().exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        let state = sample_state();

        storage.save(&state).unwrap();
        assert!(storage.state_file().exists());
        assert!(!storage.tmp_file().exists());

        let loaded = FileStorage::new(temp_dir.path()).load().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage.save(&sample_state()).unwrap();
        storage.save(&CustomBoardState::default()).unwrap();

        assert_eq!(storage.load().unwrap(), CustomBoardState::default());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());
        storage.ensure_directory_exists().unwrap();
        fs::write(storage.state_file(), "{ not json").unwrap();

        assert!(matches!(
            storage.load(),
            Err(crate::error::BoardError::SerializationError(_))
        ));
    }
}
