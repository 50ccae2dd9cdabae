//! File-backed state store.
//!
//! Each location's state is one JSON document, `<dir>/<location>.json`.
//! Writes go to a temporary sibling first and are renamed into place so a
//! crash mid-write leaves the previous state readable.

use std::fs::{self, create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::{SchedulerError, SchedulerState, StateStore};

/// File-backed state store using one JSON document per location.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Create a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_all(&dir).map_err(|e| SchedulerError::Backend(e.to_string()))?;
        Ok(Self { dir })
    }

    fn file_path(&self, location_id: &str) -> PathBuf {
        let safe: String = location_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl StateStore for FileStateStore {
    fn load(&self, location_id: &str) -> Result<Option<SchedulerState>, SchedulerError> {
        let path = self.file_path(location_id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).map_err(|e| SchedulerError::Backend(e.to_string()))?;
        let state = serde_json::from_str(&raw).map_err(|e| {
            SchedulerError::Backend(format!("corrupt state file {}: {e}", path.display()))
        })?;
        Ok(Some(state))
    }

    fn save(&self, location_id: &str, state: &SchedulerState) -> Result<(), SchedulerError> {
        let path = self.file_path(location_id);
        let tmp = path.with_extension("json.tmp");
        let body =
            serde_json::to_vec_pretty(state).map_err(|e| SchedulerError::Backend(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .map_err(|e| SchedulerError::Backend(e.to_string()))?;
        file.write_all(&body)
            .and_then(|()| file.sync_all())
            .map_err(|e| SchedulerError::Backend(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| SchedulerError::Backend(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CyclePhase, Message, MessageStatus, PriorityBuffer, PriorityScore};

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("engagement-state-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_save_and_load() {
        let dir = temp_dir();
        let store = FileStateStore::new(&dir).unwrap();
        assert!(store.load("home/1").unwrap().is_none());

        let mut buffer = PriorityBuffer::new();
        buffer.add_message(
            Message::new("m1", "sleep", MessageStatus::Ready, 100, 1_000_000).unwrap(),
            PriorityScore::HIGH,
        );
        let state = SchedulerState {
            phase: CyclePhase::Idle,
            buffer: buffer.snapshot(),
            ..SchedulerState::default()
        };
        store.save("home/1", &state).unwrap();

        let reopened = FileStateStore::new(&dir).unwrap();
        assert_eq!(reopened.load("home/1").unwrap(), Some(state));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_corrupt_file_is_backend_error() {
        let dir = temp_dir();
        let store = FileStateStore::new(&dir).unwrap();
        fs::write(dir.join("home.json"), "{not json").unwrap();
        assert!(matches!(store.load("home"), Err(SchedulerError::Backend(_))));
        let _ = fs::remove_dir_all(dir);
    }
}
