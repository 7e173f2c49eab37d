use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::warn;
use tempfile::NamedTempFile;

use crate::model::task::Task;

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no per-user application data directory available")]
    NoDataDir,
    #[error("could not create {path}: {source}")]
    CreateDirError {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: io::Error,
    },
    #[error("could not serialize task data: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Persistence port for the task store. Implementations own the data format;
/// the store only hands collections across this seam.
pub trait Storage {
    /// Load every persisted task. A backend with no prior data returns an
    /// empty collection, not an error.
    fn load_all(&self) -> Result<Vec<Task>, StorageError>;

    /// Persist the full collection, replacing any prior state. On success no
    /// partially-written state is observable.
    fn save_all(&mut self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// File-backed storage: one JSON document holding every task, kept under the
/// per-user application data directory.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage rooted at `<local-app-data>/<app_name>/data.json`, creating
    /// the directory if needed.
    pub fn in_user_data_dir(app_name: &str) -> Result<JsonFileStorage, StorageError> {
        let dir = dirs::data_local_dir()
            .ok_or(StorageError::NoDataDir)?
            .join(app_name);
        fs::create_dir_all(&dir).map_err(|e| StorageError::CreateDirError {
            path: dir.clone(),
            source: e,
        })?;
        Ok(JsonFileStorage {
            path: dir.join("data.json"),
        })
    }

    /// Storage at an explicit file path.
    pub fn at_path(path: impl Into<PathBuf>) -> JsonFileStorage {
        JsonFileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn load_all(&self) -> Result<Vec<Task>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                // Missing or unreadable data file means a fresh start, never
                // a crash on launch.
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("could not read {}: {}", self.path.display(), e);
                }
                return Ok(Vec::new());
            }
        };

        match serde_json::from_str(&text) {
            Ok(tasks) => Ok(tasks),
            Err(e) => {
                warn!("malformed data file {}: {}", self.path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    fn save_all(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(tasks)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| StorageError::WriteError {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use crate::model::task::Priority;

    #[test]
    fn load_missing_file_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = JsonFileStorage::at_path(tmp.path().join("data.json"));
        assert!(storage.load_all().unwrap().is_empty());
    }

    #[test]
    fn load_malformed_file_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        fs::write(&path, "not json {{{").unwrap();
        let storage = JsonFileStorage::at_path(path);
        assert!(storage.load_all().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::at_path(tmp.path().join("data.json"));

        let mut dated = Task::new("Buy groceries");
        dated.description = "Milk, eggs".into();
        dated.deadline = Some(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        dated.priority = Priority::High;

        let mut undated = Task::new("Someday project");
        undated.is_done = true;

        storage.save_all(&[dated.clone(), undated.clone()]).unwrap();
        let loaded = storage.load_all().unwrap();

        assert_eq!(loaded, vec![dated, undated]);
        // The absent deadline survives as absent, not as a sentinel date.
        assert_eq!(loaded[1].deadline, None);
    }

    #[test]
    fn save_overwrites_prior_state() {
        let tmp = TempDir::new().unwrap();
        let mut storage = JsonFileStorage::at_path(tmp.path().join("data.json"));

        storage
            .save_all(&[Task::new("first"), Task::new("second")])
            .unwrap();
        storage.save_all(&[Task::new("only")]).unwrap();

        let loaded = storage.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "only");
    }

    #[test]
    fn save_to_unwritable_path_fails() {
        let tmp = TempDir::new().unwrap();
        // Parent directory does not exist and is not created by save.
        let mut storage = JsonFileStorage::at_path(tmp.path().join("missing/data.json"));
        assert!(storage.save_all(&[Task::new("t")]).is_err());
    }
}
