//! JSON file queue store.

use super::{EditQueue, QueueStore};
use crate::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores the queue as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileQueueStore {
    path: PathBuf,
}

impl JsonFileQueueStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl QueueStore for JsonFileQueueStore {
    fn load(&self) -> Result<EditQueue, StorageError> {
        if !self.path.exists() {
            return Ok(EditQueue::new());
        }

        let bytes = fs::read(&self.path).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to read queue from {:?}: {}", self.path, e),
            ))
        })?;
        EditQueue::from_json(&bytes)
    }

    /// Writes a temporary sibling file then renames it over the record.
    fn save(&self, queue: &EditQueue) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::IoError(std::io::Error::new(
                        e.kind(),
                        format!("Failed to create parent directory {:?}: {}", parent, e),
                    ))
                })?;
            }
        }

        let serialized = queue.to_json()?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &serialized).map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to write queue to {:?}: {}", temp_path, e),
            ))
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file to {:?}: {}", self.path, e),
            ))
        })?;

        Ok(())
    }
}
