//! Sled-backed queue store.

use super::{EditQueue, QueueStore};
use crate::error::StorageError;
use sled::{Db, Tree};
use std::path::Path;

const TREE_QUEUE: &str = "edit_queue";
const KEY_QUEUE: &[u8] = b"queue";

/// Keeps the queue as one JSON document under a fixed key.
#[derive(Clone)]
pub struct SledQueueStore {
    // Held so the database outlives the tree handle.
    _db: Db,
    tree: Tree,
}

impl SledQueueStore {
    /// Open (or create) a sled database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    pub fn from_db(db: Db) -> Result<Self, StorageError> {
        let tree = db.open_tree(TREE_QUEUE)?;
        Ok(Self { _db: db, tree })
    }
}

impl QueueStore for SledQueueStore {
    fn load(&self) -> Result<EditQueue, StorageError> {
        let Some(raw) = self.tree.get(KEY_QUEUE)? else {
            return Ok(EditQueue::new());
        };
        EditQueue::from_json(&raw)
    }

    fn save(&self, queue: &EditQueue) -> Result<(), StorageError> {
        let value = queue.to_json()?;
        self.tree.insert(KEY_QUEUE, value)?;
        self.tree.flush()?;
        Ok(())
    }
}
