//! Edit Queue
//!
//! The pending additions, pending deletions and contributors of the current
//! batch, plus the durable stores that keep them across restarts.

use crate::error::StorageError;
use crate::wordlist::WordSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

mod file;
mod sled_store;

pub use file::JsonFileQueueStore;
pub use sled_store::SledQueueStore;

/// Whether a proposal adds or removes its word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Add,
    Remove,
}

/// Queued edits for the next sync.
///
/// Field names match the persisted record. Missing fields load as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditQueue {
    #[serde(default)]
    pub pending_adds: WordSet,
    #[serde(default)]
    pub pending_dels: WordSet,
    #[serde(default)]
    pub contributors: BTreeSet<String>,
}

impl EditQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `word` and remember who proposed it.
    pub fn record(&mut self, word: &str, kind: EditKind, contributor: &str) {
        match kind {
            EditKind::Add => self.pending_adds.insert(word.to_string()),
            EditKind::Remove => self.pending_dels.insert(word.to_string()),
        };
        self.contributors.insert(contributor.to_string());
    }

    /// No word edits queued. Contributors alone do not make a batch.
    pub fn is_empty(&self) -> bool {
        self.pending_adds.is_empty() && self.pending_dels.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending_adds.clear();
        self.pending_dels.clear();
        self.contributors.clear();
    }

    pub(crate) fn to_json(&self) -> Result<Vec<u8>, StorageError> {
        serde_json::to_vec_pretty(self).map_err(|e| StorageError::Serialize(e.to_string()))
    }

    pub(crate) fn from_json(bytes: &[u8]) -> Result<Self, StorageError> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::Deserialize(e.to_string()))
    }
}

/// Durable home of the [`EditQueue`]. Last completed save wins.
pub trait QueueStore: Send + Sync {
    /// Load the saved queue, empty when nothing was saved yet.
    fn load(&self) -> Result<EditQueue, StorageError>;

    /// Replace the saved queue with `queue`.
    fn save(&self, queue: &EditQueue) -> Result<(), StorageError>;
}
