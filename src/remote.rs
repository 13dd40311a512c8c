//! Remote Word List
//!
//! The authoritative word list and n-gram index live in a remote repository.
//! This module defines the seam the sync service talks to and its
//! GitHub implementation.

use crate::error::RemoteError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod github;
#[cfg(test)]
mod memory;

pub use github::GitHubRemote;
#[cfg(test)]
pub(crate) use memory::MemoryRemote;

/// The two files the bot owns on the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteFile {
    Words,
    Ngrams,
}

impl RemoteFile {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteFile::Words => "words",
            RemoteFile::Ngrams => "ngrams",
        }
    }
}

/// File contents plus the revision token needed to overwrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFile {
    pub content: String,
    pub revision: Option<String>,
}

/// Remote store client trait
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Download the current contents of `file`.
    async fn fetch(&self, file: RemoteFile) -> Result<FetchedFile, RemoteError>;

    /// Overwrite `file`. `revision` is the token returned by the fetch this
    /// write is based on.
    async fn write(
        &self,
        file: RemoteFile,
        content: &str,
        revision: Option<&str>,
        message: &str,
    ) -> Result<(), RemoteError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
