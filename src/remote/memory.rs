//! In-memory remote for unit tests.

use super::{FetchedFile, RemoteFile, RemoteStore};
use crate::error::RemoteError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct MemoryState {
    files: HashMap<RemoteFile, (String, u64)>,
    fail_fetch: Option<RemoteFile>,
    writes: Vec<(RemoteFile, String)>,
}

/// Remote files held in memory. Each write bumps the file's revision.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    state: Mutex<MemoryState>,
}

impl MemoryRemote {
    pub fn new(words: &str, ngrams: &str) -> Self {
        let remote = Self::default();
        {
            let mut state = remote.state.lock();
            state.files.insert(RemoteFile::Words, (words.to_string(), 1));
            state.files.insert(RemoteFile::Ngrams, (ngrams.to_string(), 1));
        }
        remote
    }

    /// Make every fetch of `file` fail until cleared with `None`.
    pub fn fail_fetch(&self, file: Option<RemoteFile>) {
        self.state.lock().fail_fetch = file;
    }

    /// Successful writes in order.
    pub fn writes(&self) -> Vec<(RemoteFile, String)> {
        self.state.lock().writes.clone()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn fetch(&self, file: RemoteFile) -> Result<FetchedFile, RemoteError> {
        let state = self.state.lock();
        if state.fail_fetch == Some(file) {
            return Err(RemoteError::RequestFailed {
                url: format!("memory://{}", file.as_str()),
                message: "injected fetch failure".to_string(),
            });
        }
        let (content, revision) = state
            .files
            .get(&file)
            .cloned()
            .unwrap_or_else(|| (String::new(), 0));
        Ok(FetchedFile {
            content,
            revision: Some(revision.to_string()),
        })
    }

    async fn write(
        &self,
        file: RemoteFile,
        content: &str,
        revision: Option<&str>,
        message: &str,
    ) -> Result<(), RemoteError> {
        let mut state = self.state.lock();
        let url = format!("memory://{}", file.as_str());
        let current = state.files.get(&file).map(|(_, r)| *r).unwrap_or(0);
        if let Some(expected) = revision {
            if expected != current.to_string() {
                return Err(RemoteError::Status {
                    url,
                    status: 409,
                    body: format!("{} does not match {}", expected, current),
                });
            }
        }

        tracing::debug!(file = file.as_str(), commit_message = message, "Memory remote write");
        state.files.insert(file, (content.to_string(), current + 1));
        state.writes.push((file, content.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
