//! Shared test utilities for integration tests
//!
//! Centralized setup for environment isolation and for a sync service backed
//! by a temporary queue file and an in-memory remote.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wordsync::error::RemoteError;
use wordsync::index::NgramIndex;
use wordsync::ngrams::DEFAULT_WINDOWS;
use wordsync::queue::JsonFileQueueStore;
use wordsync::remote::{FetchedFile, RemoteFile, RemoteStore};
use wordsync::sync::SyncService;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variable state to restore after test
struct EnvState {
    vars: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture(names: &[&'static str]) -> Self {
        Self {
            vars: names.iter().map(|n| (*n, std::env::var(n).ok())).collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.vars {
            match value {
                Some(orig) => std::env::set_var(name, orig),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointing into `test_dir`, plus the
/// given extra variables set. Everything is restored afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, extra: &[(&'static str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let mut names = vec!["HOME", "XDG_CONFIG_HOME"];
    names.extend(extra.iter().map(|(name, _)| *name));
    let env_state = EnvState::capture(&names);

    let test_home = test_dir.path().join("home");
    let test_config_home = test_dir.path().join("xdg");
    std::fs::create_dir_all(&test_home).unwrap();
    std::fs::create_dir_all(&test_config_home).unwrap();

    std::env::set_var("HOME", &test_home);
    std::env::set_var("XDG_CONFIG_HOME", &test_config_home);
    for (name, value) in extra {
        std::env::set_var(name, value);
    }

    let result = f();
    env_state.restore();
    result
}

pub fn word_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Remote seeded with `words` and the index derived from them.
pub fn seeded_remote(words: &[&str]) -> Arc<MemoryRemote> {
    let set = word_set(words);
    let index = NgramIndex::build(&set, &DEFAULT_WINDOWS);
    let content = set.iter().cloned().collect::<Vec<_>>().join("\n");
    Arc::new(MemoryRemote::new(&content, &index.serialize()))
}

pub struct Harness {
    pub service: SyncService,
    pub remote: Arc<MemoryRemote>,
    pub store: Arc<JsonFileQueueStore>,
    pub dir: TempDir,
}

pub fn harness(remote: Arc<MemoryRemote>) -> Harness {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonFileQueueStore::new(dir.path().join("queue.json")));
    let service = SyncService::new(store.clone(), remote.clone()).unwrap();
    Harness {
        service,
        remote,
        store,
        dir,
    }
}

#[derive(Debug, Default)]
struct RemoteState {
    /// Content and revision per file; each write bumps the revision
    files: HashMap<RemoteFile, (String, u64)>,
    fail_fetch: Option<RemoteFile>,
    fail_write: Option<RemoteFile>,
    /// Content another writer commits right after the next fetch of the file
    commit_after_fetch: Option<(RemoteFile, String)>,
    writes: Vec<(RemoteFile, String)>,
}

/// Remote files held in memory, with the same optimistic revision check as
/// the GitHub contents API.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    state: parking_lot::Mutex<RemoteState>,
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

    pub fn content(&self, file: RemoteFile) -> Option<String> {
        self.state.lock().files.get(&file).map(|(c, _)| c.clone())
    }

    pub fn revision(&self, file: RemoteFile) -> u64 {
        self.state.lock().files.get(&file).map(|(_, r)| *r).unwrap_or(0)
    }

    pub fn fail_fetch(&self, file: Option<RemoteFile>) {
        self.state.lock().fail_fetch = file;
    }

    pub fn fail_write(&self, file: Option<RemoteFile>) {
        self.state.lock().fail_write = file;
    }

    /// Have another writer replace `file` with `content` as soon as the next
    /// fetch of it returns.
    pub fn commit_after_fetch(&self, file: RemoteFile, content: &str) {
        self.state.lock().commit_after_fetch = Some((file, content.to_string()));
    }

    /// Successful writes in order, excluding other writers' commits.
    pub fn writes(&self) -> Vec<(RemoteFile, String)> {
        self.state.lock().writes.clone()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn fetch(&self, file: RemoteFile) -> Result<FetchedFile, RemoteError> {
        let mut state = self.state.lock();
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

        if matches!(&state.commit_after_fetch, Some((target, _)) if *target == file) {
            if let Some((_, next)) = state.commit_after_fetch.take() {
                state.files.insert(file, (next, revision + 1));
            }
        }

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
        _message: &str,
    ) -> Result<(), RemoteError> {
        let mut state = self.state.lock();
        let url = format!("memory://{}", file.as_str());
        if state.fail_write == Some(file) {
            return Err(RemoteError::RequestFailed {
                url,
                message: "injected write failure".to_string(),
            });
        }

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

        state.files.insert(file, (content.to_string(), current + 1));
        state.writes.push((file, content.to_string()));
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
