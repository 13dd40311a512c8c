//! Sync Service
//!
//! Sole owner of the edit queue. Proposals and sync cycles both take the queue
//! lock, so a proposal arriving mid-sync waits until the cycle finishes.
//!
//! Commit order for a cycle: write the word list, write the index, then clear
//! and save the queue. Any failure before the clear leaves the queue exactly as
//! it was, so the trigger can simply be retried.

use crate::announce::{commit_message, Announcement};
use crate::error::SyncError;
use crate::events::Proposal;
use crate::index::NgramIndex;
use crate::queue::{EditQueue, QueueStore};
use crate::reconcile::{reconcile, Reconciliation};
use crate::remote::{FetchedFile, RemoteFile, RemoteStore};
use crate::wordlist::parse_words;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// The contributor whose proposal was just confirmed should get the
/// contributor role. Acting on it is up to the chat side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrantHint {
    pub contributor_id: String,
}

/// Result of a sync trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing was queued; the remote was not contacted.
    Empty,
    Synced(Announcement),
}

pub struct SyncService {
    queue: Mutex<EditQueue>,
    store: Arc<dyn QueueStore>,
    remote: Arc<dyn RemoteStore>,
}

impl SyncService {
    /// Load the saved queue and take ownership of it.
    pub fn new(
        store: Arc<dyn QueueStore>,
        remote: Arc<dyn RemoteStore>,
    ) -> Result<Self, SyncError> {
        let queue = store.load()?;
        info!(
            pending_adds = queue.pending_adds.len(),
            pending_dels = queue.pending_dels.len(),
            contributors = queue.contributors.len(),
            remote = remote.name(),
            "Loaded edit queue"
        );
        Ok(Self {
            queue: Mutex::new(queue),
            store,
            remote,
        })
    }

    /// Queue a confirmed proposal and persist the queue.
    ///
    /// The in-memory queue only changes once the save has succeeded.
    pub async fn record_proposal(&self, proposal: &Proposal) -> Result<RoleGrantHint, SyncError> {
        if proposal.word.trim().is_empty() {
            return Err(SyncError::InvalidProposal("word is empty".to_string()));
        }
        if proposal.contributor_id.is_empty() {
            return Err(SyncError::InvalidProposal(
                "contributor id is empty".to_string(),
            ));
        }

        let mut queue = self.queue.lock().await;
        let mut next = queue.clone();
        next.record(proposal.word.trim(), proposal.kind, &proposal.contributor_id);
        self.store.save(&next)?;
        *queue = next;

        info!(
            word = %proposal.word,
            kind = ?proposal.kind,
            contributor = %proposal.contributor_id,
            pending_adds = queue.pending_adds.len(),
            pending_dels = queue.pending_dels.len(),
            "Recorded proposal"
        );

        Ok(RoleGrantHint {
            contributor_id: proposal.contributor_id.clone(),
        })
    }

    /// Copy of the current queue.
    pub async fn queue_snapshot(&self) -> EditQueue {
        self.queue.lock().await.clone()
    }

    /// Run one sync cycle.
    pub async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let mut queue = self.queue.lock().await;
        if queue.is_empty() {
            info!("Sync requested with an empty queue");
            return Ok(SyncOutcome::Empty);
        }

        let started = Instant::now();
        let (words_file, ngrams_file, result) = self.fetch_and_reconcile(&queue).await?;
        let message = commit_message(queue.pending_adds.len(), queue.pending_dels.len());

        self.remote
            .write(
                RemoteFile::Words,
                &result.words_content(),
                words_file.revision.as_deref(),
                &message,
            )
            .await
            .map_err(|e| {
                warn!(error = %e, "Word list write failed; queue left intact");
                e
            })?;
        self.remote
            .write(
                RemoteFile::Ngrams,
                &result.index_content(),
                ngrams_file.revision.as_deref(),
                &message,
            )
            .await
            .map_err(|e| {
                warn!(error = %e, "N-gram index write failed; queue left intact");
                e
            })?;

        let announcement = self.announcement(&queue, result);

        let cleared = EditQueue::new();
        if let Err(e) = self.store.save(&cleared) {
            // Remote is already updated; re-running the batch is harmless.
            warn!(error = %e, "Remote updated but the cleared queue could not be saved");
            return Err(e.into());
        }
        *queue = cleared;

        info!(
            total_words = announcement.total_words,
            added = announcement.added_count,
            removed = announcement.removed_count,
            ngram_changes = announcement.changes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Sync completed"
        );
        Ok(SyncOutcome::Synced(announcement))
    }

    /// Everything `sync` would do except the writes and the queue clear.
    pub async fn preview(&self) -> Result<SyncOutcome, SyncError> {
        let queue = self.queue.lock().await;
        if queue.is_empty() {
            return Ok(SyncOutcome::Empty);
        }
        let (_, _, result) = self.fetch_and_reconcile(&queue).await?;
        Ok(SyncOutcome::Synced(self.announcement(&queue, result)))
    }

    async fn fetch_and_reconcile(
        &self,
        queue: &EditQueue,
    ) -> Result<(FetchedFile, FetchedFile, Reconciliation), SyncError> {
        let (words_file, ngrams_file) = futures::try_join!(
            self.remote.fetch(RemoteFile::Words),
            self.remote.fetch(RemoteFile::Ngrams)
        )
        .map_err(|e| {
            warn!(error = %e, "Failed to download the current list");
            e
        })?;

        let fetched_words = parse_words(&words_file.content);
        let fetched_index = NgramIndex::parse(&ngrams_file.content).map_err(|e| {
            warn!(error = %e, "Remote n-gram index is malformed; aborting sync");
            e
        })?;
        debug!(
            fetched_words = fetched_words.len(),
            fetched_ngrams = fetched_index.len(),
            "Fetched remote state"
        );

        let result = reconcile(
            &queue.pending_adds,
            &queue.pending_dels,
            &fetched_words,
            &fetched_index,
        );
        Ok((words_file, ngrams_file, result))
    }

    fn announcement(&self, queue: &EditQueue, result: Reconciliation) -> Announcement {
        Announcement::new(
            result.merged.len(),
            queue.pending_adds.len(),
            queue.pending_dels.len(),
            result.summary,
            queue.contributors.iter().cloned().collect(),
        )
    }
}
