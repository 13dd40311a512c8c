//! Integration tests for full sync cycles against an in-memory remote
//!
//! Tests cover:
//! - Merge and index regeneration scenarios
//! - Commit boundary: queue cleared only after both writes
//! - Failure paths leave the queue retryable
//! - Queue persistence across restarts

use super::test_utils::{harness, seeded_remote, word_set, MemoryRemote};
use std::sync::Arc;
use wordsync::error::{RemoteError, SyncError};
use wordsync::events::Proposal;
use wordsync::index::NgramIndex;
use wordsync::queue::{EditKind, QueueStore};
use wordsync::remote::RemoteFile;
use wordsync::sync::{SyncOutcome, SyncService};
use wordsync::wordlist::parse_words;

async fn propose(service: &SyncService, word: &str, kind: EditKind, who: &str) {
    service
        .record_proposal(&Proposal::new(word, kind, who))
        .await
        .unwrap();
}

fn synced(outcome: SyncOutcome) -> wordsync::announce::Announcement {
    match outcome {
        SyncOutcome::Synced(announcement) => announcement,
        SyncOutcome::Empty => panic!("expected a completed sync"),
    }
}

#[tokio::test]
async fn test_add_word_updates_list_and_index() {
    let h = harness(seeded_remote(&["cat", "car"]));
    propose(&h.service, "cap", EditKind::Add, "42").await;

    let announcement = synced(h.service.sync().await.unwrap());
    assert_eq!(announcement.total_words, 3);
    assert_eq!(announcement.added_count, 1);
    assert_eq!(announcement.removed_count, 0);
    assert_eq!(announcement.contributors, vec!["42".to_string()]);

    let words = h.remote.content(RemoteFile::Words).unwrap();
    assert_eq!(words, "cap\ncar\ncat");

    let index = NgramIndex::parse(&h.remote.content(RemoteFile::Ngrams).unwrap()).unwrap();
    assert_eq!(index.count("ca"), 3);
    assert_eq!(index.count("at"), 1);
    assert_eq!(index.count("ar"), 1);
    assert_eq!(index.count("ap"), 1);
    assert_eq!(index.count("cat"), 1);

    let ca = announcement.changes.iter().find(|c| c.ngram == "ca").unwrap();
    assert_eq!((ca.before, ca.after), (2, 3));

    assert!(h.service.queue_snapshot().await.is_empty());
    assert!(h.store.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_index_file_is_ordered_by_count() {
    let h = harness(seeded_remote(&["cat", "car"]));
    propose(&h.service, "cap", EditKind::Add, "42").await;
    h.service.sync().await.unwrap();

    let content = h.remote.content(RemoteFile::Ngrams).unwrap();
    let counts: Vec<u32> = content
        .lines()
        .map(|line| line.rsplit_once(':').unwrap().1.parse().unwrap())
        .collect();
    let mut sorted = counts.clone();
    sorted.sort();
    assert_eq!(counts, sorted);
    assert!(content.ends_with("ca:3\n"));
}

#[tokio::test]
async fn test_delete_only_word_removes_every_ngram() {
    let h = harness(seeded_remote(&["cat"]));
    propose(&h.service, "cat", EditKind::Remove, "7").await;

    let announcement = synced(h.service.sync().await.unwrap());
    assert_eq!(announcement.total_words, 0);
    assert_eq!(h.remote.content(RemoteFile::Words).unwrap(), "");
    assert_eq!(h.remote.content(RemoteFile::Ngrams).unwrap(), "");

    let ngrams: Vec<&str> = announcement.changes.iter().map(|c| c.ngram.as_str()).collect();
    assert_eq!(ngrams, vec!["at", "ca", "cat"]);
    assert!(announcement.changes.iter().all(|c| c.before == 1 && c.after == 0));
}

#[tokio::test]
async fn test_deletion_wins_over_addition() {
    let h = harness(seeded_remote(&["dog"]));
    propose(&h.service, "cat", EditKind::Add, "1").await;
    propose(&h.service, "cat", EditKind::Remove, "2").await;
    h.service.sync().await.unwrap();

    let words = parse_words(&h.remote.content(RemoteFile::Words).unwrap());
    assert_eq!(words, word_set(&["dog"]));
}

#[tokio::test]
async fn test_apostrophe_ngrams_never_published() {
    let h = harness(seeded_remote(&[]));
    propose(&h.service, "don't", EditKind::Add, "1").await;
    h.service.sync().await.unwrap();

    let index = NgramIndex::parse(&h.remote.content(RemoteFile::Ngrams).unwrap()).unwrap();
    assert_eq!(index.count("do"), 1);
    assert_eq!(index.count("on"), 1);
    assert_eq!(index.count("n'"), 0);
    assert_eq!(index.count("'t"), 0);
}

#[tokio::test]
async fn test_empty_queue_is_a_no_op() {
    let h = harness(seeded_remote(&["cat"]));
    assert_eq!(h.service.sync().await.unwrap(), SyncOutcome::Empty);
    assert!(h.remote.writes().is_empty());
}

#[tokio::test]
async fn test_failed_index_write_keeps_queue_and_retry_succeeds() {
    let h = harness(seeded_remote(&["cat"]));
    propose(&h.service, "car", EditKind::Add, "1").await;
    h.remote.fail_write(Some(RemoteFile::Ngrams));

    let err = h.service.sync().await.unwrap_err();
    assert!(matches!(err, SyncError::Remote(_)));
    assert!(h.service.queue_snapshot().await.pending_adds.contains("car"));
    assert!(h.store.load().unwrap().pending_adds.contains("car"));

    h.remote.fail_write(None);
    let announcement = synced(h.service.sync().await.unwrap());
    assert_eq!(announcement.total_words, 2);
    assert!(h.service.queue_snapshot().await.is_empty());

    let index = NgramIndex::parse(&h.remote.content(RemoteFile::Ngrams).unwrap()).unwrap();
    assert_eq!(index.count("ca"), 2);
}

#[tokio::test]
async fn test_failed_fetch_keeps_queue() {
    let h = harness(seeded_remote(&["cat"]));
    propose(&h.service, "car", EditKind::Add, "1").await;
    h.remote.fail_fetch(Some(RemoteFile::Words));

    assert!(h.service.sync().await.is_err());
    assert!(h.remote.writes().is_empty());
    assert!(!h.service.queue_snapshot().await.is_empty());
}

#[tokio::test]
async fn test_malformed_index_aborts_without_writes() {
    let remote = Arc::new(MemoryRemote::new("cat", "ca:1\nthis line is broken\n"));
    let h = harness(remote);
    propose(&h.service, "car", EditKind::Add, "1").await;

    let err = h.service.sync().await.unwrap_err();
    assert!(matches!(err, SyncError::Index(_)));
    assert!(h.remote.writes().is_empty());
    assert!(!h.store.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_index_line_aborts_without_writes() {
    let remote = Arc::new(MemoryRemote::new("cat", "ca:1\n\nat:1\ncat:1\n"));
    let h = harness(remote);
    propose(&h.service, "car", EditKind::Add, "1").await;

    let err = h.service.sync().await.unwrap_err();
    assert!(matches!(err, SyncError::Index(_)));
    assert!(h.remote.writes().is_empty());
    assert_eq!(
        h.remote.content(RemoteFile::Ngrams).unwrap(),
        "ca:1\n\nat:1\ncat:1\n"
    );
    assert!(h.store.load().unwrap().pending_adds.contains("car"));
}

#[tokio::test]
async fn test_write_over_newer_version_is_rejected() {
    let h = harness(seeded_remote(&["cat"]));
    propose(&h.service, "car", EditKind::Add, "1").await;
    // Another writer lands "dog" between our read and our write.
    h.remote.commit_after_fetch(RemoteFile::Words, "cat\ndog");

    let err = h.service.sync().await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Remote(RemoteError::Status { status: 409, .. })
    ));
    assert!(h.remote.writes().is_empty());
    assert_eq!(h.remote.content(RemoteFile::Words).unwrap(), "cat\ndog");
    assert!(h.store.load().unwrap().pending_adds.contains("car"));

    // The retry merges against the newer list, so "dog" survives.
    synced(h.service.sync().await.unwrap());
    assert_eq!(h.remote.content(RemoteFile::Words).unwrap(), "car\ncat\ndog");
    assert_eq!(h.remote.revision(RemoteFile::Words), 3);
}

#[tokio::test]
async fn test_queue_survives_restart() {
    let h = harness(seeded_remote(&["cat"]));
    propose(&h.service, "car", EditKind::Add, "1").await;
    propose(&h.service, "cat", EditKind::Remove, "2").await;

    let restarted = SyncService::new(h.store.clone(), h.remote.clone()).unwrap();
    let queue = restarted.queue_snapshot().await;
    assert_eq!(queue.pending_adds, word_set(&["car"]));
    assert_eq!(queue.pending_dels, word_set(&["cat"]));
    assert_eq!(queue.contributors, word_set(&["1", "2"]));
}

#[tokio::test]
async fn test_second_sync_against_own_output_has_no_changes() {
    let h = harness(seeded_remote(&["cat"]));
    propose(&h.service, "dog", EditKind::Add, "1").await;
    h.service.sync().await.unwrap();

    // Re-adding an existing word leaves the index unchanged.
    propose(&h.service, "dog", EditKind::Add, "1").await;
    let announcement = synced(h.service.sync().await.unwrap());
    assert!(announcement.changes.is_empty());
    assert_eq!(announcement.total_words, 2);
}

#[tokio::test]
async fn test_concurrent_proposals_are_all_recorded() {
    let h = harness(seeded_remote(&[]));
    let service = Arc::new(h.service);

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let kind = if i % 2 == 0 { EditKind::Add } else { EditKind::Remove };
            service
                .record_proposal(&Proposal::new(&format!("word{}", i), kind, format!("{}", i)))
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let queue = service.queue_snapshot().await;
    assert_eq!(queue.pending_adds.len(), 10);
    assert_eq!(queue.pending_dels.len(), 10);
    assert_eq!(queue.contributors.len(), 20);
    assert_eq!(h.store.load().unwrap(), queue);
}
