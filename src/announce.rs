//! Announcement of a completed sync.
//!
//! The structured record is what the chat adapter receives; `render_text`
//! produces the plain-text body the bot posts.

use crate::reconcile::{ChangeSummary, NgramChange};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a successful sync, handed to the chat side for posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Words in the list after the sync
    pub total_words: usize,
    /// Size of the addition queue in this batch
    pub added_count: usize,
    /// Size of the deletion queue in this batch
    pub removed_count: usize,
    /// Every n-gram whose count changed, sorted by n-gram
    pub changes: Vec<NgramChange>,
    pub contributors: Vec<String>,
    pub synced_at: DateTime<Utc>,
}

impl Announcement {
    pub fn new(
        total_words: usize,
        added_count: usize,
        removed_count: usize,
        summary: ChangeSummary,
        contributors: Vec<String>,
    ) -> Self {
        Self {
            total_words,
            added_count,
            removed_count,
            changes: summary.changes,
            contributors,
            synced_at: Utc::now(),
        }
    }
}

/// Commit message used for both remote writes.
pub fn commit_message(added: usize, removed: usize) -> String {
    format!("Sync: +{} / -{} words", added, removed)
}

/// Whether a change is worth listing in the announcement.
///
/// Appearing and disappearing n-grams always are. A change between two
/// non-zero counts is listed when it ends at or below `threshold` or crosses it.
pub fn is_notable(change: &NgramChange, threshold: u32) -> bool {
    if change.before == 0 || change.after == 0 {
        return true;
    }
    let crosses = (change.before <= threshold) != (change.after <= threshold);
    change.after <= threshold || crosses
}

/// `KEY (before -> after).` entries, upper-cased. Removals first, then
/// additions, then count changes, each group in n-gram order.
pub fn render_prompts(changes: &[NgramChange], threshold: u32) -> String {
    let removed = changes.iter().filter(|c| c.is_removed());
    let added = changes.iter().filter(|c| c.is_new());
    let moved = changes
        .iter()
        .filter(|c| !c.is_new() && !c.is_removed() && is_notable(c, threshold));

    removed
        .chain(added)
        .chain(moved)
        .map(|c| format!("{} ({} -> {}).", c.ngram.to_uppercase(), c.before, c.after))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Plain-text announcement body.
pub fn render_text(
    announcement: &Announcement,
    threshold: u32,
    mention_role: Option<&str>,
) -> String {
    let mut out = String::new();
    if let Some(role) = mention_role {
        out.push_str(&format!("<@&{}>\n", role));
    }
    out.push_str(&format!(
        "There are now a total of {} words in the list, this iteration adding {} \
         and removing {} words. Here are the prompt changes, summarized:\n",
        announcement.total_words, announcement.added_count, announcement.removed_count
    ));

    let prompts = render_prompts(&announcement.changes, threshold);
    out.push_str("Prompts: ");
    out.push_str(if prompts.is_empty() { "none" } else { &prompts });
    out.push('\n');

    let mentions = announcement
        .contributors
        .iter()
        .map(|id| format!("<@{}>", id))
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str("Contributors: ");
    out.push_str(&mentions);
    out
}
