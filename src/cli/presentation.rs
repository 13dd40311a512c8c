//! Presentation: text and JSON formatting for CLI results.

use crate::announce::render_text;
use crate::config::AnnounceConfig;
use crate::error::SyncError;
use crate::index::is_excluded;
use crate::ngrams::default_ngrams;
use crate::queue::EditQueue;
use crate::sync::SyncOutcome;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use std::collections::BTreeSet;

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, SyncError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| SyncError::ConfigError(format!("Failed to render JSON: {}", e)))
}

pub fn format_queue_status_text(queue: &EditQueue) -> String {
    if queue.is_empty() {
        return "Queue is empty.".to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Word", "Action"]);
    for word in &queue.pending_adds {
        let action = if queue.pending_dels.contains(word) {
            "add (overridden by remove)"
        } else {
            "add"
        };
        table.add_row(vec![word.as_str(), action]);
    }
    for word in queue
        .pending_dels
        .iter()
        .filter(|w| !queue.pending_adds.contains(*w))
    {
        table.add_row(vec![word.as_str(), "remove"]);
    }

    format!(
        "Pending: +{} / -{} from {} contributor(s)\n{}",
        queue.pending_adds.len(),
        queue.pending_dels.len(),
        queue.contributors.len(),
        table
    )
}

pub fn format_queue_status(queue: &EditQueue, format: &str) -> Result<String, SyncError> {
    match format {
        "json" => to_json(queue),
        _ => Ok(format_queue_status_text(queue)),
    }
}

pub fn format_sync_outcome(
    outcome: &SyncOutcome,
    announce: &AnnounceConfig,
    format: &str,
    dry_run: bool,
) -> Result<String, SyncError> {
    match (outcome, format) {
        (SyncOutcome::Empty, "json") => to_json(&serde_json::json!({ "status": "empty" })),
        (SyncOutcome::Empty, _) => Ok("Queue is empty.".to_string()),
        (SyncOutcome::Synced(announcement), "json") => {
            let status = if dry_run { "preview" } else { "synced" };
            to_json(&serde_json::json!({
                "status": status,
                "announcement": announcement,
            }))
        }
        (SyncOutcome::Synced(announcement), _) => {
            let headline = if dry_run {
                format!(
                    "Dry run: {} words would be live. Nothing was written.",
                    announcement.total_words
                )
            } else {
                format!("Success! {} words are now live.", announcement.total_words)
            };
            Ok(format!(
                "{}\n\n{}",
                headline,
                render_text(announcement, announce.prompt_threshold, None)
            ))
        }
    }
}

/// Distinct n-grams of `word` that would be indexed, in extraction order.
pub fn format_ngrams(word: &str) -> String {
    let mut seen = BTreeSet::new();
    let grams: Vec<&str> = default_ngrams(word)
        .filter(|gram| !is_excluded(gram) && seen.insert(*gram))
        .collect();
    if grams.is_empty() {
        format!("'{}' has no indexed n-grams", word)
    } else {
        grams.join(" ")
    }
}
