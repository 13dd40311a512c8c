//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::SyncError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &SyncError) -> String {
    match e {
        SyncError::Remote(_) => format!(
            "Sync failed: {}. The queue is unchanged; run sync again to retry.",
            e
        ),
        SyncError::Index(_) => format!("Sync aborted: {}. Nothing was written.", e),
        _ => e.to_string(),
    }
}
