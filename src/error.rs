//! Error types for the word list moderation queue.

use thiserror::Error;

/// Queue store errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to serialize queue record: {0}")]
    Serialize(String),

    #[error("Failed to deserialize queue record: {0}")]
    Deserialize(String),

    #[error("Sled error: {0}")]
    Sled(String),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Sled(err.to_string())
    }
}

/// Remote word list errors
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request to {url} failed: {message}")]
    RequestFailed { url: String, message: String },

    #[error("Request to {url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Remote not configured: {0}")]
    NotConfigured(String),
}

/// N-gram index file errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    #[error("Malformed n-gram index line {line_number}: {line:?} (expected ngram:count)")]
    MalformedLine { line_number: usize, line: String },
}

/// Errors surfaced to whoever triggered a proposal or sync
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Queue storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("N-gram index is corrupt: {0}")]
    Index(#[from] IndexError),

    #[error("Invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::ConfigError(err.to_string())
    }
}
