//! Configuration System
//!
//! Layered configuration for the bot: built-in defaults, the user-level file,
//! workspace files, then `WORDSYNC__*` environment variables. Validated before
//! use so a missing repository or channel id fails at startup, not mid-sync.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// Where the authoritative word list lives
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Durable queue location and backend
    #[serde(default)]
    pub queue: QueueConfig,

    /// Which reactions count as confirmations
    #[serde(default)]
    pub channels: ChannelConfig,

    /// Announcement rendering
    #[serde(default)]
    pub announce: AnnounceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote repository holding the word list and n-gram index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// GitHub API base; both files are read and written through it
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// `owner/name`
    #[serde(default)]
    pub repo: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_words_path")]
    pub words_path: String,

    #[serde(default = "default_ngrams_path")]
    pub ngrams_path: String,

    /// Name of the environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_words_path() -> String {
    "words.txt".to_string()
}

fn default_ngrams_path() -> String {
    "ngrams.txt".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            repo: String::new(),
            branch: default_branch(),
            words_path: default_words_path(),
            ngrams_path: default_ngrams_path(),
            token_env: default_token_env(),
        }
    }
}

impl RemoteConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.repo.split('/').filter(|p| !p.is_empty()).count() != 2 {
            return Err(format!("repo must be 'owner/name', got '{}'", self.repo));
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(format!("api_url must be an http(s) URL, got '{}'", self.api_url));
        }
        if self.words_path.is_empty() || self.ngrams_path.is_empty() {
            return Err("words_path and ngrams_path cannot be empty".to_string());
        }
        if self.words_path == self.ngrams_path {
            return Err("words_path and ngrams_path must differ".to_string());
        }
        Ok(())
    }
}

/// Queue store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueueBackend {
    #[default]
    Json,
    Sled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default)]
    pub backend: QueueBackend,

    /// Record location, relative to the workspace root unless absolute
    #[serde(default = "default_queue_path")]
    pub path: PathBuf,
}

fn default_queue_path() -> PathBuf {
    PathBuf::from("queue.json")
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            backend: QueueBackend::default(),
            path: default_queue_path(),
        }
    }
}

impl QueueConfig {
    pub fn resolve_path(&self, workspace_root: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            workspace_root.join(&self.path)
        }
    }
}

/// Chat channels whose confirmed messages become proposals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default)]
    pub add_channel_id: String,

    #[serde(default)]
    pub del_channel_id: String,

    #[serde(default = "default_confirm_emoji")]
    pub confirm_emoji: String,

    /// Reactions from this user (the bot itself) are ignored
    #[serde(default)]
    pub bot_user_id: Option<String>,

    /// Role granted to anyone whose proposal is confirmed
    #[serde(default)]
    pub contributor_role_id: Option<String>,
}

fn default_confirm_emoji() -> String {
    "✅".to_string()
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            add_channel_id: String::new(),
            del_channel_id: String::new(),
            confirm_emoji: default_confirm_emoji(),
            bot_user_id: None,
            contributor_role_id: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnounceConfig {
    /// Changes between two non-zero counts are listed only at or below this
    /// count, or when they cross it
    #[serde(default = "default_prompt_threshold")]
    pub prompt_threshold: u32,

    /// Role mentioned at the top of each announcement
    #[serde(default)]
    pub mention_role_id: Option<String>,
}

fn default_prompt_threshold() -> u32 {
    8
}

impl Default for AnnounceConfig {
    fn default() -> Self {
        Self {
            prompt_threshold: default_prompt_threshold(),
            mention_role_id: None,
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Remote(String),
    Queue(String),
    Channels(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Remote(msg) => write!(f, "Remote: {}", msg),
            ValidationError::Queue(msg) => write!(f, "Queue: {}", msg),
            ValidationError::Channels(msg) => write!(f, "Channels: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl BotConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.remote.validate() {
            errors.push(ValidationError::Remote(e));
        }

        if self.queue.path.as_os_str().is_empty() {
            errors.push(ValidationError::Queue("path cannot be empty".to_string()));
        }

        if !self.channels.add_channel_id.is_empty()
            && self.channels.add_channel_id == self.channels.del_channel_id
        {
            errors.push(ValidationError::Channels(
                "add and delete channels must differ".to_string(),
            ));
        }
        if self.channels.confirm_emoji.is_empty() {
            errors.push(ValidationError::Channels(
                "confirm_emoji cannot be empty".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
