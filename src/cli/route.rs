//! CLI route: single route table and run context.

use crate::bot::{stdio, NoopRoleGranter, SyncBot};
use crate::config::{BotConfig, ConfigLoader, QueueBackend};
use crate::error::SyncError;
use crate::events::{Proposal, ReactionGate};
use crate::queue::{EditKind, JsonFileQueueStore, QueueStore, SledQueueStore};
use crate::remote::GitHubRemote;
use crate::sync::SyncService;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

use crate::cli::parse::{Commands, ProposeKind};
use crate::cli::presentation::{format_ngrams, format_queue_status, format_sync_outcome};

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    workspace_root: PathBuf,
    config: BotConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, SyncError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self::with_config(workspace_root, config))
    }

    pub fn with_config(workspace_root: PathBuf, config: BotConfig) -> Self {
        Self {
            workspace_root,
            config,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    fn validated(&self) -> Result<(), SyncError> {
        self.config.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            SyncError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })
    }

    fn open_store(&self) -> Result<Arc<dyn QueueStore>, SyncError> {
        let path = self.config.queue.resolve_path(&self.workspace_root);
        info!(backend = ?self.config.queue.backend, path = %path.display(), "Opening queue store");
        let store: Arc<dyn QueueStore> = match self.config.queue.backend {
            QueueBackend::Json => Arc::new(JsonFileQueueStore::new(path)),
            QueueBackend::Sled => Arc::new(SledQueueStore::open(path)?),
        };
        Ok(store)
    }

    fn build_service(&self) -> Result<Arc<SyncService>, SyncError> {
        let store = self.open_store()?;
        let remote = Arc::new(GitHubRemote::new(self.config.remote.clone())?);
        Ok(Arc::new(SyncService::new(store, remote)?))
    }

    /// Execute a command and return its output.
    pub async fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        match command {
            Commands::Propose {
                kind,
                word,
                contributor,
            } => {
                let kind = match kind {
                    ProposeKind::Add => EditKind::Add,
                    ProposeKind::Remove => EditKind::Remove,
                };
                let proposal = Proposal::new(word, kind, contributor.clone());
                let service = self.build_service()?;
                service.record_proposal(&proposal).await?;
                let queue = service.queue_snapshot().await;
                Ok(format!(
                    "Queued {} '{}'. Pending: +{} / -{}",
                    if kind == EditKind::Add { "addition of" } else { "removal of" },
                    proposal.word,
                    queue.pending_adds.len(),
                    queue.pending_dels.len()
                ))
            }
            Commands::Status { format } => {
                let service = self.build_service()?;
                format_queue_status(&service.queue_snapshot().await, format)
            }
            Commands::Sync { dry_run, format } => {
                self.validated()?;
                let service = self.build_service()?;
                let outcome = if *dry_run {
                    service.preview().await?
                } else {
                    service.sync().await?
                };
                format_sync_outcome(&outcome, &self.config.announce, format, *dry_run)
            }
            Commands::Ngrams { word } => Ok(format_ngrams(word.trim())),
            Commands::Serve => {
                self.validated()?;
                let service = self.build_service()?;
                let bot = Arc::new(SyncBot::new(
                    service,
                    ReactionGate::new(self.config.channels.clone()),
                    Arc::new(NoopRoleGranter),
                ));
                stdio::run(
                    bot,
                    BufReader::new(tokio::io::stdin()),
                    tokio::io::stdout(),
                    self.config.announce.clone(),
                )
                .await
                .map_err(|e| SyncError::Storage(e.into()))?;
                Ok("Event stream closed.".to_string())
            }
            Commands::Validate => {
                self.validated()?;
                Ok("Configuration is valid.".to_string())
            }
        }
    }
}
