//! Bot event handling
//!
//! The chat side calls one method per event kind. [`SyncBot`] turns reactions
//! into proposals, records them, grants the contributor role best-effort and
//! forwards sync commands to the [`SyncService`].

use crate::error::SyncError;
use crate::events::{Proposal, ReactionEvent, ReactionGate};
use crate::sync::{RoleGrantHint, SyncOutcome, SyncService};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod stdio;

/// Outcome of a best-effort role grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum GrantStatus {
    Granted,
    AlreadyHeld,
    /// No role configured or no chat API to grant through
    Skipped,
    Failed(String),
}

/// Grants the contributor role. Never fails the caller; failures come back
/// as [`GrantStatus::Failed`].
#[async_trait]
pub trait RoleGranter: Send + Sync {
    async fn grant(&self, contributor_id: &str, role_id: &str) -> GrantStatus;
}

/// Granter for environments with no chat API; leaves the hint to the caller.
pub struct NoopRoleGranter;

#[async_trait]
impl RoleGranter for NoopRoleGranter {
    async fn grant(&self, _contributor_id: &str, _role_id: &str) -> GrantStatus {
        GrantStatus::Skipped
    }
}

/// A proposal that made it into the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub proposal: Proposal,
    pub hint: RoleGrantHint,
    pub grant: GrantStatus,
}

/// One method per inbound event kind.
#[async_trait]
pub trait BotHandler: Send + Sync {
    /// A reaction was added. `None` when it is not a confirmation.
    async fn on_reaction(&self, event: ReactionEvent) -> Result<Option<Recorded>, SyncError>;

    /// A proposal already vetted by the chat side.
    async fn on_proposal(&self, proposal: Proposal) -> Result<Recorded, SyncError>;

    /// The privileged sync command.
    async fn on_sync_command(&self) -> Result<SyncOutcome, SyncError>;
}

pub struct SyncBot {
    service: Arc<SyncService>,
    gate: ReactionGate,
    granter: Arc<dyn RoleGranter>,
}

impl SyncBot {
    pub fn new(
        service: Arc<SyncService>,
        gate: ReactionGate,
        granter: Arc<dyn RoleGranter>,
    ) -> Self {
        Self {
            service,
            gate,
            granter,
        }
    }

    pub fn service(&self) -> &SyncService {
        &self.service
    }

    async fn grant_role(&self, contributor_id: &str) -> GrantStatus {
        let Some(role_id) = self.gate.contributor_role_id() else {
            return GrantStatus::Skipped;
        };
        let status = self.granter.grant(contributor_id, role_id).await;
        match &status {
            GrantStatus::Failed(reason) => {
                warn!(
                    contributor = contributor_id,
                    role = role_id,
                    reason = %reason,
                    "Role grant failed"
                )
            }
            other => debug!(
                contributor = contributor_id,
                role = role_id,
                status = ?other,
                "Role grant"
            ),
        }
        status
    }
}

#[async_trait]
impl BotHandler for SyncBot {
    async fn on_reaction(&self, event: ReactionEvent) -> Result<Option<Recorded>, SyncError> {
        match self.gate.evaluate(&event) {
            Some(proposal) => self.on_proposal(proposal).await.map(Some),
            None => Ok(None),
        }
    }

    async fn on_proposal(&self, proposal: Proposal) -> Result<Recorded, SyncError> {
        let hint = self.service.record_proposal(&proposal).await?;
        let grant = self.grant_role(&hint.contributor_id).await;
        Ok(Recorded {
            proposal,
            hint,
            grant,
        })
    }

    async fn on_sync_command(&self) -> Result<SyncOutcome, SyncError> {
        self.service.sync().await
    }
}
