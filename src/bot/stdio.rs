//! Line-delimited JSON adapter.
//!
//! Reads one event per line, hands them to a [`BotHandler`] strictly one at a
//! time through a single-consumer channel, and writes one reply per event.

use super::{BotHandler, GrantStatus, Recorded};
use crate::announce::{render_text, Announcement};
use crate::config::AnnounceConfig;
use crate::events::{Proposal, ReactionEvent};
use crate::queue::EditKind;
use crate::sync::SyncOutcome;
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

const EVENT_BUFFER: usize = 64;

/// Inbound event, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Reaction(ReactionEvent),
    Proposal {
        word: String,
        is_addition: bool,
        contributor_id: String,
    },
    Sync,
}

/// Reply written for every inbound line.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    /// Not a confirmation; nothing changed
    Ignored,
    Recorded {
        word: String,
        kind: EditKind,
        /// Contributor who should hold the contributor role
        grant_role_to: String,
        grant: GrantStatus,
    },
    QueueEmpty,
    Synced {
        announcement: Announcement,
        text: String,
    },
    Error {
        message: String,
    },
}

impl Reply {
    fn recorded(recorded: Recorded) -> Self {
        Reply::Recorded {
            word: recorded.proposal.word,
            kind: recorded.proposal.kind,
            grant_role_to: recorded.hint.contributor_id,
            grant: recorded.grant,
        }
    }
}

/// Handle one raw line.
pub async fn dispatch(handler: &dyn BotHandler, line: &str, announce: &AnnounceConfig) -> Reply {
    let event: InboundEvent = match serde_json::from_str(line) {
        Ok(event) => event,
        Err(e) => {
            return Reply::Error {
                message: format!("Invalid event: {}", e),
            }
        }
    };
    debug!(event = ?event, "Dispatching event");

    let result = match event {
        InboundEvent::Reaction(reaction) => handler
            .on_reaction(reaction)
            .await
            .map(|r| r.map(Reply::recorded).unwrap_or(Reply::Ignored)),
        InboundEvent::Proposal {
            word,
            is_addition,
            contributor_id,
        } => {
            let kind = if is_addition {
                EditKind::Add
            } else {
                EditKind::Remove
            };
            handler
                .on_proposal(Proposal::new(&word, kind, contributor_id))
                .await
                .map(Reply::recorded)
        }
        InboundEvent::Sync => handler.on_sync_command().await.map(|outcome| match outcome {
            SyncOutcome::Empty => Reply::QueueEmpty,
            SyncOutcome::Synced(announcement) => {
                let text = render_text(
                    &announcement,
                    announce.prompt_threshold,
                    announce.mention_role_id.as_deref(),
                );
                Reply::Synced { announcement, text }
            }
        }),
    };

    result.unwrap_or_else(|e| {
        error!(error = %e, "Event failed");
        Reply::Error {
            message: e.to_string(),
        }
    })
}

/// Run until `reader` reaches end of input.
pub async fn run<R, W>(
    handler: Arc<dyn BotHandler>,
    reader: R,
    mut writer: W,
    announce: AnnounceConfig,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::channel::<String>(EVENT_BUFFER);

    let reader_task = tokio::spawn(async move {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if tx.send(line).await.is_err() {
                break;
            }
        }
        Ok::<(), io::Error>(())
    });

    info!("Event loop started");
    while let Some(line) = rx.recv().await {
        let reply = dispatch(handler.as_ref(), &line, &announce).await;
        let mut out = serde_json::to_string(&reply)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }
    info!("Event loop finished");

    reader_task
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))??;
    Ok(())
}
