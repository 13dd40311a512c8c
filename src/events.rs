//! Chat events reaching the bot.
//!
//! A reaction only becomes a [`Proposal`] when it is the confirm emoji, in one
//! of the two moderation channels, and not placed by the bot itself.

use crate::config::ChannelConfig;
use crate::queue::EditKind;
use serde::{Deserialize, Serialize};

/// A confirmed word list edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub word: String,
    pub kind: EditKind,
    pub contributor_id: String,
}

impl Proposal {
    /// Build a proposal, trimming surrounding whitespace from `word`.
    pub fn new(word: &str, kind: EditKind, contributor_id: impl Into<String>) -> Self {
        Self {
            word: word.trim().to_string(),
            kind,
            contributor_id: contributor_id.into(),
        }
    }

    pub fn is_addition(&self) -> bool {
        self.kind == EditKind::Add
    }
}

/// A reaction added to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub channel_id: String,
    pub emoji: String,
    /// Who placed the reaction
    pub reactor_id: String,
    /// Who wrote the reacted message; credited as contributor
    pub message_author_id: String,
    pub message_content: String,
}

/// Filters reactions down to proposals.
#[derive(Debug, Clone)]
pub struct ReactionGate {
    channels: ChannelConfig,
}

impl ReactionGate {
    pub fn new(channels: ChannelConfig) -> Self {
        Self { channels }
    }

    pub fn evaluate(&self, event: &ReactionEvent) -> Option<Proposal> {
        if self.channels.bot_user_id.as_deref() == Some(event.reactor_id.as_str()) {
            return None;
        }
        if event.emoji != self.channels.confirm_emoji {
            return None;
        }

        let kind = if event.channel_id == self.channels.add_channel_id {
            EditKind::Add
        } else if event.channel_id == self.channels.del_channel_id {
            EditKind::Remove
        } else {
            return None;
        };

        Some(Proposal::new(
            &event.message_content,
            kind,
            event.message_author_id.clone(),
        ))
    }

    pub fn contributor_role_id(&self) -> Option<&str> {
        self.channels.contributor_role_id.as_deref()
    }
}
