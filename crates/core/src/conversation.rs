//! Conversation turns and the bounded extraction window

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a single conversation.
pub type ConversationId = Uuid;

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// The end user (the lead being qualified)
    User,
    /// The assistant (questions, acknowledgements)
    Assistant,
}

/// A single conversation turn.
///
/// Facts are only ever extracted from `User` turns; assistant turns are
/// carried in the window as context for the understanding service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Check whether this turn was authored by the user.
    pub fn is_user(&self) -> bool {
        self.role == TurnRole::User
    }
}

/// Take the most recent `max_turns` of a conversation history.
///
/// Extraction is recency-bounded: older turns have already been folded into
/// the fact record and are not resent to the understanding service.
pub fn recent_window(turns: &[Turn], max_turns: usize) -> &[Turn] {
    let start = turns.len().saturating_sub(max_turns);
    &turns[start..]
}
