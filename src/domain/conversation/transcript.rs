//! Transcript formatting for model requests.
//!
//! Converts the conversation history into the ordered role/content pairs
//! sent to the model, dropping presentation-only messages.

use serde::{Deserialize, Serialize};

use super::message::{Message, Role};
use super::phase::Phase;

/// Role of a transcript turn as the model sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl From<Role> for TurnRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => TurnRole::User,
            Role::Assistant => TurnRole::Assistant,
        }
    }
}

/// One role/content pair of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }
}

/// Builds model transcripts from conversation history.
///
/// The full filtered history is sent on every call; there is no windowing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptFormatter;

impl TranscriptFormatter {
    /// Formats `history` for a request in `phase`.
    ///
    /// Reveal markers are dropped; everything else keeps its order.
    pub fn format(history: &[Message], phase: Phase) -> Vec<ChatTurn> {
        let turns: Vec<ChatTurn> = history
            .iter()
            .filter(|message| !message.is_reveal_marker())
            .map(|message| ChatTurn::new(message.role().into(), message.text()))
            .collect();

        tracing::trace!(%phase, turns = turns.len(), "formatted transcript");
        turns
    }
}
