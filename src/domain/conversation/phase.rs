//! Conversation phases.
//!
//! The phase decides which persona the model speaks with and which
//! user actions are legal. Exactly one phase is active at a time.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The stage of the guided conversation.
///
/// Phases flow in one direction, with `reset` as the only way back:
/// - `Welcome` → `Philosophy` → `Reveal` → `Report`
///
/// `Welcome` and `Report` are entry/exit states; `Philosophy` and `Reveal`
/// are the conversational states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing said yet, waiting for the opening message.
    #[default]
    Welcome,

    /// The philosopher persona is listening.
    Philosophy,

    /// The instructor persona has been revealed.
    Reveal,

    /// The analysis report has been produced. Terminal until reset.
    Report,
}

impl Phase {
    /// All phases in lifecycle order.
    pub const ALL: [Phase; 4] = [Phase::Welcome, Phase::Philosophy, Phase::Reveal, Phase::Report];

    /// Returns a short label suitable for UI display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Philosophy => "Philosophy",
            Self::Reveal => "Reveal",
            Self::Report => "Report",
        }
    }

    /// Returns true if the user can type messages in this phase.
    pub fn is_conversational(&self) -> bool {
        matches!(self, Self::Philosophy | Self::Reveal)
    }

    /// Returns true if the secondary persona has been disclosed.
    pub fn is_revealed(&self) -> bool {
        matches!(self, Self::Reveal | Self::Report)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl StateMachine for Phase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use Phase::*;
        matches!(
            (self, target),
            (Welcome, Philosophy) | (Philosophy, Reveal) | (Reveal, Report)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Phase::*;
        match self {
            Welcome => vec![Philosophy],
            Philosophy => vec![Reveal],
            Reveal => vec![Report],
            Report => vec![],
        }
    }
}
