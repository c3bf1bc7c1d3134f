//! Conversation domain module.
//!
//! Models the guided philosopher-to-instructor conversation: phases,
//! messages, the reveal rule, transcript formatting and report decoding.

mod engine;
mod message;
mod phase;
mod report;
mod state;
mod transcript;
pub mod configs;

pub use configs::PersonaPromptTable;
pub use engine::{RevealPolicy, DEFAULT_REVEAL_AFTER_USER_TURNS, DEFAULT_TRIGGER_WORDS};
pub use message::{Message, MessageTag, Role};
pub use phase::Phase;
pub use report::{AnalysisReport, ReportDecodeError, ReportParser};
pub use state::ConversationState;
pub use transcript::{ChatTurn, TranscriptFormatter, TurnRole};
