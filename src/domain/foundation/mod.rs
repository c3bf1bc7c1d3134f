//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the state machine trait and
//! validation errors that form the vocabulary of the conversation domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ConversationId, MessageId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
