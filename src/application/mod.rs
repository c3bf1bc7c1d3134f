//! Application layer - orchestrates the conversation.
//!
//! Coordinates the conversation domain with the `ChatClient` port.

mod conversation_controller;

pub use conversation_controller::{
    ConversationController, ConversationError, ConversationSettings, RevealOutcome, TurnOutcome,
    DEFAULT_FOLLOW_UP_DELAY, DEFAULT_REVEAL_DELAY,
};
