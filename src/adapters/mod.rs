//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat clients (Anthropic, mock)

pub mod ai;

pub use ai::{AnthropicChatClient, AnthropicConfig, MockChatClient};
