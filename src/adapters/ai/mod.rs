//! AI Adapters.
//!
//! Implementations of the ChatClient port.
//!
//! ## Available Adapters
//!
//! - `MockChatClient` - Configurable mock for testing
//! - `AnthropicChatClient` - Anthropic Messages API

mod anthropic_client;
mod mock_chat_client;

pub use anthropic_client::{AnthropicChatClient, AnthropicConfig, DEFAULT_MODEL};
pub use mock_chat_client::{MockChatClient, MockResponse, DEFAULT_MOCK_REPLY};
