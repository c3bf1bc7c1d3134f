//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ChatClient` - Text generation by the model provider

mod chat_client;

pub use chat_client::{ChatClient, GenerationError, GenerationRequest};
