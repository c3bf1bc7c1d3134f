//! Chat Client Port - the only boundary to the model provider.
//!
//! The conversation controller sends a phase, its persona directive and the
//! formatted transcript, and gets back plain text. Provider-specific error
//! shapes stay behind this port; callers only distinguish success from
//! failure.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoClient;
//!
//! #[async_trait]
//! impl ChatClient for EchoClient {
//!     async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
//!         Ok(request.transcript.last().map(|t| t.content.clone()).unwrap_or_default())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::conversation::{ChatTurn, PersonaPromptTable, Phase};

/// Port for model text generation.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Generates the persona's next reply for the given transcript.
    ///
    /// Implementations must return `GenerationError::EmptyResponse` rather
    /// than `Ok("")` when the provider yields no usable text.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// A single generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Phase the request is issued for.
    pub phase: Phase,
    /// System directive for the phase persona.
    pub persona: String,
    /// Filtered, ordered transcript.
    pub transcript: Vec<ChatTurn>,
}

impl GenerationRequest {
    /// Creates a request carrying the phase's persona directive.
    pub fn for_phase(phase: Phase, transcript: Vec<ChatTurn>) -> Self {
        Self {
            phase,
            persona: PersonaPromptTable::prompt_for(phase).to_string(),
            transcript,
        }
    }
}

/// Generation failures.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Provider answered without any usable text.
    #[error("provider returned no text")]
    EmptyResponse,

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl GenerationError {
    /// Creates a rate limited error.
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimited { .. }
                | GenerationError::Unavailable { .. }
                | GenerationError::Network(_)
                | GenerationError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_phase_persona() {
        let request = GenerationRequest::for_phase(Phase::Reveal, vec![ChatTurn::user("hi")]);
        assert_eq!(request.phase, Phase::Reveal);
        assert_eq!(request.persona, PersonaPromptTable::prompt_for(Phase::Reveal));
        assert_eq!(request.transcript.len(), 1);
    }

    #[test]
    fn retryable_classification() {
        assert!(GenerationError::rate_limited(30).is_retryable());
        assert!(GenerationError::unavailable("down").is_retryable());
        assert!(GenerationError::network("reset").is_retryable());
        assert!(GenerationError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!GenerationError::AuthenticationFailed.is_retryable());
        assert!(!GenerationError::EmptyResponse.is_retryable());
        assert!(!GenerationError::parse("bad json").is_retryable());
        assert!(!GenerationError::InvalidRequest("x".to_string()).is_retryable());
    }

    #[test]
    fn errors_display_human_readable_cause() {
        assert_eq!(
            GenerationError::rate_limited(30).to_string(),
            "rate limited: retry after 30s"
        );
        assert_eq!(
            GenerationError::EmptyResponse.to_string(),
            "provider returned no text"
        );
    }
}
