//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout (must be 1..=300 seconds)")]
    InvalidTimeout,

    #[error("Invalid temperature (must be within 0.0..=1.0)")]
    InvalidTemperature,

    #[error("max_tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("max_retries must be at most 10")]
    InvalidMaxRetries,

    #[error("Reveal threshold must be at least one user turn")]
    InvalidRevealThreshold,

    #[error("At least one reveal trigger word is required")]
    NoTriggerWords,

    #[error("Log filter must not be empty")]
    EmptyLogFilter,
}
