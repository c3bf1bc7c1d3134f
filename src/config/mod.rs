//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `KINOKO` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use kinoko_sensei::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model);
//! ```

mod ai;
mod conversation;
mod error;
mod logging;

pub use ai::AiConfig;
pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Anthropic client configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Reveal rule and pacing
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `KINOKO` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `KINOKO__AI__ANTHROPIC_API_KEY=...` -> `ai.anthropic_api_key = ...`
    /// - `KINOKO__CONVERSATION__REVEAL_AFTER_USER_TURNS=4` -> `conversation.reveal_after_user_turns = 4`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("KINOKO")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.conversation.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;
    use std::time::Duration;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "KINOKO__AI__ANTHROPIC_API_KEY",
        "KINOKO__AI__MODEL",
        "KINOKO__AI__TEMPERATURE",
        "KINOKO__CONVERSATION__REVEAL_AFTER_USER_TURNS",
        "KINOKO__CONVERSATION__TRIGGER_WORDS",
        "KINOKO__CONVERSATION__REVEAL_DELAY_MS",
        "KINOKO__LOGGING__FORMAT",
    ];

    fn set_minimal_env() {
        env::set_var("KINOKO__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(
            config.ai.anthropic_api_key.as_ref().unwrap().expose_secret(),
            "sk-ant-xxx"
        );
    }

    #[test]
    fn test_validate_minimal_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
        );
    }

    #[test]
    fn test_section_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let config = AppConfig::load().unwrap();
        clear_env();

        assert_eq!(config.conversation.reveal_after_user_turns, 3);
        assert_eq!(config.conversation.reveal_delay(), Duration::from_millis(2000));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("KINOKO__AI__MODEL", "claude-3-opus-20240229");
        env::set_var("KINOKO__AI__TEMPERATURE", "0.3");
        env::set_var("KINOKO__CONVERSATION__REVEAL_AFTER_USER_TURNS", "4");
        env::set_var("KINOKO__CONVERSATION__TRIGGER_WORDS", "hint,fix");
        env::set_var("KINOKO__CONVERSATION__REVEAL_DELAY_MS", "0");
        env::set_var("KINOKO__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.model, "claude-3-opus-20240229");
        assert_eq!(config.ai.temperature, 0.3);
        assert_eq!(config.conversation.reveal_after_user_turns, 4);
        assert_eq!(config.conversation.trigger_words(), vec!["hint", "fix"]);
        assert_eq!(config.conversation.reveal_delay(), Duration::ZERO);
        assert!(config.logging.is_json());
    }
}
