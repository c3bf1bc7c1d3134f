//! Conversation flow configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::ConversationSettings;
use crate::domain::conversation::{
    RevealPolicy, DEFAULT_REVEAL_AFTER_USER_TURNS, DEFAULT_TRIGGER_WORDS,
};

/// Reveal rule and pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// User turns after which the instructor is revealed
    #[serde(default = "default_reveal_after")]
    pub reveal_after_user_turns: usize,

    /// Comma-separated trigger phrases; unset means the built-in list
    pub trigger_words: Option<String>,

    /// Pause before the reveal announcement, in milliseconds
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay_ms: u64,

    /// Pause before the instructor follow-up, in milliseconds
    #[serde(default = "default_follow_up_delay")]
    pub follow_up_delay_ms: u64,
}

impl ConversationConfig {
    /// Effective trigger phrases.
    pub fn trigger_words(&self) -> Vec<String> {
        match &self.trigger_words {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|word| !word.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_TRIGGER_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn follow_up_delay(&self) -> Duration {
        Duration::from_millis(self.follow_up_delay_ms)
    }

    /// Controller settings built from this section.
    pub fn settings(&self) -> ConversationSettings {
        ConversationSettings::default()
            .with_reveal_policy(RevealPolicy::new(
                self.reveal_after_user_turns,
                self.trigger_words(),
            ))
            .with_reveal_delay(self.reveal_delay())
            .with_follow_up_delay(self.follow_up_delay())
    }

    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.reveal_after_user_turns == 0 {
            return Err(ValidationError::InvalidRevealThreshold);
        }
        if self.trigger_words().is_empty() {
            return Err(ValidationError::NoTriggerWords);
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            reveal_after_user_turns: default_reveal_after(),
            trigger_words: None,
            reveal_delay_ms: default_reveal_delay(),
            follow_up_delay_ms: default_follow_up_delay(),
        }
    }
}

fn default_reveal_after() -> usize {
    DEFAULT_REVEAL_AFTER_USER_TURNS
}

fn default_reveal_delay() -> u64 {
    2000
}

fn default_follow_up_delay() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_controller_defaults() {
        let settings = ConversationConfig::default().settings();
        assert_eq!(settings, ConversationSettings::default());
    }

    #[test]
    fn test_trigger_words_split_on_commas() {
        let config = ConversationConfig {
            trigger_words: Some(" help , fix it,,hint ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.trigger_words(), vec!["help", "fix it", "hint"]);
    }

    #[test]
    fn test_custom_policy_flows_into_settings() {
        let config = ConversationConfig {
            reveal_after_user_turns: 4,
            trigger_words: Some("hint".to_string()),
            reveal_delay_ms: 0,
            follow_up_delay_ms: 250,
        };

        let settings = config.settings();

        assert_eq!(settings.reveal_policy.reveal_after_user_turns, 4);
        assert!(settings.reveal_policy.should_reveal("any hint?", 1));
        assert_eq!(settings.reveal_delay, Duration::ZERO);
        assert_eq!(settings.follow_up_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_validation_zero_threshold() {
        let config = ConversationConfig {
            reveal_after_user_turns: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRevealThreshold));
    }

    #[test]
    fn test_validation_empty_trigger_list() {
        let config = ConversationConfig {
            trigger_words: Some(" , ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::NoTriggerWords));
    }

    #[test]
    fn test_validation_default_is_valid() {
        assert!(ConversationConfig::default().validate().is_ok());
    }
}
