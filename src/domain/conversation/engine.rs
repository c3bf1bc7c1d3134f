//! Reveal transition rules.
//!
//! Decides when the philosopher persona should hand over to the instructor,
//! based on solution-seeking trigger phrases and the number of user turns.

/// Trigger phrases used when no configuration overrides them.
///
/// English and Japanese solution-seeking phrases. Matching is
/// case-insensitive substring search.
pub const DEFAULT_TRIGGER_WORDS: &[&str] = &[
    "solution",
    "what should i do",
    "answer",
    "advice",
    "method",
    "debug",
    "解決策",
    "どうすればいい",
    "答え",
    "アドバイス",
    "方法",
    "デバッグ",
];

/// User turns after which the reveal happens regardless of content.
pub const DEFAULT_REVEAL_AFTER_USER_TURNS: usize = 3;

/// Configuration for the reveal transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealPolicy {
    /// Reveal once this many user messages exist (counting the new one).
    pub reveal_after_user_turns: usize,
    /// Phrases that force an early reveal.
    pub trigger_words: Vec<String>,
}

impl Default for RevealPolicy {
    fn default() -> Self {
        Self {
            reveal_after_user_turns: DEFAULT_REVEAL_AFTER_USER_TURNS,
            trigger_words: DEFAULT_TRIGGER_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl RevealPolicy {
    /// Creates a policy with the given threshold and trigger words.
    pub fn new(reveal_after_user_turns: usize, trigger_words: Vec<String>) -> Self {
        Self {
            reveal_after_user_turns,
            trigger_words,
        }
    }

    /// Returns true if the text contains any trigger phrase.
    pub fn contains_trigger_word(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.trigger_words
            .iter()
            .filter(|word| !word.trim().is_empty())
            .any(|word| lower.contains(&word.to_lowercase()))
    }

    /// Returns true if the conversation should move to the reveal.
    ///
    /// `user_turn_count` includes the message carrying `text`.
    pub fn should_reveal(&self, text: &str, user_turn_count: usize) -> bool {
        user_turn_count >= self.reveal_after_user_turns || self.contains_trigger_word(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    mod trigger_words {
        use super::*;

        #[test]
        fn detects_english_phrase() {
            let policy = RevealPolicy::default();
            assert!(policy.contains_trigger_word("Honestly, what should I do now?"));
        }

        #[test]
        fn detection_is_case_insensitive() {
            let policy = RevealPolicy::default();
            assert!(policy.contains_trigger_word("I need ADVICE"));
        }

        #[test]
        fn detects_japanese_phrase() {
            let policy = RevealPolicy::default();
            assert!(policy.contains_trigger_word("どうすればいいですか"));
        }

        #[test]
        fn neutral_text_has_no_trigger() {
            let policy = RevealPolicy::default();
            assert!(!policy.contains_trigger_word("I feel lost"));
        }

        #[test]
        fn blank_trigger_words_never_match() {
            let policy = RevealPolicy::new(3, vec!["".to_string(), "  ".to_string()]);
            assert!(!policy.contains_trigger_word("anything at all"));
        }
    }

    mod should_reveal {
        use super::*;

        #[test]
        fn neutral_first_turn_does_not_reveal() {
            let policy = RevealPolicy::default();
            assert!(!policy.should_reveal("I feel lost", 1));
        }

        #[test]
        fn trigger_reveals_at_first_turn() {
            let policy = RevealPolicy::default();
            assert!(policy.should_reveal("Is there a method to this?", 1));
        }

        #[test]
        fn third_neutral_turn_reveals() {
            let policy = RevealPolicy::default();
            assert!(!policy.should_reveal("I feel lost", 1));
            assert!(!policy.should_reveal("Nothing seems to move", 2));
            assert!(policy.should_reveal("It is just how it is", 3));
        }

        #[test]
        fn threshold_is_configurable() {
            let policy = RevealPolicy::new(4, vec![]);
            assert!(!policy.should_reveal("plain", 3));
            assert!(policy.should_reveal("plain", 4));
        }
    }

    proptest! {
        #[test]
        fn reveals_whenever_threshold_reached(text in ".*", extra in 0usize..50) {
            let policy = RevealPolicy::default();
            prop_assert!(policy.should_reveal(&text, DEFAULT_REVEAL_AFTER_USER_TURNS + extra));
        }

        #[test]
        fn trigger_word_reveals_at_any_count(prefix in "[a-z ]{0,20}", count in 0usize..3) {
            let policy = RevealPolicy::default();
            let text = format!("{}debug", prefix);
            prop_assert!(policy.should_reveal(&text, count));
        }
    }
}
