//! Fixed lines used when the model is unavailable or for UI announcements.

use rand::seq::SliceRandom;

/// Reply to the opening message when the first generation fails.
pub const OPENING_FALLBACK: &str =
    "Hello. Please, tell me what is on your mind. What has been troubling you?";

/// Philosopher replies used when a Philosophy-phase generation fails.
pub const PHILOSOPHY_FALLBACKS: &[&str] = &[
    "I see... that is an interesting perspective. Socrates spoke of knowing that one knows nothing; perhaps feeling this way is itself a sign of growth. Why do you think you feel so?",
    "What do you think lies at the root of that feeling? The Greek philosopher Epictetus said that we are disturbed not by things themselves, but by our judgements about them.",
    "How interesting. Let us look at the problem from another angle. If a close friend came to you with the same worry, what advice would you give them?",
];

/// The announcement appended when the persona switches.
pub const REVEAL_MARKER_TEXT: &str = "Actually... I work as an IT training instructor. Listening to you so far, I think I can help you \"debug\" your thinking. Let me suggest a new framework from a technical point of view.";

/// Picks any line from the philosophical fallback set.
pub fn philosophy_fallback() -> &'static str {
    PHILOSOPHY_FALLBACKS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(OPENING_FALLBACK)
}
