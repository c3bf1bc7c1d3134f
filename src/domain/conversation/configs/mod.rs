//! Static conversation content.
//!
//! Persona directives per phase and the canned lines used for fallbacks
//! and the reveal announcement.

mod canned;
mod personas;

pub use canned::{
    philosophy_fallback, OPENING_FALLBACK, PHILOSOPHY_FALLBACKS, REVEAL_MARKER_TEXT,
};
pub use personas::PersonaPromptTable;
