//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, state machine, errors)
//! - `conversation` - Phases, messages, reveal rules, transcripts and reports

pub mod conversation;
pub mod foundation;
