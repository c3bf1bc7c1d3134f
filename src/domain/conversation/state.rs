//! The authoritative conversation state.
//!
//! A single value holds the phase, the append-only history, the reveal flag
//! and the cached user turn count. All mutation goes through methods that
//! keep those fields consistent with each other.

use serde::Serialize;

use super::message::Message;
use super::phase::Phase;
use super::report::AnalysisReport;
use crate::domain::foundation::{ConversationId, StateMachine, ValidationError};

/// Snapshot-able state of one guided conversation.
///
/// # Invariants
///
/// - `revealed` is true iff `phase` is `Reveal` or `Report`
/// - `user_turn_count` equals the number of user messages in `history`
/// - `history` is only ever appended to
/// - `report` is set exactly when `phase` is `Report`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationState {
    conversation_id: ConversationId,
    phase: Phase,
    history: Vec<Message>,
    revealed: bool,
    user_turn_count: usize,
    report: Option<AnalysisReport>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationState {
    /// Creates the initial `Welcome` state with a fresh identity.
    pub fn new() -> Self {
        Self {
            conversation_id: ConversationId::new(),
            phase: Phase::Welcome,
            history: Vec::new(),
            revealed: false,
            user_turn_count: 0,
            report: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn user_turn_count(&self) -> usize {
        self.user_turn_count
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    /// Returns true if `id` still names this conversation run.
    pub fn is_current(&self, id: ConversationId) -> bool {
        self.conversation_id == id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends a message to the history, keeping the turn count in step.
    pub fn append(&mut self, message: Message) {
        if message.is_user() {
            self.user_turn_count += 1;
        }
        self.history.push(message);
    }

    /// Moves to `target`, updating the reveal flag.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if the phase graph does not allow the move
    pub fn advance_to(&mut self, target: Phase) -> Result<(), ValidationError> {
        self.phase = self.phase.transition_to(target)?;
        self.revealed = self.phase.is_revealed();
        Ok(())
    }

    /// Enters `Report`, storing the produced report.
    pub fn complete_with(&mut self, report: AnalysisReport) -> Result<(), ValidationError> {
        self.advance_to(Phase::Report)?;
        self.report = Some(report);
        Ok(())
    }

    /// Returns to the initial state under a new conversation identity.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
