//! ConversationController - drives one guided conversation.
//!
//! Owns the authoritative `ConversationState`, applies the phase rules and
//! issues generation requests through the injected `ChatClient`. Generation
//! failures never surface to the caller; they are replaced by canned lines
//! or fallback reports.
//!
//! The state lock is never held across a generation call. Each request
//! remembers the conversation identity it was issued for, and its result is
//! dropped if `reset` ran in the meantime.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::domain::conversation::configs::{
    philosophy_fallback, OPENING_FALLBACK, REVEAL_MARKER_TEXT,
};
use crate::domain::conversation::{
    AnalysisReport, ChatTurn, ConversationState, Message, Phase, ReportParser, RevealPolicy,
    TranscriptFormatter,
};
use crate::domain::foundation::{ConversationId, ValidationError};
use crate::ports::{ChatClient, GenerationError, GenerationRequest};

/// Default pause before the reveal announcement is shown.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(2000);

/// Default pause between the reveal announcement and the instructor follow-up.
pub const DEFAULT_FOLLOW_UP_DELAY: Duration = Duration::from_millis(1000);

/// Tunables for the conversation flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSettings {
    /// When to switch from philosopher to instructor.
    pub reveal_policy: RevealPolicy,
    /// Delay handed back to the caller before it should call `enter_reveal`.
    pub reveal_delay: Duration,
    /// Pause inside the reveal task before the follow-up is requested.
    pub follow_up_delay: Duration,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            reveal_policy: RevealPolicy::default(),
            reveal_delay: DEFAULT_REVEAL_DELAY,
            follow_up_delay: DEFAULT_FOLLOW_UP_DELAY,
        }
    }
}

impl ConversationSettings {
    /// Settings with no pacing delays.
    pub fn immediate() -> Self {
        Self {
            reveal_delay: Duration::ZERO,
            follow_up_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_reveal_policy(mut self, policy: RevealPolicy) -> Self {
        self.reveal_policy = policy;
        self
    }

    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    pub fn with_follow_up_delay(mut self, delay: Duration) -> Self {
        self.follow_up_delay = delay;
        self
    }
}

/// Errors returned by controller operations.
///
/// These indicate caller mistakes; generation problems are always recovered.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversationError {
    /// The operation is not allowed in the current phase.
    #[error("cannot {action} while in {from} phase")]
    InvalidTransition { from: Phase, action: &'static str },

    /// A domain value could not be constructed.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ConversationError {
    fn invalid(from: Phase, action: &'static str) -> Self {
        Self::InvalidTransition { from, action }
    }
}

/// Result of a user turn.
#[derive(Debug)]
pub enum TurnOutcome {
    /// Input was blank; nothing changed.
    Ignored,
    /// The message was appended after the reveal; no reply is generated.
    Recorded { message: Message },
    /// The assistant reply was appended.
    Replied {
        reply: Message,
        /// Set when the caller should call `enter_reveal` after this delay.
        reveal_after: Option<Duration>,
    },
    /// The conversation was reset while the reply was pending.
    Discarded,
}

impl TurnOutcome {
    /// Returns the appended reply, if any.
    pub fn reply(&self) -> Option<&Message> {
        match self {
            TurnOutcome::Replied { reply, .. } => Some(reply),
            _ => None,
        }
    }

    /// Returns the reveal delay, if a reveal was scheduled.
    pub fn reveal_after(&self) -> Option<Duration> {
        match self {
            TurnOutcome::Replied { reveal_after, .. } => *reveal_after,
            _ => None,
        }
    }
}

/// Result of `enter_reveal`.
#[derive(Debug)]
pub enum RevealOutcome {
    /// The announcement was appended and the follow-up is in flight.
    ///
    /// The handle resolves to the appended follow-up, or `None` when the
    /// generation failed or the conversation moved on.
    Entered {
        marker: Message,
        follow_up: JoinHandle<Option<Message>>,
    },
    /// Reveal had already happened; nothing changed.
    AlreadyRevealed,
}

/// Drives the Welcome → Philosophy → Reveal → Report flow.
pub struct ConversationController<C>
where
    C: ChatClient,
{
    client: Arc<C>,
    state: Arc<RwLock<ConversationState>>,
    settings: ConversationSettings,
    parser: ReportParser,
}

impl<C> ConversationController<C>
where
    C: ChatClient + 'static,
{
    /// Creates a controller in the `Welcome` phase.
    pub fn new(client: Arc<C>, settings: ConversationSettings) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(ConversationState::new())),
            settings,
            parser: ReportParser::new(),
        }
    }

    pub fn settings(&self) -> &ConversationSettings {
        &self.settings
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> ConversationState {
        self.state.read().await.clone()
    }

    /// Opens the conversation with the user's first message.
    ///
    /// The philosopher reply is generated over that single message. Blank
    /// input is ignored.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the phase is `Welcome`
    pub async fn start_conversation(&self, text: &str) -> Result<TurnOutcome, ConversationError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }

        let (conversation_id, transcript) = {
            let mut state = self.state.write().await;
            if state.phase() != Phase::Welcome {
                return Err(ConversationError::invalid(state.phase(), "start conversation"));
            }

            state.append(Message::user(text)?);
            state.advance_to(Phase::Philosophy)?;
            tracing::info!(conversation_id = %state.conversation_id(), "conversation started");

            (
                state.conversation_id(),
                TranscriptFormatter::format(state.history(), Phase::Philosophy),
            )
        };

        let reply = self
            .generate_or(Phase::Philosophy, transcript, || OPENING_FALLBACK)
            .await?;

        self.append_reply(conversation_id, reply, None).await
    }

    /// Handles a user turn in `Philosophy` or `Reveal`.
    ///
    /// In `Philosophy` the reveal rule is evaluated against the new message;
    /// when it fires, the outcome carries the delay after which the caller
    /// should invoke `enter_reveal`. Once revealed the message is only
    /// recorded for the report. Blank input is ignored.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` in `Welcome` or `Report`
    pub async fn submit_user_message(&self, text: &str) -> Result<TurnOutcome, ConversationError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }

        let (conversation_id, phase, transcript, should_reveal) = {
            let mut state = self.state.write().await;
            let phase = state.phase();
            if !phase.is_conversational() {
                return Err(ConversationError::invalid(phase, "submit a message"));
            }

            let message = Message::user(text)?;
            state.append(message.clone());

            if state.is_revealed() {
                tracing::debug!(
                    %phase,
                    user_turns = state.user_turn_count(),
                    "user message recorded after reveal"
                );
                return Ok(TurnOutcome::Recorded { message });
            }

            let should_reveal = self
                    .settings
                    .reveal_policy
                    .should_reveal(text, state.user_turn_count());

            tracing::debug!(
                %phase,
                user_turns = state.user_turn_count(),
                should_reveal,
                "user message appended"
            );

            (
                state.conversation_id(),
                phase,
                TranscriptFormatter::format(state.history(), phase),
                should_reveal,
            )
        };

        let reply = self
            .generate_or(phase, transcript, philosophy_fallback)
            .await?;

        let reveal_after = should_reveal.then_some(self.settings.reveal_delay);
        self.append_reply(conversation_id, reply, reveal_after).await
    }

    /// Switches to the instructor persona.
    ///
    /// Appends the reveal announcement immediately and spawns the instructor
    /// follow-up over the transcript as it stood before the announcement.
    /// Calling this again once revealed does nothing.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` in `Welcome` or `Report`
    pub async fn enter_reveal(&self) -> Result<RevealOutcome, ConversationError> {
        let (conversation_id, transcript, marker) = {
            let mut state = self.state.write().await;
            match state.phase() {
                Phase::Reveal => {
                    tracing::debug!("reveal already entered, ignoring");
                    return Ok(RevealOutcome::AlreadyRevealed);
                }
                Phase::Philosophy => {}
                other => return Err(ConversationError::invalid(other, "enter reveal")),
            }

            let transcript = TranscriptFormatter::format(state.history(), Phase::Reveal);
            let marker = Message::reveal_marker(REVEAL_MARKER_TEXT)?;

            state.advance_to(Phase::Reveal)?;
            state.append(marker.clone());
            tracing::info!(conversation_id = %state.conversation_id(), "persona revealed");

            (state.conversation_id(), transcript, marker)
        };

        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let delay = self.settings.follow_up_delay;

        let follow_up = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let text = match client
                .generate(GenerationRequest::for_phase(Phase::Reveal, transcript))
                .await
            {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(error = %err, "reveal follow-up failed, omitting");
                    return None;
                }
            };

            let message = match Message::assistant(text) {
                Ok(message) => message,
                Err(err) => {
                    tracing::warn!(error = %err, "reveal follow-up was blank, omitting");
                    return None;
                }
            };

            let mut state = state.write().await;
            if !state.is_current(conversation_id) || state.phase() != Phase::Reveal {
                tracing::debug!(%conversation_id, "discarding stale reveal follow-up");
                return None;
            }
            state.append(message.clone());
            Some(message)
        });

        Ok(RevealOutcome::Entered { marker, follow_up })
    }

    /// Produces the closing analysis and enters `Report`.
    ///
    /// Returns `None` if the conversation was reset or already reported
    /// while the report was being generated.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` unless the phase is `Reveal`
    pub async fn request_report(&self) -> Result<Option<AnalysisReport>, ConversationError> {
        let (conversation_id, transcript) = {
            let state = self.state.read().await;
            if state.phase() != Phase::Reveal {
                return Err(ConversationError::invalid(state.phase(), "request report"));
            }
            (
                state.conversation_id(),
                TranscriptFormatter::format(state.history(), Phase::Report),
            )
        };

        let report = match self
            .client
            .generate(GenerationRequest::for_phase(Phase::Report, transcript))
            .await
        {
            Ok(raw) => self.parser.parse(&raw),
            Err(err) => {
                tracing::warn!(error = %err, "report generation failed, using fallback");
                AnalysisReport::generation_fallback()
            }
        };

        let mut state = self.state.write().await;
        if !state.is_current(conversation_id) || state.phase() != Phase::Reveal {
            tracing::debug!(%conversation_id, "discarding stale report");
            return Ok(None);
        }
        state.complete_with(report.clone())?;
        tracing::info!(%conversation_id, "report produced");

        Ok(Some(report))
    }

    /// Returns to `Welcome` under a new conversation identity.
    ///
    /// Pending generations issued before the reset are dropped on arrival.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        let previous = state.conversation_id();
        state.reset();
        tracing::info!(%previous, current = %state.conversation_id(), "conversation reset");
    }

    /// Generates a reply for `phase`, substituting a canned line on failure.
    async fn generate_or(
        &self,
        phase: Phase,
        transcript: Vec<ChatTurn>,
        fallback: impl FnOnce() -> &'static str,
    ) -> Result<Message, ConversationError> {
        let result: Result<String, GenerationError> = self
            .client
            .generate(GenerationRequest::for_phase(phase, transcript))
            .await;

        let generated = result.and_then(|text| {
            Message::assistant(text).map_err(|_| GenerationError::EmptyResponse)
        });

        match generated {
            Ok(message) => Ok(message),
            Err(err) => {
                tracing::warn!(%phase, error = %err, "generation failed, using fallback line");
                Ok(Message::assistant(fallback())?)
            }
        }
    }

    async fn append_reply(
        &self,
        conversation_id: ConversationId,
        reply: Message,
        reveal_after: Option<Duration>,
    ) -> Result<TurnOutcome, ConversationError> {
        let mut state = self.state.write().await;
        if !state.is_current(conversation_id) || !state.phase().is_conversational() {
            tracing::debug!(%conversation_id, "discarding stale reply");
            return Ok(TurnOutcome::Discarded);
        }

        state.append(reply.clone());
        Ok(TurnOutcome::Replied {
            reply,
            reveal_after,
        })
    }
}
