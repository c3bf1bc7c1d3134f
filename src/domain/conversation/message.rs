//! Message entity for conversations.
//!
//! Messages are immutable records of user/assistant exchanges. Each message
//! has a role, text, creation timestamp and an optional UI tag.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, Timestamp, ValidationError};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Text typed by the person in the conversation.
    User,
    /// Text shown as the persona's reply.
    Assistant,
}

/// Marks messages that exist only for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageTag {
    /// The synthetic announcement of the persona switch.
    ///
    /// Never replayed to the model as if the model had said it.
    RevealMarker,
}

/// An immutable message within a conversation.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `text` is non-empty (validated at construction)
/// - `created_at` is set at construction and never changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    text: String,
    created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<MessageTag>,
}

impl Message {
    /// Creates a new untagged message with the given role and text.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if text is empty or whitespace
    pub fn new(role: Role, text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        Self::validate_text(&text)?;

        Ok(Self {
            id: MessageId::new(),
            role,
            text,
            created_at: Timestamp::now(),
            tag: None,
        })
    }

    /// Creates a user message.
    pub fn user(text: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Role::User, text)
    }

    /// Creates an assistant message.
    pub fn assistant(text: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Role::Assistant, text)
    }

    /// Creates the tagged assistant message announcing the persona switch.
    pub fn reveal_marker(text: impl Into<String>) -> Result<Self, ValidationError> {
        let mut message = Self::new(Role::Assistant, text)?;
        message.tag = Some(MessageTag::RevealMarker);
        Ok(message)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn tag(&self) -> Option<MessageTag> {
        self.tag
    }

    /// Returns true if this message is from the user.
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Returns true if this message is the reveal announcement.
    pub fn is_reveal_marker(&self) -> bool {
        self.tag == Some(MessageTag::RevealMarker)
    }

    fn validate_text(text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        Ok(())
    }
}
