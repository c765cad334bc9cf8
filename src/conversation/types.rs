//! Conversation types for SkillRelay
//!
//! Messages are ordered sequences of content parts. Only `text` parts are
//! consumed by the skills; other kinds are stored in history untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier grouping related messages into one exchange.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The remote user
    User,
    /// This agent
    Agent,
}

/// Kind tag of a content part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartKind {
    /// Plain text, the only kind skills consume
    Text,
    /// File reference
    File,
    /// Structured data
    Data,
}

/// One content part of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Kind tag
    pub kind: PartKind,
    /// Text payload (present for text parts)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    /// Create a text part.
    pub fn text(text: &str) -> Self {
        Self {
            kind: PartKind::Text,
            text: Some(text.to_string()),
        }
    }

    /// Create a non-text part with no payload.
    pub fn other(kind: PartKind) -> Self {
        Self { kind, text: None }
    }

    /// The text payload if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self.kind {
            PartKind::Text => self.text.as_deref(),
            PartKind::File | PartKind::Data => None,
        }
    }
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier
    pub message_id: String,
    /// Author
    pub role: Role,
    /// Ordered content parts
    pub parts: Vec<Part>,
    /// When the message was constructed
    pub received_at: DateTime<Utc>,
}

impl Message {
    /// Create a message from explicit parts.
    ///
    /// # Example
    /// ```
    /// use skillrelay::conversation::{Message, Part, Role};
    ///
    /// let msg = Message::from_parts(Role::User, vec![Part::text("hello")]);
    /// assert_eq!(msg.parts.len(), 1);
    /// ```
    pub fn from_parts(role: Role, parts: Vec<Part>) -> Self {
        Self {
            message_id: uuid::Uuid::new_v4().to_string(),
            role,
            parts,
            received_at: Utc::now(),
        }
    }

    /// Create a user message with a single text part.
    pub fn user_text(text: &str) -> Self {
        Self::from_parts(Role::User, vec![Part::text(text)])
    }

    /// Join the text parts with single spaces and trim the result.
    ///
    /// # Example
    /// ```
    /// use skillrelay::conversation::{Message, Part, PartKind, Role};
    ///
    /// let msg = Message::from_parts(
    ///     Role::User,
    ///     vec![Part::text(" Bonjour"), Part::other(PartKind::File), Part::text("les amis ")],
    /// );
    /// assert_eq!(msg.flatten_text(), "Bonjour les amis");
    /// ```
    pub fn flatten_text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}
