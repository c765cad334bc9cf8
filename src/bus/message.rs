//! Message types for the SkillRelay bus
//!
//! Inbound requests flow from the transport to the executor; response events
//! flow back from the executor to whoever consumes the event queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::conversation::{ConversationId, Message};
use crate::error::ErrorKind;
use crate::skills::SkillKind;

/// Optional per-request parameters, validated once at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteParams {
    /// Conversation to record the message under; `None` skips history
    pub conversation_id: Option<ConversationId>,
    /// Style hint for the text-styling skill
    pub style: Option<String>,
}

impl ExecuteParams {
    /// Build parameters from raw optional strings.
    ///
    /// Blank values are dropped, so downstream code never needs to re-check
    /// presence. Conversation ids are opaque and kept verbatim; style hints
    /// are trimmed.
    ///
    /// # Example
    /// ```
    /// use skillrelay::bus::ExecuteParams;
    ///
    /// let params = ExecuteParams::new(Some(" ctx-1"), Some("   "));
    /// assert_eq!(params.conversation_id.unwrap().as_str(), " ctx-1");
    /// assert!(params.style.is_none());
    /// ```
    pub fn new(conversation_id: Option<&str>, style: Option<&str>) -> Self {
        Self {
            conversation_id: opaque_id(conversation_id),
            style: non_blank(style).map(str::to_string),
        }
    }

    /// Set the conversation id (builder pattern).
    pub fn with_conversation(mut self, id: &str) -> Self {
        self.conversation_id = opaque_id(Some(id));
        self
    }

    /// Set the style hint (builder pattern).
    pub fn with_style(mut self, style: &str) -> Self {
        self.style = non_blank(Some(style)).map(str::to_string);
        self
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn opaque_id(value: Option<&str>) -> Option<ConversationId> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(ConversationId::from)
}

/// One execution call: a message plus its parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundRequest {
    /// Unique request identifier, echoed on every response event
    pub request_id: String,
    /// The inbound message
    pub message: Message,
    /// Validated parameters
    pub params: ExecuteParams,
}

impl InboundRequest {
    /// Create a request with a fresh id.
    ///
    /// # Example
    /// ```
    /// use skillrelay::bus::{ExecuteParams, InboundRequest};
    /// use skillrelay::conversation::Message;
    ///
    /// let req = InboundRequest::new(Message::user_text("Hello"), ExecuteParams::default());
    /// assert!(!req.request_id.is_empty());
    /// ```
    pub fn new(message: Message, params: ExecuteParams) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            message,
            params,
        }
    }

    /// Create a request from plain text.
    pub fn text(text: &str, params: ExecuteParams) -> Self {
        Self::new(Message::user_text(text), params)
    }
}

/// How a request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The skill produced its answer
    Completed,
    /// The skill failed; the event text describes the failure
    Failed {
        /// Failure category
        #[serde(with = "error_kind_name")]
        kind: ErrorKind,
    },
}

impl Outcome {
    /// Whether this is a failure outcome.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

mod error_kind_name {
    use crate::error::ErrorKind;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(kind: &ErrorKind, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(kind.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ErrorKind, D::Error> {
        let name = String::deserialize(d)?;
        match name.as_str() {
            "configuration" => Ok(ErrorKind::Configuration),
            "upstream" => Ok(ErrorKind::Upstream),
            "fetch" => Ok(ErrorKind::Fetch),
            "unsupported" => Ok(ErrorKind::Unsupported),
            "internal" => Ok(ErrorKind::Internal),
            other => Err(serde::de::Error::unknown_variant(
                other,
                &["configuration", "upstream", "fetch", "unsupported", "internal"],
            )),
        }
    }
}

/// A single-text-payload event published by the executor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEvent {
    /// Request this event answers
    pub request_id: String,
    /// Conversation the request belonged to, if any
    pub conversation_id: Option<ConversationId>,
    /// Answer text, or the user-visible failure description
    pub text: String,
    /// Success or contained failure
    pub outcome: Outcome,
    /// Skill that produced the event
    pub skill: Option<SkillKind>,
    /// Whether this is the terminal event for the request
    #[serde(rename = "final")]
    pub is_final: bool,
    /// Emission time
    pub emitted_at: DateTime<Utc>,
}

impl ResponseEvent {
    /// Create a terminal success event.
    pub fn completed(request: &InboundRequest, skill: SkillKind, text: String) -> Self {
        Self::terminal(request, Some(skill), text, Outcome::Completed)
    }

    /// Create a terminal contained-failure event.
    pub fn failed(
        request: &InboundRequest,
        skill: Option<SkillKind>,
        kind: ErrorKind,
        text: String,
    ) -> Self {
        Self::terminal(request, skill, text, Outcome::Failed { kind })
    }

    fn terminal(
        request: &InboundRequest,
        skill: Option<SkillKind>,
        text: String,
        outcome: Outcome,
    ) -> Self {
        Self {
            request_id: request.request_id.clone(),
            conversation_id: request.params.conversation_id.clone(),
            text,
            outcome,
            skill,
            is_final: true,
            emitted_at: Utc::now(),
        }
    }
}
