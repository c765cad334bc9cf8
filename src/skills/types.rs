//! Skill type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::router::is_document_url;

/// The skill capabilities this engine can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    /// Deterministic text styling
    StyleTransform,
    /// Generic language-model completion
    Completion,
    /// URL-triggered document summarization
    Summarization,
}

impl SkillKind {
    /// Registry identifier of the built-in skill for this kind.
    pub fn skill_id(&self) -> &'static str {
        match self {
            SkillKind::StyleTransform => "echo-plus",
            SkillKind::Completion => "llm-proxy",
            SkillKind::Summarization => "doc-summary",
        }
    }
}

impl fmt::Display for SkillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.skill_id())
    }
}

/// The normalized unit handed to the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    /// Flattened, trimmed message text
    pub text: String,
    /// Optional style hint
    pub style: Option<String>,
}

impl ExecutionRequest {
    /// Create a request without a style hint.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            style: None,
        }
    }

    /// Attach a style hint (builder pattern).
    pub fn with_style(mut self, style: &str) -> Self {
        self.style = Some(style.to_string());
        self
    }
}

/// Immutable registry entry describing a skill.
///
/// Used for routing and listing, never for execution.
#[derive(Debug, Clone, Serialize)]
pub struct SkillDescriptor {
    /// Stable identifier
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    /// What the skill does
    pub description: &'static str,
    /// Categorization tags
    pub tags: &'static [&'static str],
    /// Example inputs
    pub examples: &'static [&'static str],
    /// Capability this descriptor stands for
    pub kind: SkillKind,
}

impl SkillDescriptor {
    /// Whether this skill's input predicate accepts the request.
    ///
    /// Predicates overlap (completion accepts everything); the registry's
    /// order decides between them.
    pub fn applies_to(&self, request: &ExecutionRequest) -> bool {
        match self.kind {
            SkillKind::StyleTransform => request.style.is_some(),
            SkillKind::Summarization => is_document_url(&request.text),
            SkillKind::Completion => true,
        }
    }
}
