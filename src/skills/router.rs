//! Skill selection and dispatch.
//!
//! One ordered selection policy covers every deployment mode:
//! an explicit style hint first, then URL sniffing, then completion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::StyleConfig;
use crate::error::{RelayError, Result};
use crate::log_component;

use super::completion::LanguageModelProxy;
use super::registry::SkillRegistry;
use super::style::StyleTransformer;
use super::summarize::DocumentSummarizer;
use super::types::{ExecutionRequest, SkillKind};

/// Which selection scheme a deployment uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Content sniffing only: URL to summarization, anything else to completion
    Routed,
    /// Direct styling only: every request goes through the style transform
    Styled,
    /// Style hint first, then content sniffing
    #[default]
    Unified,
}

impl DispatchMode {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::Routed => "routed",
            DispatchMode::Styled => "styled",
            DispatchMode::Unified => "unified",
        }
    }
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchMode {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "routed" => Ok(DispatchMode::Routed),
            "styled" => Ok(DispatchMode::Styled),
            "unified" => Ok(DispatchMode::Unified),
            other => Err(RelayError::Config(format!(
                "unknown dispatch mode '{}' (expected routed, styled or unified)",
                other
            ))),
        }
    }
}

/// Literal prefix test; no URL validation is performed.
///
/// # Example
/// ```
/// use skillrelay::skills::is_document_url;
///
/// assert!(is_document_url("https://example.com/x"));
/// assert!(!is_document_url("see https://example.com"));
/// assert!(!is_document_url("HTTPS://EXAMPLE.COM"));
/// ```
pub fn is_document_url(text: &str) -> bool {
    text.starts_with("http://") || text.starts_with("https://")
}

/// Pick the skill for `request` under `mode`.
///
/// Walks the mode's registry entries in order; see [`SkillRegistry::select`].
pub fn select(request: &ExecutionRequest, mode: DispatchMode) -> SkillKind {
    SkillRegistry::select(request, mode).kind
}

/// Dispatches normalized requests to the skill implementations.
#[derive(Debug, Clone)]
pub struct SkillRouter {
    mode: DispatchMode,
    styler: StyleTransformer,
    proxy: LanguageModelProxy,
    summarizer: DocumentSummarizer,
    default_style: Option<String>,
}

impl SkillRouter {
    /// Create a router over the three skills.
    pub fn new(
        mode: DispatchMode,
        styler: StyleTransformer,
        proxy: LanguageModelProxy,
        summarizer: DocumentSummarizer,
    ) -> Self {
        Self {
            mode,
            styler,
            proxy,
            summarizer,
            default_style: None,
        }
    }

    /// Apply the style section of the configuration (default style hint).
    pub fn with_style_config(mut self, cfg: &StyleConfig) -> Self {
        self.default_style = cfg.default_style.clone();
        self
    }

    /// The configured dispatch mode.
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Content-sniffing dispatch over raw text.
    ///
    /// `http://` or `https://` prefixed text is summarized, anything else is
    /// completed. Never styles, whatever the configured mode.
    pub async fn route(&self, text: &str) -> Result<String> {
        let request = ExecutionRequest::new(text);
        let kind = select(&request, DispatchMode::Routed);
        self.run(kind, &request).await
    }

    /// Select and run the skill for `request` under the configured mode.
    ///
    /// Returns the chosen skill alongside its result so callers can report
    /// which skill answered, including on failure.
    pub async fn dispatch(&self, request: &ExecutionRequest) -> (SkillKind, Result<String>) {
        let descriptor = SkillRegistry::select(request, self.mode);
        log_component!(
            debug,
            "router",
            "skill selected",
            skill = descriptor.id,
            name = descriptor.name,
            mode = self.mode.as_str()
        );

        let result = self.run(descriptor.kind, request).await;
        (descriptor.kind, result)
    }

    async fn run(&self, kind: SkillKind, request: &ExecutionRequest) -> Result<String> {
        match kind {
            SkillKind::StyleTransform => {
                let hint = request.style.as_deref().or(self.default_style.as_deref());
                Ok(self.styler.transform(&request.text, hint).await)
            }
            SkillKind::Summarization => self.summarizer.summarize(&request.text).await,
            SkillKind::Completion => self.proxy.complete(&request.text).await,
        }
    }
}
