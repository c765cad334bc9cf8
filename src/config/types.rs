//! Configuration type definitions for SkillRelay
//!
//! This module defines all configuration structs used throughout the crate.
//! All types implement serde traits for JSON serialization and have sensible defaults.

use serde::{Deserialize, Serialize};

use crate::skills::DispatchMode;

/// Main configuration struct for SkillRelay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion service client configuration
    pub provider: ProviderConfig,
    /// Document summarization configuration
    pub summarizer: SummarizerConfig,
    /// Text styling configuration
    pub style: StyleConfig,
    /// Skill selection scheme for this deployment
    pub dispatch: DispatchConfig,
    /// Conversation history retention
    pub history: HistoryConfig,
    /// Logging output configuration
    pub logging: LoggingConfig,
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Default OpenAI-compatible API base.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model for completion requests.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Completion service configuration.
///
/// Without an `api_key` the completion and summarization skills fail with
/// a contained "service unavailable" answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key (falls back to `OPENAI_API_KEY`)
    pub api_key: Option<String>,
    /// API base URL
    pub api_base: String,
    /// Model identifier used for every completion
    pub model: String,
    /// Client-side request timeout in seconds
    pub timeout_secs: u64,
    /// Optional completion token cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Optional sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 60,
            max_tokens: None,
            temperature: None,
        }
    }
}

impl ProviderConfig {
    /// The API key, if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

// ============================================================================
// Summarizer Configuration
// ============================================================================

/// Placeholder substituted with the fetched document text.
pub const CONTENT_PLACEHOLDER: &str = "{content}";

/// Default summarization prompt.
pub const DEFAULT_SUMMARY_TEMPLATE: &str = "Résume en français ce contenu:\n{content}";

/// Document summarization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Character budget for the fetched body
    pub max_chars: usize,
    /// Prompt template; `{content}` is replaced with the truncated body
    pub prompt_template: String,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            max_chars: 2000,
            prompt_template: DEFAULT_SUMMARY_TEMPLATE.to_string(),
        }
    }
}

// ============================================================================
// Style Configuration
// ============================================================================

/// Text styling configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Artificial delay before each transform, in milliseconds
    pub simulated_latency_ms: u64,
    /// Style used in `styled` mode when a request carries none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_style: Option<String>,
}

// ============================================================================
// Dispatch Configuration
// ============================================================================

/// Skill selection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Which selection scheme this deployment uses
    pub mode: DispatchMode,
}

// ============================================================================
// History Configuration
// ============================================================================

/// Conversation history retention.
///
/// Both limits unset means histories grow for the process lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Keep only the most recent N messages per conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_messages_per_conversation: Option<usize>,
    /// Drop conversations idle for longer than this many seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_ttl_secs: Option<u64>,
}

impl HistoryConfig {
    /// Whether any retention limit is configured.
    pub fn is_bounded(&self) -> bool {
        self.max_messages_per_conversation.is_some() || self.idle_ttl_secs.is_some()
    }
}

// ============================================================================
// Logging Configuration
// ============================================================================

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    Pretty,
    /// Compact lines carrying a `component` field
    #[default]
    Component,
    /// JSON lines for log aggregators
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Level filter used when `RUST_LOG` is unset
    pub level: String,
    /// Optional file to append log lines to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Component,
            level: "info".to_string(),
            file: None,
        }
    }
}
