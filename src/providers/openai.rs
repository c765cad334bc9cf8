//! OpenAI Provider Implementation
//!
//! Implements the `LLMProvider` trait for OpenAI's Chat Completions API
//! (and compatible endpoints). One request per call, no streaming, no tools.
//!
//! # Example
//!
//! ```rust,ignore
//! use skillrelay::providers::{ChatMessage, ChatOptions, LLMProvider, OpenAIProvider};
//!
//! async fn example() {
//!     let provider = OpenAIProvider::new("your-api-key");
//!     let response = provider
//!         .chat(vec![ChatMessage::user("Hello!")], None, ChatOptions::default())
//!         .await
//!         .unwrap();
//!     println!("OpenAI: {}", response.content);
//! }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::{ProviderConfig, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::error::{ProviderError, RelayError, Result};
use crate::log_component;

use super::{
    classify_transport_error, parse_provider_error, ChatMessage, ChatOptions, LLMProvider,
    LLMResponse, Usage,
};

// ============================================================================
// OpenAI API Request Types
// ============================================================================

/// OpenAI API request body.
#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    /// Model identifier
    model: &'a str,
    /// Conversation messages
    messages: &'a [ChatMessage],
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

// ============================================================================
// OpenAI API Response Types
// ============================================================================

/// OpenAI API response body.
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// OpenAI API error response.
#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
    #[serde(default)]
    r#type: Option<String>,
}

// ============================================================================
// OpenAI Provider
// ============================================================================

/// OpenAI-compatible completion client.
pub struct OpenAIProvider {
    /// API key for authentication
    api_key: String,
    /// API base URL
    api_base: String,
    /// Model used when the caller passes none
    default_model: String,
    /// HTTP client for making requests
    client: Client,
}

impl std::fmt::Debug for OpenAIProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIProvider")
            .field("api_base", &self.api_base)
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given API key.
    ///
    /// # Example
    /// ```
    /// use skillrelay::providers::{LLMProvider, OpenAIProvider};
    ///
    /// let provider = OpenAIProvider::new("sk-xxx");
    /// assert_eq!(provider.name(), "openai");
    /// ```
    pub fn new(api_key: &str) -> Self {
        Self::with_client(api_key, DEFAULT_API_BASE, Client::new())
    }

    /// Create a provider against a custom base URL (trailing slash removed).
    pub fn with_base_url(api_key: &str, api_base: &str) -> Self {
        Self::with_client(api_key, api_base, Client::new())
    }

    /// Create a provider with a custom HTTP client.
    pub fn with_client(api_key: &str, api_base: &str, client: Client) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            client,
        }
    }

    /// Build a provider from configuration.
    ///
    /// Returns `Ok(None)` when no API key is configured.
    pub fn from_config(cfg: &ProviderConfig) -> Result<Option<Self>> {
        let Some(api_key) = cfg.api_key() else {
            return Ok(None);
        };
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build HTTP client: {}", e)))?;

        let mut provider = Self::with_client(api_key, &cfg.api_base, client);
        provider.default_model = cfg.model.clone();
        Ok(Some(provider))
    }
}

// ============================================================================
// Conversion Functions
// ============================================================================

/// Convert an OpenAI API response into an `LLMResponse`.
fn convert_response(response: OpenAIResponse) -> Result<LLMResponse> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| ProviderError::Malformed("response contained no message content".into()))?;

    let mut llm_response = LLMResponse::text(&content);
    if let Some(usage) = response.usage {
        llm_response =
            llm_response.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
    }
    Ok(llm_response)
}

/// Build the error for a non-success status.
fn error_for_status(status: u16, body: &str) -> ProviderError {
    let detail = match serde_json::from_str::<OpenAIErrorResponse>(body) {
        Ok(parsed) => match parsed.error.r#type {
            Some(kind) => format!("{} - {}", kind, parsed.error.message),
            None => parsed.error.message,
        },
        Err(_) => body.trim().to_string(),
    };
    parse_provider_error(status, &detail)
}

// ============================================================================
// LLMProvider Implementation
// ============================================================================

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<&str>,
        options: ChatOptions,
    ) -> Result<LLMResponse> {
        let model = model.unwrap_or(&self.default_model);
        let request = OpenAIRequest {
            model,
            messages: &messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        debug!("OpenAI request to model {}", model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_for_status(status.as_u16(), &body);
            log_component!(
                warn,
                "provider",
                "completion request failed",
                status = status.as_u16(),
                transient = err.is_transient()
            );
            return Err(err.into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(&e))?;
        let parsed: OpenAIResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Malformed(format!("invalid completion body: {}", e)))?;

        let llm_response = convert_response(parsed)?;
        log_component!(
            debug,
            "provider",
            "completion received",
            chars = llm_response.content.chars().count()
        );
        Ok(llm_response)
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// ============================================================================
// Tests
// ============================================================================
