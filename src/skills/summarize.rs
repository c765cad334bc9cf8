//! Document summarization skill.
//!
//! Fetches a remote document with a bounded GET, keeps a fixed character
//! prefix of the body and asks the completion proxy to summarize it.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{SummarizerConfig, CONTENT_PLACEHOLDER};
use crate::error::{RelayError, Result};
use crate::log_component;
use crate::utils::string::prefix_chars;

use super::completion::LanguageModelProxy;

const FETCH_USER_AGENT: &str = concat!("skillrelay/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 5;
/// Worst-case UTF-8 width; reading this many bytes per character always
/// yields enough text for the character budget.
const BYTES_PER_CHAR: usize = 4;

// ============================================================================
// Fetching
// ============================================================================

/// Retrieves the raw text of a remote document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch `url` and return its body as text.
    ///
    /// Non-success statuses and transport failures are [`RelayError::Fetch`].
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// `reqwest`-backed fetcher with a fixed timeout and a body size cap.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_bytes: usize,
}

impl HttpFetcher {
    /// Create a fetcher that gives up after `timeout` and reads at most
    /// `max_bytes` of any body.
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .user_agent(FETCH_USER_AGENT)
            .build()
            .map_err(|e| RelayError::Config(format!("failed to build fetch client: {}", e)))?;
        Ok(Self { client, max_bytes })
    }

    /// Create a fetcher sized for the summarizer configuration.
    pub fn from_config(cfg: &SummarizerConfig) -> Result<Self> {
        Self::new(
            Duration::from_secs(cfg.fetch_timeout_secs),
            cfg.max_chars.saturating_mul(BYTES_PER_CHAR),
        )
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RelayError::Fetch(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Fetch(format!("{} returned HTTP {}", url, status)));
        }

        read_body_limited(response, self.max_bytes).await
    }
}

/// Read a response body in chunks, stopping once `max_bytes` are buffered.
///
/// The bytes are converted to text lossily; a multibyte character split by
/// the cap becomes one replacement character at the very end.
async fn read_body_limited(mut response: reqwest::Response, max_bytes: usize) -> Result<String> {
    let mut buf: Vec<u8> = Vec::new();

    while buf.len() < max_bytes {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(max_bytes - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => return Err(RelayError::Fetch(format!("failed to read body: {}", e))),
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

// ============================================================================
// Prompt construction
// ============================================================================

/// Keep the first `max_chars` characters of `body`.
///
/// # Example
/// ```
/// use skillrelay::skills::truncate_document;
///
/// assert_eq!(truncate_document("élève", 3), "élè");
/// ```
pub fn truncate_document(body: &str, max_chars: usize) -> String {
    prefix_chars(body, max_chars)
}

/// Substitute `content` into the prompt template.
///
/// A template without the placeholder gets the content appended on a new line.
pub fn build_prompt(template: &str, content: &str) -> String {
    if template.contains(CONTENT_PLACEHOLDER) {
        template.replace(CONTENT_PLACEHOLDER, content)
    } else {
        format!("{}\n{}", template, content)
    }
}

// ============================================================================
// Summarizer
// ============================================================================

/// Fetch-then-complete summarization skill.
#[derive(Clone)]
pub struct DocumentSummarizer {
    fetcher: Arc<dyn DocumentFetcher>,
    proxy: LanguageModelProxy,
    max_chars: usize,
    prompt_template: String,
}

impl std::fmt::Debug for DocumentSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSummarizer")
            .field("proxy", &self.proxy)
            .field("max_chars", &self.max_chars)
            .finish_non_exhaustive()
    }
}

impl DocumentSummarizer {
    /// Create a summarizer with the default character budget and prompt.
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, proxy: LanguageModelProxy) -> Self {
        let defaults = SummarizerConfig::default();
        Self {
            fetcher,
            proxy,
            max_chars: defaults.max_chars,
            prompt_template: defaults.prompt_template,
        }
    }

    /// Build an HTTP-backed summarizer from configuration.
    pub fn from_config(cfg: &SummarizerConfig, proxy: LanguageModelProxy) -> Result<Self> {
        let fetcher = HttpFetcher::from_config(cfg)?;
        Ok(Self::new(Arc::new(fetcher), proxy)
            .with_max_chars(cfg.max_chars)
            .with_prompt_template(&cfg.prompt_template))
    }

    /// Override the character budget.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Override the prompt template.
    pub fn with_prompt_template(mut self, template: &str) -> Self {
        self.prompt_template = template.to_string();
        self
    }

    /// Summarize the document at `url`.
    ///
    /// # Errors
    /// * [`RelayError::Fetch`] when the document cannot be retrieved
    /// * whatever [`LanguageModelProxy::complete`] fails with
    pub async fn summarize(&self, url: &str) -> Result<String> {
        let body = self.fetcher.fetch(url).await?;
        let fetched_chars = body.chars().count();
        let content = truncate_document(&body, self.max_chars);

        log_component!(
            debug,
            "summarizer",
            "document fetched",
            url = url,
            chars = fetched_chars,
            truncated = fetched_chars > self.max_chars
        );

        let prompt = build_prompt(&self.prompt_template, &content);
        self.proxy.complete(&prompt).await
    }
}
