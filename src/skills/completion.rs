//! Language-model proxy skill.
//!
//! Sends one single-turn user prompt to the configured completion service.
//! No conversation context is forwarded and nothing is retried.

use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::error::{RelayError, Result};
use crate::log_component;
use crate::providers::{ChatMessage, ChatOptions, LLMProvider, OpenAIProvider};

/// Completion skill backed by an optional [`LLMProvider`].
#[derive(Clone, Default)]
pub struct LanguageModelProxy {
    provider: Option<Arc<dyn LLMProvider>>,
    options: ChatOptions,
}

impl std::fmt::Debug for LanguageModelProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageModelProxy")
            .field("provider", &self.provider.as_ref().map(|p| p.name()))
            .field("options", &self.options)
            .finish()
    }
}

impl LanguageModelProxy {
    /// Create a proxy around a provider.
    pub fn new(provider: Arc<dyn LLMProvider>) -> Self {
        Self {
            provider: Some(provider),
            options: ChatOptions::default(),
        }
    }

    /// Create a proxy with no backing service. Every call fails with
    /// [`RelayError::ServiceUnavailable`].
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Build the proxy from configuration; the provider exists only when an
    /// API key is configured.
    pub fn from_config(cfg: &ProviderConfig) -> Result<Self> {
        let mut options = ChatOptions::new();
        options.max_tokens = cfg.max_tokens;
        options.temperature = cfg.temperature;

        let proxy = match OpenAIProvider::from_config(cfg)? {
            Some(provider) => Self::new(Arc::new(provider)),
            None => {
                log_component!(
                    warn,
                    "llm-proxy",
                    "no completion API key configured; completion and summarization are unavailable"
                );
                Self::unconfigured()
            }
        };
        Ok(proxy.with_options(options))
    }

    /// Set sampling options sent with every call.
    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Whether a completion service client is present.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Complete a single-turn prompt.
    ///
    /// # Errors
    /// * [`RelayError::ServiceUnavailable`] when no client is configured
    /// * [`RelayError::Upstream`] when the remote call fails
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let provider = self.provider.as_ref().ok_or_else(|| {
            RelayError::ServiceUnavailable("no completion API key configured".to_string())
        })?;

        log_component!(
            debug,
            "llm-proxy",
            "sending completion request",
            provider = provider.name(),
            model = provider.default_model(),
            prompt_chars = prompt.chars().count()
        );

        let response = provider
            .chat(vec![ChatMessage::user(prompt)], None, self.options.clone())
            .await?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::providers::{ChatRole, LLMResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingProvider {
        seen: Mutex<Vec<Vec<ChatMessage>>>,
        reply: &'static str,
    }

    #[async_trait]
    impl LLMProvider for RecordingProvider {
        async fn chat(
            &self,
            messages: Vec<ChatMessage>,
            _model: Option<&str>,
            _options: ChatOptions,
        ) -> Result<LLMResponse> {
            self.seen.lock().unwrap().push(messages);
            Ok(LLMResponse::text(self.reply))
        }

        fn default_model(&self) -> &str {
            "recording-model"
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LLMProvider for FailingProvider {
        async fn chat(
            &self,
            _messages: Vec<ChatMessage>,
            _model: Option<&str>,
            _options: ChatOptions,
        ) -> Result<LLMResponse> {
            Err(ProviderError::ServerError("boom".into()).into())
        }

        fn default_model(&self) -> &str {
            "failing-model"
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_unconfigured_proxy_is_unavailable() {
        let proxy = LanguageModelProxy::unconfigured();
        assert!(!proxy.is_configured());
        let err = proxy.complete("hello").await.unwrap_err();
        assert!(matches!(err, RelayError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_complete_sends_single_user_message() {
        let provider = Arc::new(RecordingProvider {
            seen: Mutex::new(Vec::new()),
            reply: "Salut !",
        });
        let proxy = LanguageModelProxy::new(provider.clone());

        assert_eq!(proxy.complete("Dis bonjour").await.unwrap(), "Salut !");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 1);
        assert_eq!(seen[0][0].role, ChatRole::User);
        assert_eq!(seen[0][0].content, "Dis bonjour");
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let proxy = LanguageModelProxy::new(Arc::new(FailingProvider));
        let err = proxy.complete("hello").await.unwrap_err();
        assert!(matches!(
            err,
            RelayError::Upstream(ProviderError::ServerError(_))
        ));
    }

    #[test]
    fn test_from_config_without_key() {
        let proxy = LanguageModelProxy::from_config(&ProviderConfig::default()).unwrap();
        assert!(!proxy.is_configured());
    }

    #[test]
    fn test_from_config_with_key() {
        let cfg = ProviderConfig {
            api_key: Some("sk-test".into()),
            max_tokens: Some(256),
            ..Default::default()
        };
        let proxy = LanguageModelProxy::from_config(&cfg).unwrap();
        assert!(proxy.is_configured());
        assert_eq!(proxy.options.max_tokens, Some(256));
    }
}
