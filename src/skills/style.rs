//! Text styling skill.
//!
//! Pure and total: every input produces an output, unknown styles are the
//! identity transform.

use std::time::Duration;

use crate::config::StyleConfig;

/// Recognized text styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Every character to upper case
    Uppercase,
    /// Every character to lower case
    Lowercase,
    /// Whitespace runs to one underscore, then lower case
    SnakeCase,
    /// Input returned unchanged
    Identity,
}

impl Style {
    /// Parse a style hint. Absent or unrecognized hints map to `Identity`.
    ///
    /// # Example
    /// ```
    /// use skillrelay::skills::Style;
    ///
    /// assert_eq!(Style::parse(Some("snake_case")), Style::SnakeCase);
    /// assert_eq!(Style::parse(Some("shouting")), Style::Identity);
    /// assert_eq!(Style::parse(None), Style::Identity);
    /// ```
    pub fn parse(hint: Option<&str>) -> Self {
        match hint {
            Some("uppercase") => Style::Uppercase,
            Some("lowercase") => Style::Lowercase,
            Some("snake_case") => Style::SnakeCase,
            _ => Style::Identity,
        }
    }

    /// Canonical name of the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Uppercase => "uppercase",
            Style::Lowercase => "lowercase",
            Style::SnakeCase => "snake_case",
            Style::Identity => "identity",
        }
    }
}

/// Stateless text transformer with an optional simulated latency.
#[derive(Debug, Clone, Default)]
pub struct StyleTransformer {
    latency: Duration,
}

impl StyleTransformer {
    /// Create a transformer with no artificial delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transformer from configuration.
    pub fn from_config(cfg: &StyleConfig) -> Self {
        Self {
            latency: Duration::from_millis(cfg.simulated_latency_ms),
        }
    }

    /// Set the artificial delay applied by [`StyleTransformer::transform`].
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Apply a style to `text`.
    ///
    /// # Example
    /// ```
    /// use skillrelay::skills::{Style, StyleTransformer};
    ///
    /// assert_eq!(StyleTransformer::apply("Bonjour les amis", Style::SnakeCase), "bonjour_les_amis");
    /// ```
    pub fn apply(text: &str, style: Style) -> String {
        match style {
            Style::Uppercase => text.to_uppercase(),
            Style::Lowercase => text.to_lowercase(),
            Style::SnakeCase => snake_case(text),
            Style::Identity => text.to_string(),
        }
    }

    /// Apply a style hint after the configured latency.
    ///
    /// ```
    /// use skillrelay::skills::StyleTransformer;
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let styler = StyleTransformer::new().with_latency(Duration::ZERO);
    /// assert_eq!(styler.transform("abc", Some("uppercase")).await, "ABC");
    /// # });
    /// ```
    pub async fn transform(&self, text: &str, hint: Option<&str>) -> String {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Self::apply(text, Style::parse(hint))
    }
}

fn snake_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "hello",
        "Bonjour les amis",
        "MiXeD 123 case",
        "  padded  text ",
        "straße",
        "ÉCOLE élève",
        "tabs\tand\nnewlines",
    ];

    #[test]
    fn test_uppercase() {
        assert_eq!(StyleTransformer::apply("salut", Style::Uppercase), "SALUT");
        assert_eq!(StyleTransformer::apply("élève", Style::Uppercase), "ÉLÈVE");
    }

    #[test]
    fn test_uppercase_is_idempotent() {
        for s in SAMPLES {
            let once = StyleTransformer::apply(s, Style::Uppercase);
            let twice = StyleTransformer::apply(&once, Style::Uppercase);
            assert_eq!(once, twice, "input {:?}", s);
            assert!(!once.chars().any(char::is_lowercase), "input {:?}", s);
        }
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(StyleTransformer::apply("HeLLo", Style::Lowercase), "hello");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(
            StyleTransformer::apply("Bonjour les amis", Style::SnakeCase),
            "bonjour_les_amis"
        );
        assert_eq!(StyleTransformer::apply("a   b", Style::SnakeCase), "a_b");
        assert_eq!(
            StyleTransformer::apply("tabs\tand\nnewlines", Style::SnakeCase),
            "tabs_and_newlines"
        );
        assert_eq!(StyleTransformer::apply(" x ", Style::SnakeCase), "_x_");
    }

    #[test]
    fn test_snake_case_never_contains_spaces() {
        for s in ["Hello World 42", "a b c d", "   ", "NoSpaces", "1 2  3   4"] {
            assert!(!StyleTransformer::apply(s, Style::SnakeCase).contains(' '));
        }
    }

    #[test]
    fn test_unknown_style_is_identity() {
        for s in SAMPLES {
            for hint in [Some("unknown-style"), Some("UPPERCASE"), Some(""), None] {
                let style = Style::parse(hint);
                assert_eq!(StyleTransformer::apply(s, style), *s);
            }
        }
    }

    #[test]
    fn test_style_names_roundtrip() {
        for style in [Style::Uppercase, Style::Lowercase, Style::SnakeCase] {
            assert_eq!(Style::parse(Some(style.as_str())), style);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transform_with_latency() {
        let transformer = StyleTransformer::new().with_latency(Duration::from_millis(50));
        let started = tokio::time::Instant::now();
        let out = transformer.transform("abc", Some("uppercase")).await;
        assert_eq!(out, "ABC");
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_transform_without_latency() {
        let transformer = StyleTransformer::from_config(&StyleConfig::default());
        assert_eq!(transformer.transform("abc", None).await, "abc");
    }
}
