//! Configuration validation: unknown field detection and value checks.

use serde_json::Value;
use std::collections::HashSet;

use super::{Config, CONTENT_PLACEHOLDER};

/// Known top-level config field names.
const KNOWN_TOP_LEVEL: &[&str] = &[
    "provider",
    "summarizer",
    "style",
    "dispatch",
    "history",
    "logging",
];

/// Known fields for each section.
const KNOWN_SECTIONS: &[(&str, &[&str])] = &[
    (
        "provider",
        &[
            "api_key",
            "api_base",
            "model",
            "timeout_secs",
            "max_tokens",
            "temperature",
        ],
    ),
    (
        "summarizer",
        &["fetch_timeout_secs", "max_chars", "prompt_template"],
    ),
    ("style", &["simulated_latency_ms", "default_style"]),
    ("dispatch", &["mode"]),
    (
        "history",
        &["max_messages_per_conversation", "idle_ttl_secs"],
    ),
    ("logging", &["format", "level", "file"]),
];

const KNOWN_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A validation diagnostic.
#[derive(Debug)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub path: String,
    pub message: String,
}

#[derive(Debug, PartialEq)]
pub enum DiagnosticLevel {
    Warn,
    Error,
}

impl Diagnostic {
    fn error(path: &str, message: String) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            path: path.to_string(),
            message,
        }
    }

    fn warn(path: &str, message: String) -> Self {
        Self {
            level: DiagnosticLevel::Warn,
            path: path.to_string(),
            message,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.level {
            DiagnosticLevel::Warn => "[WARN]",
            DiagnosticLevel::Error => "[ERROR]",
        };
        if self.path.is_empty() {
            write!(f, "{} {}", prefix, self.message)
        } else {
            write!(f, "{} {}: {}", prefix, self.path, self.message)
        }
    }
}

/// Simple Levenshtein distance for "did you mean?" suggestions.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.iter().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            row[j + 1] = (prev[j + 1] + 1).min(row[j] + 1).min(prev[j] + cost);
        }
        prev = row;
    }
    prev[b.len()]
}

/// Suggest the closest known field name (if distance <= 3).
pub fn suggest_field(unknown: &str, known: &[&str]) -> Option<String> {
    known
        .iter()
        .map(|k| (k, levenshtein(unknown, k)))
        .filter(|(_, d)| *d <= 3)
        .min_by_key(|(_, d)| *d)
        .map(|(k, _)| format!("did you mean '{}'?", k))
}

fn unknown_field(path: &str, key: &str, known: &[&str]) -> Diagnostic {
    let message = match suggest_field(key, known) {
        Some(suggestion) => format!("Unknown field '{}' ({})", key, suggestion),
        None => format!("Unknown field '{}'", key),
    };
    Diagnostic::warn(path, message)
}

/// Report fields in a raw JSON config that no section recognizes.
///
/// Serde silently ignores unknown fields, so typos would otherwise pass.
pub fn check_unknown_fields(raw: &Value) -> Vec<Diagnostic> {
    let Some(obj) = raw.as_object() else {
        return vec![Diagnostic::error(
            "",
            "Config must be a JSON object".to_string(),
        )];
    };

    let mut diagnostics = Vec::new();
    let top: HashSet<&str> = KNOWN_TOP_LEVEL.iter().copied().collect();

    for (key, value) in obj {
        if !top.contains(key.as_str()) {
            diagnostics.push(unknown_field(key, key, KNOWN_TOP_LEVEL));
            continue;
        }
        let Some((_, fields)) = KNOWN_SECTIONS.iter().find(|(name, _)| name == key) else {
            continue;
        };
        if let Some(section) = value.as_object() {
            for field in section.keys() {
                if !fields.contains(&field.as_str()) {
                    let path = format!("{}.{}", key, field);
                    diagnostics.push(unknown_field(&path, field, fields));
                }
            }
        }
    }

    diagnostics
}

impl Config {
    /// Check values that deserialize fine but cannot work at runtime.
    pub fn validate(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if self.provider.timeout_secs == 0 {
            diagnostics.push(Diagnostic::error(
                "provider.timeout_secs",
                "must be greater than zero".to_string(),
            ));
        }
        if self.provider.model.trim().is_empty() {
            diagnostics.push(Diagnostic::error(
                "provider.model",
                "must not be empty".to_string(),
            ));
        }
        if self.provider.api_key().is_none() {
            diagnostics.push(Diagnostic::warn(
                "provider.api_key",
                "not set; completion and summarization will answer 'service unavailable'"
                    .to_string(),
            ));
        }
        if self.summarizer.fetch_timeout_secs == 0 {
            diagnostics.push(Diagnostic::error(
                "summarizer.fetch_timeout_secs",
                "must be greater than zero".to_string(),
            ));
        }
        if self.summarizer.max_chars == 0 {
            diagnostics.push(Diagnostic::error(
                "summarizer.max_chars",
                "must be greater than zero".to_string(),
            ));
        }
        if !self.summarizer.prompt_template.contains(CONTENT_PLACEHOLDER) {
            diagnostics.push(Diagnostic::warn(
                "summarizer.prompt_template",
                format!(
                    "has no {} placeholder; the document will be appended after it",
                    CONTENT_PLACEHOLDER
                ),
            ));
        }
        if self.history.max_messages_per_conversation == Some(0) {
            diagnostics.push(Diagnostic::error(
                "history.max_messages_per_conversation",
                "must be greater than zero when set".to_string(),
            ));
        }
        if !KNOWN_LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            diagnostics.push(Diagnostic::warn(
                "logging.level",
                format!(
                    "'{}' is not a plain level; it will be parsed as a filter directive",
                    self.logging.level
                ),
            ));
        }

        diagnostics
    }

    /// Whether `validate` reported any errors.
    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|d| d.level == DiagnosticLevel::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("provider", "provider"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("provder", "provider"), 1);
    }

    #[test]
    fn test_suggest_field_match() {
        let suggestion = suggest_field("sumarizer", KNOWN_TOP_LEVEL);
        assert_eq!(suggestion.as_deref(), Some("did you mean 'summarizer'?"));
    }

    #[test]
    fn test_suggest_field_no_match() {
        assert!(suggest_field("zzzzzzzzzzzz", KNOWN_TOP_LEVEL).is_none());
    }

    #[test]
    fn test_unknown_fields_clean_config() {
        let raw = json!({"provider": {"model": "gpt-4o"}, "dispatch": {"mode": "routed"}});
        assert!(check_unknown_fields(&raw).is_empty());
    }

    #[test]
    fn test_unknown_fields_reported() {
        let raw = json!({"provder": {}, "summarizer": {"max_char": 10}});
        let diagnostics = check_unknown_fields(&raw);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.iter().any(|d| d.path == "provder"));
        assert!(diagnostics
            .iter()
            .any(|d| d.path == "summarizer.max_char" && d.message.contains("max_chars")));
    }

    #[test]
    fn test_not_an_object() {
        let diagnostics = check_unknown_fields(&json!([1, 2]));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, DiagnosticLevel::Error);
    }

    #[test]
    fn test_default_config_has_no_errors() {
        let config = Config::default();
        assert!(!config.has_errors());
        // Missing key is only a warning.
        assert!(config
            .validate()
            .iter()
            .any(|d| d.path == "provider.api_key" && d.level == DiagnosticLevel::Warn));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.summarizer.max_chars = 0;
        config.summarizer.fetch_timeout_secs = 0;
        config.summarizer.prompt_template = "Summarize please".to_string();
        config.history.max_messages_per_conversation = Some(0);

        let errors: Vec<String> = config
            .validate()
            .into_iter()
            .filter(|d| d.level == DiagnosticLevel::Error)
            .map(|d| d.path)
            .collect();
        assert!(errors.contains(&"summarizer.max_chars".to_string()));
        assert!(errors.contains(&"summarizer.fetch_timeout_secs".to_string()));
        assert!(!errors.contains(&"summarizer.prompt_template".to_string()));
        assert!(errors.contains(&"history.max_messages_per_conversation".to_string()));
        assert!(config.has_errors());

        assert!(config
            .validate()
            .iter()
            .any(|d| d.path == "summarizer.prompt_template" && d.level == DiagnosticLevel::Warn));
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::error("provider.model", "must not be empty".to_string());
        assert_eq!(d.to_string(), "[ERROR] provider.model: must not be empty");
    }
}
