//! Error types for SkillRelay
//!
//! This module defines all error types used throughout the crate.
//! Uses `thiserror` for ergonomic error handling with automatic `Display` and
//! `Error` trait implementations.
//!
//! Skill failures (`ServiceUnavailable`, `Upstream`, `Fetch`) are *contained*:
//! the executor turns them into a normal textual response. `Unsupported` is the
//! only failure that reaches the caller as a hard error.

use std::fmt;
use thiserror::Error;

// ============================================================================
// Provider Error Classification
// ============================================================================

/// Structured classification of completion-service failures.
///
/// Produced by [`crate::providers::parse_provider_error`] for HTTP failures and
/// by the provider itself for transport and decoding problems.
#[derive(Debug)]
pub enum ProviderError {
    /// 401: Invalid API key or authentication failure
    Auth(String),
    /// 429: Rate limit or quota exceeded
    RateLimit(String),
    /// 402: Payment required or billing issue
    Billing(String),
    /// 500/502/503/504: Server-side errors
    ServerError(String),
    /// 400: Bad request, invalid JSON, malformed parameters
    InvalidRequest(String),
    /// 404: Model not found or endpoint not available
    ModelNotFound(String),
    /// Connection or read timeout
    Timeout(String),
    /// Connection refused, DNS failure, TLS failure
    Network(String),
    /// Success status but the body could not be understood
    Malformed(String),
    /// Catch-all for unrecognized errors
    Unknown(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Auth(msg) => write!(f, "Authentication error: {}", msg),
            ProviderError::RateLimit(msg) => write!(f, "Rate limit error: {}", msg),
            ProviderError::Billing(msg) => write!(f, "Billing error: {}", msg),
            ProviderError::ServerError(msg) => write!(f, "Server error: {}", msg),
            ProviderError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ProviderError::ModelNotFound(msg) => write!(f, "Model not found: {}", msg),
            ProviderError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            ProviderError::Network(msg) => write!(f, "Network error: {}", msg),
            ProviderError::Malformed(msg) => write!(f, "Malformed response: {}", msg),
            ProviderError::Unknown(msg) => write!(f, "Unknown provider error: {}", msg),
        }
    }
}

impl ProviderError {
    /// Returns `true` if a later attempt could plausibly succeed.
    ///
    /// Nothing in this crate retries; the flag is surfaced in logs so an
    /// outer client can decide.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimit(_)
                | ProviderError::ServerError(_)
                | ProviderError::Timeout(_)
                | ProviderError::Network(_)
        )
    }

    /// Returns the HTTP status code associated with this error, if applicable.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ProviderError::Auth(_) => Some(401),
            ProviderError::RateLimit(_) => Some(429),
            ProviderError::Billing(_) => Some(402),
            ProviderError::ServerError(_) => Some(500),
            ProviderError::InvalidRequest(_) => Some(400),
            ProviderError::ModelNotFound(_) => Some(404),
            ProviderError::Timeout(_)
            | ProviderError::Network(_)
            | ProviderError::Malformed(_)
            | ProviderError::Unknown(_) => None,
        }
    }
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        RelayError::Upstream(err)
    }
}

// ============================================================================
// Error Kind
// ============================================================================

/// Coarse failure taxonomy, used for structured logs and failed events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required external credential or client missing.
    Configuration,
    /// Remote completion call failed.
    Upstream,
    /// Remote document fetch failed.
    Fetch,
    /// Operation not supported (cancellation).
    Unsupported,
    /// Everything else: config files, I/O, serialization, closed channels.
    Internal,
}

impl ErrorKind {
    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Unsupported => "unsupported",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Primary Error Type
// ============================================================================

/// The primary error type for SkillRelay operations.
#[derive(Error, Debug)]
pub enum RelayError {
    /// A skill needs an external client that is not configured (no credential).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The remote completion call failed.
    #[error("Upstream error: {0}")]
    Upstream(ProviderError),

    /// The remote document could not be fetched.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The requested operation is not supported.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Invalid configuration file or values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Event channel closed unexpectedly
    #[error("Bus error: channel closed")]
    BusClosed,
}

impl RelayError {
    /// Map this error onto the failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::ServiceUnavailable(_) => ErrorKind::Configuration,
            RelayError::Upstream(_) => ErrorKind::Upstream,
            RelayError::Fetch(_) => ErrorKind::Fetch,
            RelayError::Unsupported(_) => ErrorKind::Unsupported,
            RelayError::Config(_)
            | RelayError::Io(_)
            | RelayError::Json(_)
            | RelayError::BusClosed => ErrorKind::Internal,
        }
    }

    /// Whether the executor renders this error as a normal text response.
    pub fn is_contained(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Configuration | ErrorKind::Upstream | ErrorKind::Fetch
        )
    }
}

/// A specialized `Result` type for SkillRelay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelayError::ServiceUnavailable("no API key configured".to_string());
        assert_eq!(err.to_string(), "Service unavailable: no API key configured");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let relay_err: RelayError = io_err.into();
        assert!(matches!(relay_err, RelayError::Io(_)));
        assert_eq!(relay_err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            RelayError::ServiceUnavailable("x".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            RelayError::Upstream(ProviderError::Auth("x".into())).kind(),
            ErrorKind::Upstream
        );
        assert_eq!(RelayError::Fetch("x".into()).kind(), ErrorKind::Fetch);
        assert_eq!(
            RelayError::Unsupported("x".into()).kind(),
            ErrorKind::Unsupported
        );
        assert_eq!(RelayError::BusClosed.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_contained_errors() {
        assert!(RelayError::ServiceUnavailable("x".into()).is_contained());
        assert!(RelayError::Upstream(ProviderError::Timeout("x".into())).is_contained());
        assert!(RelayError::Fetch("x".into()).is_contained());

        assert!(!RelayError::Unsupported("cancel".into()).is_contained());
        assert!(!RelayError::BusClosed.is_contained());
        assert!(!RelayError::Config("bad".into()).is_contained());
    }

    #[test]
    fn test_error_kind_names() {
        assert_eq!(ErrorKind::Configuration.to_string(), "configuration");
        assert_eq!(ErrorKind::Upstream.as_str(), "upstream");
        assert_eq!(ErrorKind::Fetch.as_str(), "fetch");
        assert_eq!(ErrorKind::Unsupported.as_str(), "unsupported");
        assert_eq!(ErrorKind::Internal.as_str(), "internal");
    }

    // ====================================================================
    // ProviderError tests
    // ====================================================================

    #[test]
    fn test_provider_error_display() {
        assert!(ProviderError::Auth("bad key".into())
            .to_string()
            .contains("Authentication error"));
        assert!(ProviderError::RateLimit("quota".into())
            .to_string()
            .contains("Rate limit error"));
        assert!(ProviderError::Network("refused".into())
            .to_string()
            .contains("Network error"));
        assert!(ProviderError::Malformed("no choices".into())
            .to_string()
            .contains("Malformed response"));
        assert!(ProviderError::Unknown("???".into())
            .to_string()
            .contains("Unknown provider error"));
    }

    #[test]
    fn test_provider_error_is_transient() {
        assert!(ProviderError::RateLimit("429".into()).is_transient());
        assert!(ProviderError::ServerError("500".into()).is_transient());
        assert!(ProviderError::Timeout("timeout".into()).is_transient());
        assert!(ProviderError::Network("refused".into()).is_transient());

        assert!(!ProviderError::Auth("401".into()).is_transient());
        assert!(!ProviderError::Billing("402".into()).is_transient());
        assert!(!ProviderError::InvalidRequest("400".into()).is_transient());
        assert!(!ProviderError::Malformed("{}".into()).is_transient());
    }

    #[test]
    fn test_provider_error_status_code() {
        assert_eq!(ProviderError::Auth("x".into()).status_code(), Some(401));
        assert_eq!(
            ProviderError::RateLimit("x".into()).status_code(),
            Some(429)
        );
        assert_eq!(
            ProviderError::ModelNotFound("x".into()).status_code(),
            Some(404)
        );
        assert_eq!(ProviderError::Timeout("x".into()).status_code(), None);
        assert_eq!(ProviderError::Malformed("x".into()).status_code(), None);
    }

    #[test]
    fn test_upstream_display() {
        let err: RelayError = ProviderError::Auth("invalid key".into()).into();
        assert_eq!(
            err.to_string(),
            "Upstream error: Authentication error: invalid key"
        );
    }
}
