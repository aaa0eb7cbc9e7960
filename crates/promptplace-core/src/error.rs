//! Error types and handling for promptplace-core operations.
//!
//! The page transform itself never fails: "no form on the page" and "the
//! rewritten page has no structure" are handled through fallback paths. Errors
//! therefore come from two places only:
//!
//! - **Collaborator errors**: communication with the repository host or the
//!   language model (HTTP status failures, transport errors, undecodable payloads)
//! - **Extraction errors**: no markup could be recovered from a model response
//!
//! plus the ambient configuration and I/O failures of process startup.
//!
//! ## Propagation
//!
//! ```rust
//! use promptplace_core::{Error, extract_html};
//!
//! let recovered = match extract_html("no code here") {
//!     Ok(html) => html,
//!     // Extraction failures are absorbed by the caller, not escalated
//!     Err(Error::Extraction(_)) => "no code here".to_string(),
//!     Err(e) => panic!("unexpected error: {e}"),
//! };
//! assert_eq!(recovered, "no code here");
//! ```

use thiserror::Error;

/// The main error type for promptplace-core operations.
///
/// ## Display vs Debug
///
/// - `Display` provides the message that ends up in the failure notice posted
///   back to the originating issue
/// - `Debug` includes full error details and source chain information
#[derive(Error, Debug)]
pub enum Error {
    /// The repository host answered with a failure.
    ///
    /// Covers issue retrieval, page read/write (including a rejected stale
    /// version token), and malformed host responses such as a contents payload
    /// without `content` or a commit response without a `sha`.
    #[error("GitHub API request failed: {0}")]
    GitHub(String),

    /// The language model answered with a failure or an empty completion.
    #[error("Model request failed: {0}")]
    Model(String),

    /// Transport-level HTTP failure talking to either collaborator.
    ///
    /// ## Recoverability
    ///
    /// Connection and timeout errors are typically recoverable, while
    /// malformed URL errors are permanent.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// No markup could be recovered from a model response.
    ///
    /// The orchestrating pipeline catches this immediately and falls back to
    /// the raw response text.
    #[error("HTML extraction failed: {0}")]
    Extraction(String),

    /// Configuration is missing or invalid.
    ///
    /// ## Common Causes
    ///
    /// - A required environment variable is unset or empty
    /// - The issue number is not numeric
    /// - A configured API base URL cannot be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    ///
    /// Occurs when a host or model response body does not have the expected
    /// JSON shape, or a TOML configuration file is malformed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored page content could not be decoded (base64 or UTF-8).
    #[error("Decode error: {0}")]
    Decode(String),

    /// I/O operation failed (reading a configuration file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for Error {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl Error {
    /// Whether this error came from a collaborator call (repository host or
    /// language model).
    ///
    /// Collaborator errors propagate to the top level, where they are turned
    /// into a failure notice on the originating issue.
    ///
    /// ```rust
    /// use promptplace_core::Error;
    ///
    /// assert!(Error::GitHub("404 Not Found".into()).is_collaborator());
    /// assert!(Error::Model("empty completion".into()).is_collaborator());
    /// assert!(!Error::Extraction("no markup".into()).is_collaborator());
    /// ```
    #[must_use]
    pub const fn is_collaborator(&self) -> bool {
        matches!(
            self,
            Self::GitHub(_)
                | Self::Model(_)
                | Self::Network(_)
                | Self::Serialization(_)
                | Self::Decode(_)
        )
    }

    /// Check if the error might be recoverable through retry logic.
    ///
    /// Only transport timeouts/connection failures and interrupted I/O qualify.
    /// Retrying is left to whoever schedules the run; the pipeline never
    /// retries on its own.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier for structured logs.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::GitHub(_) => "github",
            Self::Model(_) => "model",
            Self::Network(_) => "network",
            Self::Extraction(_) => "extraction",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Decode(_) => "decode",
            Self::Io(_) => "io",
        }
    }
}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::Engine;
    use proptest::prelude::*;
    use std::io;

    #[test]
    fn test_error_display_formatting() {
        let cases = vec![
            (Error::GitHub("404".to_string()), "GitHub API request failed"),
            (Error::Model("empty".to_string()), "Model request failed"),
            (
                Error::Extraction("no markup".to_string()),
                "HTML extraction failed",
            ),
            (Error::Config("missing".to_string()), "Configuration error"),
            (
                Error::Serialization("bad json".to_string()),
                "Serialization error",
            ),
            (Error::Decode("bad base64".to_string()), "Decode error"),
        ];

        for (error, prefix) in cases {
            let rendered = error.to_string();
            assert!(
                rendered.starts_with(prefix),
                "expected '{rendered}' to start with '{prefix}'"
            );
        }
    }

    #[test]
    fn test_error_categories() {
        let cases = vec![
            (Error::GitHub("x".to_string()), "github"),
            (Error::Model("x".to_string()), "model"),
            (Error::Extraction("x".to_string()), "extraction"),
            (Error::Config("x".to_string()), "config"),
            (Error::Serialization("x".to_string()), "serialization"),
            (Error::Decode("x".to_string()), "decode"),
            (Error::Io(io::Error::other("x")), "io"),
        ];

        for (error, expected) in cases {
            assert_eq!(error.category(), expected);
        }
    }

    #[test]
    fn test_collaborator_classification() {
        assert!(Error::GitHub("x".into()).is_collaborator());
        assert!(Error::Model("x".into()).is_collaborator());
        assert!(Error::Decode("x".into()).is_collaborator());
        assert!(Error::Serialization("x".into()).is_collaborator());
        assert!(!Error::Extraction("x".into()).is_collaborator());
        assert!(!Error::Config("x".into()).is_collaborator());
        assert!(!Error::Io(io::Error::other("x")).is_collaborator());
    }

    #[test]
    fn test_error_recoverability() {
        assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "t")).is_recoverable());
        assert!(Error::Io(io::Error::new(io::ErrorKind::Interrupted, "i")).is_recoverable());
        assert!(!Error::Io(io::Error::new(io::ErrorKind::NotFound, "n")).is_recoverable());
        assert!(!Error::GitHub("409 Conflict".into()).is_recoverable());
        assert!(!Error::Extraction("x".into()).is_recoverable());
    }

    #[test]
    fn test_error_from_decode_failures() {
        let err: Error = base64::engine::general_purpose::STANDARD
            .decode("not base64!!")
            .unwrap_err()
            .into();
        assert_eq!(err.category(), "decode");

        let err: Error = String::from_utf8(vec![0xff, 0xfe]).unwrap_err().into();
        assert_eq!(err.category(), "decode");
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            other => panic!("expected serialization error, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn test_extraction_error_with_arbitrary_messages(msg in r".{0,500}") {
            let error = Error::Extraction(msg.clone());
            let rendered = error.to_string();
            prop_assert!(rendered.contains(&msg));
            prop_assert_eq!(error.category(), "extraction");
        }
    }
}
