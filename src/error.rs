//! Error taxonomy for the streaming pipeline.
//!
//! Fatal conditions are [`Error`] variants and tear the session down.
//! Recoverable per-event problems are [`DecodeWarning`]s: the event is
//! skipped, the warning is recorded on the outcome, and the stream keeps
//! going.

use serde::Deserialize;

/// Longest excerpt of offending input carried in a [`DecodeWarning`].
const WARNING_EXCERPT_CHARS: usize = 160;

/// A fatal session error. Any of these ends the stream; text already
/// delivered to the host stays delivered.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration cannot produce a request (empty credential,
    /// empty endpoint, empty conversation).
    #[error("configuration error: {0}")]
    Config(String),

    /// Connection, TLS, timeout, or mid-body failure from the HTTP layer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status before streaming.
    #[error("endpoint returned {status}: {detail}")]
    Status {
        status: reqwest::StatusCode,
        detail: String,
    },

    /// A chunk boundary exposed bytes that are not a prefix of valid
    /// UTF-8. Incomplete sequences are carried, so this only fires on
    /// genuinely invalid input.
    #[error("response body is not valid UTF-8")]
    InvalidUtf8,

    /// The background task aborted or panicked instead of returning.
    #[error("session task failed: {0}")]
    Task(String),
}

/// Error payload many OpenAI-compatible endpoints attach to non-success
/// responses.
#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: String,
}

impl Error {
    /// Build a [`Error::Status`] from a non-success response, pulling the
    /// human-readable message out of the provider's error JSON when the
    /// body carries one.
    pub fn status(status: reqwest::StatusCode, body: &str) -> Self {
        let detail = match serde_json::from_str::<ProviderError>(body) {
            Ok(parsed) => match parsed.error.error_type {
                Some(kind) => format!("{}: {}", kind, parsed.error.message),
                None => parsed.error.message,
            },
            Err(_) => truncate_chars(body.trim(), WARNING_EXCERPT_CHARS),
        };
        Error::Status { status, detail }
    }
}

/// A malformed stream event that was skipped rather than treated as
/// fatal. Carries enough of the offending payload to diagnose the
/// producer without retaining entire responses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}: {excerpt:?}")]
pub struct DecodeWarning {
    /// What was wrong with the event.
    pub reason: String,

    /// Truncated copy of the offending line.
    pub excerpt: String,
}

impl DecodeWarning {
    pub fn new(reason: impl Into<String>, offending: &str) -> Self {
        Self {
            reason: reason.into(),
            excerpt: truncate_chars(offending, WARNING_EXCERPT_CHARS),
        }
    }
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_provider_error_body() {
        let body = r#"{"error":{"type":"invalid_request_error","message":"bad model"}}"#;
        let err = Error::status(reqwest::StatusCode::BAD_REQUEST, body);
        match err {
            Error::Status { status, detail } => {
                assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
                assert_eq!(detail, "invalid_request_error: bad model");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_falls_back_to_raw_body() {
        let err = Error::status(reqwest::StatusCode::BAD_GATEWAY, "upstream unavailable\n");
        match err {
            Error::Status { detail, .. } => assert_eq!(detail, "upstream unavailable"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_warning_excerpt_is_truncated() {
        let long = "x".repeat(500);
        let warning = DecodeWarning::new("unparseable event", &long);
        assert_eq!(warning.excerpt.len(), WARNING_EXCERPT_CHARS);
        assert_eq!(warning.reason, "unparseable event");
    }

    #[test]
    fn test_warning_display_names_reason() {
        let warning = DecodeWarning::new("unparseable event", "data: {oops");
        let shown = warning.to_string();
        assert!(shown.contains("unparseable event"));
        assert!(shown.contains("data: {oops"));
    }
}
