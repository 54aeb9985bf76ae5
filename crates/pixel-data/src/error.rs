//! Provider client error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error code the provider returns when a single-object request matched no rows.
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Errors that can occur when talking to the provider.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response without a provider error body.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Error reported by the provider, kept exactly as it was sent.
    #[error("Provider error (HTTP {status}): {error}")]
    Provider { status: u16, error: ProviderError },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timed out.
    #[error("Request timed out")]
    Timeout,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl FetchError {
    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpError { status, .. } | FetchError::Provider { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Whether the provider reported that the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            FetchError::Provider { error, .. } => error.code.as_deref() == Some(NO_ROWS_CODE),
            FetchError::HttpError { status, .. } => *status == 404,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

/// Error body returned by the provider's REST layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderError {
    /// Provider error code (e.g. a Postgres SQLSTATE or `PGRST116`).
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// Extra detail.
    #[serde(default)]
    pub details: Option<String>,
    /// Suggested fix.
    #[serde(default)]
    pub hint: Option<String>,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{}] {}", code, self.message)?,
            None => write!(f, "{}", self.message)?,
        }
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = FetchError::Provider {
            status: 406,
            error: ProviderError {
                code: Some(NO_ROWS_CODE.to_string()),
                message: "JSON object requested, multiple (or no) rows returned".to_string(),
                details: None,
                hint: None,
            },
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(406));

        let err = FetchError::Provider {
            status: 409,
            error: ProviderError {
                code: Some("23505".to_string()),
                message: "duplicate key value violates unique constraint".to_string(),
                ..Default::default()
            },
        };
        assert!(!err.is_not_found());
        assert!(!FetchError::Timeout.is_not_found());
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError {
            code: Some("23505".to_string()),
            message: "duplicate key".to_string(),
            details: Some("Key (email)=(a@b.c) already exists.".to_string()),
            hint: None,
        };
        assert_eq!(
            err.to_string(),
            "[23505] duplicate key (Key (email)=(a@b.c) already exists.)"
        );
    }
}
