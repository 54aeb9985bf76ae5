//! Provider response handling.

use crate::{FetchError, ProviderError};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// A response received from the provider.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Shorthand for a JSON response with the given status.
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self::new(status, headers, body.to_string().into_bytes())
    }

    /// Attach a header, builder style.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::ParseError(format!("Invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ParseError(e.to_string()))
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Total row count from a `Content-Range` header such as `0-11/42` or `*/42`.
    ///
    /// Returns `None` when the header is missing or the total is unknown (`*`).
    pub fn total_count(&self) -> Option<u64> {
        let range = self.header("Content-Range")?;
        let (_, total) = range.rsplit_once('/')?;
        total.trim().parse().ok()
    }

    /// Convert to a Result, decoding the provider's error body for non-2xx codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }
        match serde_json::from_slice::<ProviderError>(&self.body) {
            Ok(error) => Err(FetchError::Provider {
                status: self.status,
                error,
            }),
            Err(_) => {
                let message = self.text().unwrap_or_else(|_| "Unknown error".to_string());
                Err(FetchError::HttpError {
                    status: self.status,
                    message,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, HashMap::new(), body.to_vec())
    }

    // === Status and body ===

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(204, b"").is_success());
        assert!(!make_response(300, b"").is_success());
        assert!(!make_response(406, b"").is_success());
    }

    #[test]
    fn test_response_json() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Row {
            id: String,
            stock_quantity: i64,
        }

        let resp = make_response(200, br#"[{"id": "p1", "stock_quantity": 4}]"#);
        let rows: Vec<Row> = resp.json().unwrap();
        assert_eq!(
            rows,
            vec![Row {
                id: "p1".to_string(),
                stock_quantity: 4
            }]
        );
        assert!(make_response(200, b"not json").json::<Vec<Row>>().is_err());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let resp = make_response(200, b"").with_header("content-range", "0-9/120");
        assert_eq!(resp.header("Content-Range"), Some("0-9/120"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    // === Content-Range ===

    #[test]
    fn test_total_count() {
        assert_eq!(
            make_response(200, b"").with_header("Content-Range", "0-11/42").total_count(),
            Some(42)
        );
        assert_eq!(
            make_response(200, b"").with_header("Content-Range", "*/7").total_count(),
            Some(7)
        );
        assert_eq!(
            make_response(200, b"").with_header("Content-Range", "0-11/*").total_count(),
            None
        );
        assert_eq!(make_response(200, b"").total_count(), None);
    }

    // === error_for_status ===

    #[test]
    fn test_error_for_status_decodes_provider_error() {
        let resp = make_response(
            406,
            br#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned","details":"The result contains 0 rows","hint":null}"#,
        );
        match resp.error_for_status() {
            Err(FetchError::Provider { status, error }) => {
                assert_eq!(status, 406);
                assert_eq!(error.code.as_deref(), Some("PGRST116"));
                assert_eq!(error.details.as_deref(), Some("The result contains 0 rows"));
                assert_eq!(error.hint, None);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_error_for_status_plain_body() {
        let resp = make_response(502, b"Bad Gateway");
        match resp.error_for_status() {
            Err(FetchError::HttpError { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(make_response(201, b"[]").error_for_status().is_ok());
    }
}
