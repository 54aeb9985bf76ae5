//! Outbound request description.
//!
//! Requests are plain data so that any [`Transport`](crate::Transport) can
//! send them and tests can inspect exactly what would have gone on the wire.

use crate::FetchError;
use serde::Serialize;
use std::collections::BTreeMap;

/// HTTP methods used against the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully assembled request, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// Absolute URL including the encoded query string.
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as UTF-8, if present.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_deref()
            .and_then(|b| std::str::from_utf8(b).ok())
    }
}

/// A builder for constructing requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: BTreeMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Add a header to the request, replacing any previous value.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add multiple headers to the request.
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, FetchError> {
        let json = serde_json::to_vec(value)?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(json);
        Ok(self)
    }

    /// Add a bearer token authorization header.
    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        self.header("Authorization", format!("Bearer {}", token.as_ref()))
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("Accept", content_type)
    }

    /// Append a directive to the `Prefer` header.
    pub fn prefer(mut self, directive: &str) -> Self {
        self.headers
            .entry("Prefer".to_string())
            .and_modify(|v| {
                v.push(',');
                v.push_str(directive);
            })
            .or_insert_with(|| directive.to_string());
        self
    }

    /// Finish the request.
    pub fn build(self) -> Request {
        Request {
            method: self.method,
            url: self.url,
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefer_directives_accumulate() {
        let request = RequestBuilder::new(Method::Post, "http://localhost/rest/v1/cart_items")
            .prefer("resolution=merge-duplicates")
            .prefer("return=representation")
            .build();
        assert_eq!(
            request.header("prefer"),
            Some("resolution=merge-duplicates,return=representation")
        );
    }

    #[test]
    fn test_json_body_sets_content_type() {
        let request = RequestBuilder::new(Method::Post, "http://localhost/rest/v1/newsletter")
            .json(&serde_json::json!({ "email": "a@b.co" }))
            .unwrap()
            .build();
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert_eq!(request.body_text(), Some(r#"{"email":"a@b.co"}"#));
    }

    #[test]
    fn test_bearer_auth() {
        let request = RequestBuilder::new(Method::Get, "http://localhost")
            .bearer_auth("secret")
            .build();
        assert_eq!(request.header("Authorization"), Some("Bearer secret"));
        assert_eq!(request.method.as_str(), "GET");
    }
}
