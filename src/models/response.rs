//! HTTP response data models.
//!
//! This module defines the structure for a received HTTP response: status,
//! headers, and raw body bytes, with helpers for text and content-type
//! inspection used by the response formatter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A received HTTP response.
///
/// Header order is preserved as received so verbose output matches the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpResponse {
    /// HTTP status code (e.g., 200, 404).
    pub status_code: u16,

    /// HTTP status text (e.g., "OK", "Not Found").
    pub status_text: String,

    /// Response headers in received order.
    pub headers: IndexMap<String, String>,

    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns the body as UTF-8 text, replacing invalid sequences.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Returns the `Content-Type` header value, if present.
    ///
    /// Lookup is case-insensitive.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a header value by name, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_header(name: &str, value: &str) -> HttpResponse {
        let mut headers = IndexMap::new();
        headers.insert(name.to_string(), value.to_string());
        HttpResponse {
            status_code: 200,
            status_text: "OK".to_string(),
            headers,
            body: b"{}".to_vec(),
        }
    }

    #[test]
    fn test_body_text() {
        let response = response_with_header("Content-Type", "text/plain");
        assert_eq!(response.body_text(), "{}");
    }

    #[test]
    fn test_content_type_case_insensitive() {
        let response = response_with_header("content-type", "application/json");
        assert_eq!(response.content_type(), Some("application/json"));
    }

    #[test]
    fn test_header_lookup() {
        let response = response_with_header("X-Auth-Token", "t1");
        assert_eq!(response.header("x-auth-token"), Some("t1"));
        assert_eq!(response.header("X-Subject-Token"), None);
    }

    #[test]
    fn test_is_success() {
        let mut response = response_with_header("Content-Type", "text/plain");
        assert!(response.is_success());
        response.status_code = 404;
        assert!(!response.is_success());
    }
}
