//! HTTP request data models.
//!
//! This module defines the request specification built from a collection
//! descriptor plus runtime parameters: the method, the fully resolved URI,
//! the header mapping, and an optional JSON or multipart body.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP request method.
///
/// Only the methods that can appear in a collection entry are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    /// HTTP GET method - retrieve a resource
    GET,
    /// HTTP POST method - submit data to create a resource
    POST,
    /// HTTP PUT method - replace a resource
    PUT,
    /// HTTP PATCH method - partially modify a resource
    PATCH,
    /// HTTP DELETE method - remove a resource
    DELETE,
}

impl HttpMethod {
    /// Returns the string representation of the HTTP method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
        }
    }

    /// Parses a string into an HttpMethod.
    ///
    /// # Returns
    ///
    /// `Some(HttpMethod)` if the string is a recognized method, `None` otherwise.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "PATCH" => Some(HttpMethod::PATCH),
            "DELETE" => Some(HttpMethod::DELETE),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body variants.
///
/// A request either carries no body, a JSON document read from a body file,
/// or a single file sent as a named multipart part.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body (always the case for GET).
    None,

    /// JSON body, already parsed from the caller-supplied body file.
    Json(serde_json::Value),

    /// A file sent as a single named multipart part with content type
    /// `application/x-binary`.
    MultipartFile {
        /// Part name supplied by the caller.
        title: String,
        /// Path of the file to upload.
        path: PathBuf,
    },
}

impl RequestBody {
    /// Returns `true` when no body is attached.
    pub fn is_none(&self) -> bool {
        matches!(self, RequestBody::None)
    }
}

/// A fully resolved, dispatch-ready HTTP request.
///
/// Built per invocation by the request builder and consumed immediately by
/// the dispatcher; never reused.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: HttpMethod,

    /// Absolute target URI with every placeholder resolved.
    pub uri: String,

    /// Request headers in insertion order.
    ///
    /// Descriptor headers come first, followed by the injected auth header
    /// and any content type set during body composition.
    pub headers: IndexMap<String, String>,

    /// Optional request body.
    pub body: RequestBody,
}

impl RequestSpec {
    /// Creates a bodiless request with the given method and URI.
    pub fn new(method: HttpMethod, uri: String) -> Self {
        Self {
            method,
            uri,
            headers: IndexMap::new(),
            body: RequestBody::None,
        }
    }

    /// Sets a header, replacing any existing value under the same name.
    pub fn set_header(&mut self, name: String, value: String) {
        self.headers.insert(name, value);
    }
}
