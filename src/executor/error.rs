//! HTTP dispatch error types.

use crate::models::request::HttpMethod;
use std::fmt;

/// Errors that can occur while building the HTTP client or dispatching a
/// request.
///
/// Transport failures are fatal and verb-tagged so the diagnostic names the
/// call that failed; there is no retry path.
#[derive(Debug)]
pub enum RequestError {
    /// Transport-level failure (connection refused, TLS failure, DNS
    /// failure) on the main request.
    Connection {
        /// The verb of the failed call
        method: HttpMethod,
        /// Underlying transport error text
        message: String,
    },

    /// The HTTP client could not be constructed.
    Build(String),

    /// The configured client certificate or key could not be loaded.
    Certificate(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Connection { method, message } => {
                write!(f, "Calling {} error: {}", method, message)
            }
            RequestError::Build(msg) => write!(f, "Failed to build HTTP client: {}", msg),
            RequestError::Certificate(msg) => {
                write!(f, "Failed to load client certificate: {}", msg)
            }
        }
    }
}

impl std::error::Error for RequestError {}
