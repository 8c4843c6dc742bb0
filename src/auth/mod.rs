//! Authentication token resolution.
//!
//! Obtains the token attached to outgoing requests. Policy, in order:
//!
//! 1. A statically configured token is used verbatim, no network call.
//! 2. No login endpoint is configured, or the target URI *is* the login
//!    call itself: no token.
//! 3. Otherwise exactly one login exchange is performed: the configured
//!    body file is POSTed as JSON to `end_point + auth_uri`, and the token
//!    is read from the response headers by a fixed fallback chain:
//!    the configured token title, then `X-Auth-Token`, then
//!    `X-Subject-Token`.
//!
//! Whichever header supplied the token, it is always attached under the
//! configured token title on the outgoing request.

use crate::config::Config;
use crate::formatter::render_response;
use crate::models::response::HttpResponse;
use indexmap::IndexMap;
use log::debug;
use reqwest::blocking::Client;
use std::fmt;
use std::fs;

/// Errors that can occur during token resolution.
#[derive(Debug)]
pub enum AuthError {
    /// Transport-level failure on the login exchange. Fatal, no retry.
    Connection(String),

    /// The login exchange completed but no recognized token header was
    /// present. Carries the rendered response for diagnosis.
    TokenMissing {
        /// Fully rendered login response (status, headers, body)
        response_dump: String,
    },

    /// The configured login body file could not be read or is not JSON.
    BodyFile(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Connection(msg) => write!(f, "Authentication error: {}", msg),
            AuthError::TokenMissing { response_dump } => {
                write!(f, "Authentication failed.\n{}", response_dump)
            }
            AuthError::BodyFile(msg) => write!(f, "Authentication body file error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Returns the header name the auth token is attached under.
pub fn auth_header_name(config: &Config) -> &str {
    &config.auth_token_title
}

/// Extracts a token from login-response headers.
///
/// Checks, in order: the configured token title, `X-Auth-Token`,
/// `X-Subject-Token`. Returns the first match.
pub fn extract_token(response: &HttpResponse, token_title: &str) -> Option<String> {
    for name in [token_title, "X-Auth-Token", "X-Subject-Token"] {
        if let Some(value) = response.header(name) {
            return Some(value.to_string());
        }
    }
    None
}

/// Resolves the token for a request targeting `uri`.
///
/// # Returns
///
/// `Ok(Some(token))` when a token should be attached, `Ok(None)` when the
/// request needs no token (no auth configured, or `uri` is the login call).
///
/// # Errors
///
/// [`AuthError::Connection`] on login transport failure,
/// [`AuthError::TokenMissing`] when the login response carries no
/// recognized token header, [`AuthError::BodyFile`] when the login body
/// file is unreadable or not JSON.
pub fn resolve_token(
    config: &Config,
    uri: &str,
    client: &Client,
) -> Result<Option<String>, AuthError> {
    // 1. Static token short-circuits everything.
    if let Some(token) = &config.auth_token_value {
        return Ok(Some(token.clone()));
    }

    let (auth_uri, body_file) = match (&config.auth_uri, &config.auth_body_file) {
        (Some(auth_uri), Some(body_file)) => (auth_uri, body_file),
        // 2a. Login not configured.
        _ => return Ok(None),
    };

    // 2b. The login call itself never carries a token.
    let login_uri = format!("{}{}", config.end_point, auth_uri);
    if uri.starts_with(&login_uri) {
        return Ok(None);
    }

    // 3. One login exchange.
    let body_text = fs::read_to_string(body_file)
        .map_err(|e| AuthError::BodyFile(format!("{}: {}", body_file.display(), e)))?;
    let body: serde_json::Value = serde_json::from_str(&body_text)
        .map_err(|e| AuthError::BodyFile(format!("{}: {}", body_file.display(), e)))?;

    debug!("POST {} (login exchange)", login_uri);
    let response = client
        .post(&login_uri)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .map_err(|e| AuthError::Connection(e.to_string()))?;

    let response = login_response(response)?;
    match extract_token(&response, &config.auth_token_title) {
        Some(token) => Ok(Some(token)),
        None => Err(AuthError::TokenMissing {
            response_dump: render_response(&response, true),
        }),
    }
}

/// Drains the raw login response into the tool's response model.
fn login_response(response: reqwest::blocking::Response) -> Result<HttpResponse, AuthError> {
    let status_code = response.status().as_u16();
    let status_text = response
        .status()
        .canonical_reason()
        .unwrap_or("Unknown")
        .to_string();

    let mut headers = IndexMap::new();
    for (name, value) in response.headers() {
        if let Ok(value_str) = value.to_str() {
            headers.insert(name.as_str().to_string(), value_str.to_string());
        }
    }

    let body = response
        .bytes()
        .map_err(|e| AuthError::Connection(e.to_string()))?
        .to_vec();

    Ok(HttpResponse {
        status_code,
        status_text,
        headers,
        body,
    })
}
