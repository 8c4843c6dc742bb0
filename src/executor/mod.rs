//! HTTP dispatch.
//!
//! This module hands a finished [`RequestSpec`] to the blocking reqwest
//! transport. The whole tool is synchronous by design: one logical request
//! per process invocation, at most preceded by a single login exchange, so
//! there is no async runtime here.
//!
//! Server certificate verification is disabled (the tool targets lab and
//! staging endpoints with self-signed certificates); a client certificate
//! pair is attached when configured.

pub mod error;

pub use error::RequestError;

use crate::config::Config;
use crate::models::request::{HttpMethod, RequestBody, RequestSpec};
use crate::models::response::HttpResponse;
use indexmap::IndexMap;
use log::debug;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use std::fs;

/// Builds the blocking HTTP client for this run.
///
/// Applies the configured client certificate pair (PEM crt + key) when
/// present and disables server certificate verification, matching the
/// tool's lab-environment posture.
pub fn build_client(config: &Config) -> Result<Client, RequestError> {
    let mut builder = Client::builder()
        .danger_accept_invalid_certs(true)
        .use_rustls_tls();

    if let Some((crt, key)) = config.cert_pair() {
        let mut pem = fs::read(crt)
            .map_err(|e| RequestError::Certificate(format!("{}: {}", crt.display(), e)))?;
        let key_pem = fs::read(key)
            .map_err(|e| RequestError::Certificate(format!("{}: {}", key.display(), e)))?;
        pem.extend_from_slice(&key_pem);
        let identity = reqwest::Identity::from_pem(&pem)
            .map_err(|e| RequestError::Certificate(e.to_string()))?;
        builder = builder.identity(identity);
    }

    builder.build().map_err(|e| RequestError::Build(e.to_string()))
}

/// Dispatches a request specification and collects the response.
///
/// # Errors
///
/// Any transport-level failure surfaces as
/// [`RequestError::Connection`] tagged with the request's verb; the caller
/// never retries.
pub fn dispatch(client: &Client, spec: &RequestSpec) -> Result<HttpResponse, RequestError> {
    debug!("{} {}", spec.method, spec.uri);

    let method = match spec.method {
        HttpMethod::GET => reqwest::Method::GET,
        HttpMethod::POST => reqwest::Method::POST,
        HttpMethod::PUT => reqwest::Method::PUT,
        HttpMethod::PATCH => reqwest::Method::PATCH,
        HttpMethod::DELETE => reqwest::Method::DELETE,
    };

    let mut builder = client.request(method, &spec.uri);
    for (name, value) in &spec.headers {
        builder = builder.header(name, value);
    }

    builder = match &spec.body {
        RequestBody::None => builder,
        RequestBody::Json(value) => builder.json(value),
        RequestBody::MultipartFile { title, path } => {
            let part = Part::file(path)
                .map_err(|e| {
                    RequestError::Build(format!("multipart file {}: {}", path.display(), e))
                })?
                .mime_str("application/x-binary")
                .map_err(|e| RequestError::Build(e.to_string()))?;
            builder.multipart(Form::new().part(title.clone(), part))
        }
    };

    let response = builder.send().map_err(|e| RequestError::Connection {
        method: spec.method,
        message: e.to_string(),
    })?;

    collect_response(response, spec.method)
}

/// Drains a reqwest response into the tool's response model.
fn collect_response(
    response: reqwest::blocking::Response,
    method: HttpMethod,
) -> Result<HttpResponse, RequestError> {
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
        .map_err(|e| RequestError::Connection {
            method,
            message: e.to_string(),
        })?
        .to_vec();

    Ok(HttpResponse {
        status_code,
        status_text,
        headers,
        body,
    })
}
