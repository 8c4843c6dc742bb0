//! Command layer.
//!
//! Wires the collection, variable resolver, auth resolver, request builder,
//! and dispatcher into the user-facing operations: listing, searching,
//! exporting body samples, and running a request end to end. Every error
//! propagates up as a [`CommandError`]; nothing here terminates the
//! process — exit codes are the binary's concern.

use crate::auth::{self, AuthError};
use crate::collection::{Collection, CollectionError, Descriptor};
use crate::config::{Config, ConfigError};
use crate::executor::{self, RequestError};
use crate::formatter::{curl_preview, render_request_body, render_response};
use crate::models::request::{HttpMethod, RequestBody, RequestSpec};
use crate::request::{build_request, BuildError};
use crate::variables::{resolve_uri, VarError};
use log::info;
use regex::RegexBuilder;
use std::fmt;
use std::path::Path;

/// Errors surfaced by the command layer.
///
/// Mostly a carrier for the per-component errors; the two local variants
/// cover bad user input and empty search results.
#[derive(Debug)]
pub enum CommandError {
    /// Collection loading or descriptor production failed.
    Collection(CollectionError),

    /// Configuration loading failed.
    Config(ConfigError),

    /// URI resolution failed.
    Var(VarError),

    /// Token resolution failed.
    Auth(AuthError),

    /// Request composition failed.
    Build(BuildError),

    /// Dispatch failed.
    Request(RequestError),

    /// A user-supplied argument is unusable (bad index, bad regex, missing
    /// search key).
    BadArgument(String),

    /// A name search matched nothing.
    NotFound(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Collection(e) => write!(f, "{}", e),
            CommandError::Config(e) => write!(f, "{}", e),
            CommandError::Var(e) => write!(f, "{}", e),
            CommandError::Auth(e) => write!(f, "{}", e),
            CommandError::Build(e) => write!(f, "{}", e),
            CommandError::Request(e) => write!(f, "{}", e),
            CommandError::BadArgument(msg) => write!(f, "{}", msg),
            CommandError::NotFound(key) => write!(f, "API is not found! keyword: {}", key),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<CollectionError> for CommandError {
    fn from(e: CollectionError) -> Self {
        CommandError::Collection(e)
    }
}

impl From<ConfigError> for CommandError {
    fn from(e: ConfigError) -> Self {
        CommandError::Config(e)
    }
}

impl From<VarError> for CommandError {
    fn from(e: VarError) -> Self {
        CommandError::Var(e)
    }
}

impl From<AuthError> for CommandError {
    fn from(e: AuthError) -> Self {
        CommandError::Auth(e)
    }
}

impl From<BuildError> for CommandError {
    fn from(e: BuildError) -> Self {
        CommandError::Build(e)
    }
}

impl From<RequestError> for CommandError {
    fn from(e: RequestError) -> Self {
        CommandError::Request(e)
    }
}

/// Formats one listing line:
/// `"<index>. [<folder>] <name>: <method> <uri>"` with the endpoint token
/// stripped from the URI.
pub fn format_api_line(index: usize, api: &Descriptor, endpoint_var: &str) -> String {
    format!(
        "{:>4}. [{}] {}: {} {}",
        index,
        api.folder_name,
        api.name,
        api.method,
        api.display_uri(endpoint_var)
    )
}

fn search_regex(key: &str) -> Result<regex::Regex, CommandError> {
    RegexBuilder::new(key)
        .case_insensitive(true)
        .build()
        .map_err(|e| CommandError::BadArgument(format!("Invalid search pattern '{}': {}", key, e)))
}

/// Lists every API in the collection, one line per descriptor.
pub fn list_apis(collection: &Collection, config: &Config) -> Result<Vec<String>, CommandError> {
    let mut lines = Vec::with_capacity(collection.count_apis());
    for (index, api) in collection.descriptors().enumerate() {
        lines.push(format_api_line(index, &api?, &config.end_point_var));
    }
    Ok(lines)
}

/// Lists the APIs whose name matches `key` (case-insensitive regex).
pub fn find_by_name(
    collection: &Collection,
    config: &Config,
    key: &str,
) -> Result<Vec<String>, CommandError> {
    let re = search_regex(key)?;
    let mut lines = Vec::new();
    for (index, api) in collection.descriptors().enumerate() {
        let api = api?;
        if re.is_match(&api.name) {
            lines.push(format_api_line(index, &api, &config.end_point_var));
        }
    }
    Ok(lines)
}

/// Returns the index of the first API whose name matches `key`.
pub fn find_index_by_name(
    collection: &Collection,
    key: &str,
) -> Result<Option<usize>, CommandError> {
    let re = search_regex(key)?;
    for (index, api) in collection.descriptors().enumerate() {
        if re.is_match(&api?.name) {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Lists the APIs whose URI (endpoint token stripped) matches `key`.
pub fn find_by_uri(
    collection: &Collection,
    config: &Config,
    key: &str,
) -> Result<Vec<String>, CommandError> {
    let re = search_regex(key)?;
    let mut lines = Vec::new();
    for (index, api) in collection.descriptors().enumerate() {
        let api = api?;
        if re.is_match(&api.display_uri(&config.end_point_var)) {
            lines.push(format_api_line(index, &api, &config.end_point_var));
        }
    }
    Ok(lines)
}

/// Lists the APIs matching `key` against URI, name, body sample, or folder.
pub fn find_by_all(
    collection: &Collection,
    config: &Config,
    key: &str,
) -> Result<Vec<String>, CommandError> {
    let re = search_regex(key)?;
    let mut lines = Vec::new();
    for (index, api) in collection.descriptors().enumerate() {
        let api = api?;
        let matched = re.is_match(&api.display_uri(&config.end_point_var))
            || re.is_match(&api.name)
            || api.body_sample.as_deref().map_or(false, |s| re.is_match(s))
            || re.is_match(&api.folder_name);
        if matched {
            lines.push(format_api_line(index, &api, &config.end_point_var));
        }
    }
    Ok(lines)
}

/// Returns the body sample stored with the descriptor at `index`.
pub fn export_sample(collection: &Collection, index: i64) -> Result<String, CommandError> {
    let api = collection.get_api(index)?;
    Ok(api.body_sample.unwrap_or_default())
}

/// Runs the request at `parameters[0]` end to end.
///
/// The remaining parameters fill path placeholders, may append a query
/// string, and may name a body file; `multipart` switches the body file to
/// a named multipart part. Output goes to stdout; verbose mode adds the
/// curl preview and the request headers.
pub fn run_request(
    collection: &Collection,
    config: &Config,
    parameters: &[String],
    multipart: Option<&str>,
    verbose: bool,
) -> Result<(), CommandError> {
    let index: i64 = parameters
        .first()
        .ok_or_else(|| CommandError::BadArgument("No API index given".to_string()))?
        .parse()
        .map_err(|_| {
            CommandError::BadArgument(format!("Not an API index: '{}'", parameters[0]))
        })?;

    let api = collection.get_api(index)?;
    let resolved = resolve_uri(&api.uri_template, config, &parameters[1..])?;

    // Whatever steps 4-5 of resolution left over names the body file.
    let leftover = &parameters[1 + resolved.consumed..];
    let body_file = leftover.first().map(Path::new);

    let client = executor::build_client(config)?;
    let token = auth::resolve_token(config, &resolved.uri, &client)?;

    let mut headers = api.headers.clone();
    if let Some(token) = &token {
        headers.insert(auth::auth_header_name(config).to_string(), token.clone());
    }

    if verbose {
        println!(
            "{}",
            curl_preview(
                api.method.as_str(),
                &resolved.uri,
                auth::auth_header_name(config),
                token.as_deref(),
            )
        );
        println!("Request Headers:");
        for (name, value) in &headers {
            println!("{}: {}", name, value);
        }
    }

    let spec = build_request(api.method, resolved.uri, headers, body_file, multipart)?;

    if spec.method == HttpMethod::POST {
        if let RequestBody::Json(body) = &spec.body {
            println!("{}", render_request_body(body));
        }
    }

    info!("{} {}", spec.method, spec.uri);
    let response = executor::dispatch(&client, &spec)?;
    print!("{}", render_response(&response, verbose));
    println!();
    Ok(())
}

/// Finds the first API whose name matches `key` and runs it.
///
/// The remaining parameters are passed through to [`run_request`].
pub fn run_request_by_name(
    collection: &Collection,
    config: &Config,
    key: &str,
    parameters: &[String],
    multipart: Option<&str>,
    verbose: bool,
) -> Result<(), CommandError> {
    let index = find_index_by_name(collection, key)?
        .ok_or_else(|| CommandError::NotFound(key.to_string()))?;

    let mut with_index = vec![index.to_string()];
    with_index.extend_from_slice(parameters);
    run_request(collection, config, &with_index, multipart, verbose)
}

/// Requests the endpoint root (`GET end_point + "/"`) with no headers.
pub fn request_root(config: &Config, verbose: bool) -> Result<(), CommandError> {
    let uri = format!("{}/", config.end_point);
    println!("GET {}", uri);

    let client = executor::build_client(config)?;
    let spec = RequestSpec::new(HttpMethod::GET, uri);
    let response = executor::dispatch(&client, &spec)?;
    print!("{}", render_response(&response, verbose));
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const V2_DOC: &str = r#"{
        "item": [
            {"name": "Images", "item": [
                {"name": "List images", "request": {
                    "method": "GET", "url": "{{BASE}}/v2/images", "header": []
                }},
                {"name": "Upload image file", "request": {
                    "method": "PUT", "url": "{{BASE}}/v2/images/{image_id}/file", "header": []
                }}
            ]},
            {"name": "Servers", "item": [
                {"name": "Create server", "request": {
                    "method": "POST", "url": "{{BASE}}/v2/servers", "header": [],
                    "body": {"raw": "{\"server\": {}}"}
                }}
            ]}
        ]
    }"#;

    fn fixture() -> (Collection, Config) {
        let collection = Collection::parse(V2_DOC).unwrap();
        let config = Config::parse(
            "postman_file: api.json\nend_point: http://x\nend_point_var: \"{{BASE}}\"",
        )
        .unwrap();
        (collection, config)
    }

    #[test]
    fn test_format_api_line() {
        let (collection, config) = fixture();
        let api = collection.get_api(0).unwrap();
        assert_eq!(
            format_api_line(0, &api, &config.end_point_var),
            "   0. [Images] List images: GET /v2/images"
        );
    }

    #[test]
    fn test_list_apis() {
        let (collection, config) = fixture();
        let lines = list_apis(&collection, &config).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("[Servers] Create server: POST /v2/servers"));
    }

    #[test]
    fn test_find_by_name_case_insensitive() {
        let (collection, config) = fixture();
        let lines = find_by_name(&collection, &config, "IMAGE").unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_find_index_by_name_first_match() {
        let (collection, _) = fixture();
        assert_eq!(find_index_by_name(&collection, "image").unwrap(), Some(0));
        assert_eq!(find_index_by_name(&collection, "nothing").unwrap(), None);
    }

    #[test]
    fn test_find_by_uri() {
        let (collection, config) = fixture();
        let lines = find_by_uri(&collection, &config, "^/v2/servers").unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Create server"));
    }

    #[test]
    fn test_find_by_all_matches_body_sample() {
        let (collection, config) = fixture();
        let lines = find_by_all(&collection, &config, r#""server""#).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Create server"));
    }

    #[test]
    fn test_invalid_search_pattern() {
        let (collection, config) = fixture();
        assert!(matches!(
            find_by_name(&collection, &config, "[unclosed"),
            Err(CommandError::BadArgument(_))
        ));
    }

    #[test]
    fn test_export_sample() {
        let (collection, _) = fixture();
        assert_eq!(export_sample(&collection, 2).unwrap(), "{\"server\": {}}");
        // No sample stored: exports empty
        assert_eq!(export_sample(&collection, 0).unwrap(), "");
        assert!(matches!(
            export_sample(&collection, 9),
            Err(CommandError::Collection(
                CollectionError::IndexOutOfRange { .. }
            ))
        ));
    }

    #[test]
    fn test_run_request_rejects_bad_index() {
        let (collection, config) = fixture();
        let err = run_request(
            &collection,
            &config,
            &["seven".to_string()],
            None,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::BadArgument(_)));
    }

    #[test]
    fn test_run_request_by_name_not_found() {
        let (collection, config) = fixture();
        let err = run_request_by_name(&collection, &config, "nothing", &[], None, false)
            .unwrap_err();
        assert!(matches!(err, CommandError::NotFound(_)));
    }
}
