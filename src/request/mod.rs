//! Request composition.
//!
//! Turns a method, a resolved URI, resolved headers, and the caller's
//! leftover body-file parameter into a dispatch-ready [`RequestSpec`].
//! Body and content-type handling is method-specific:
//!
//! - **GET**: never a body; a leftover parameter is ignored.
//! - **POST/PUT**: the body file is parsed as JSON and sent with
//!   `Content-Type: application/json`; with a caller-supplied multipart
//!   title the file is sent as a named part instead and no JSON content
//!   type is set.
//! - **PATCH/DELETE**: the body file is parsed as JSON and the content type
//!   is inferred from the file extension (`.json`, `.xml`, else unset).
//!   PATCH also supports the multipart form.

use crate::models::request::{HttpMethod, RequestBody, RequestSpec};
use indexmap::IndexMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Errors that can occur while composing a request body.
#[derive(Debug)]
pub enum BuildError {
    /// The body file could not be read.
    BodyFile(String),

    /// The body file is not valid JSON.
    BodyJson(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::BodyFile(msg) => write!(f, "Failed to read body file: {}", msg),
            BuildError::BodyJson(msg) => write!(f, "Body file is not valid JSON: {}", msg),
        }
    }
}

impl std::error::Error for BuildError {}

/// Composes a dispatch-ready request.
///
/// # Arguments
///
/// * `method` - HTTP method of the descriptor
/// * `uri` - Fully resolved target URI
/// * `headers` - Descriptor headers with the auth header already injected
/// * `body_file` - Leftover positional parameter naming a body file, if any
/// * `multipart_title` - Caller-supplied part name; switches POST/PUT/PATCH
///   bodies to multipart
pub fn build_request(
    method: HttpMethod,
    uri: String,
    headers: IndexMap<String, String>,
    body_file: Option<&Path>,
    multipart_title: Option<&str>,
) -> Result<RequestSpec, BuildError> {
    let mut spec = RequestSpec {
        method,
        uri,
        headers,
        body: RequestBody::None,
    };

    let body_file = match (method, body_file) {
        // GET ignores any extra parameter.
        (HttpMethod::GET, _) | (_, None) => return Ok(spec),
        (_, Some(path)) => path,
    };

    match (method, multipart_title) {
        (HttpMethod::POST | HttpMethod::PUT | HttpMethod::PATCH, Some(title)) => {
            // The transport sets the multipart boundary; no JSON content type.
            spec.body = RequestBody::MultipartFile {
                title: title.to_string(),
                path: body_file.to_path_buf(),
            };
        }
        (HttpMethod::POST | HttpMethod::PUT, None) => {
            spec.body = RequestBody::Json(read_json_body(body_file)?);
            spec.set_header(
                "Content-Type".to_string(),
                "application/json".to_string(),
            );
        }
        (HttpMethod::PATCH, None) => {
            spec.body = RequestBody::Json(read_json_body(body_file)?);
            if has_extension(body_file, "json") {
                spec.set_header(
                    "Content-Type".to_string(),
                    "application/json-patch+json".to_string(),
                );
            } else if has_extension(body_file, "xml") {
                spec.set_header("Content-Type".to_string(), "application/xml".to_string());
            }
        }
        (HttpMethod::DELETE, _) => {
            spec.body = RequestBody::Json(read_json_body(body_file)?);
            if has_extension(body_file, "json") {
                spec.set_header("Content-Type".to_string(), "application/json".to_string());
            } else if has_extension(body_file, "xml") {
                spec.set_header("Content-Type".to_string(), "application/xml".to_string());
            }
        }
        (HttpMethod::GET, _) => unreachable!("GET returned above"),
    }

    Ok(spec)
}

fn read_json_body(path: &Path) -> Result<serde_json::Value, BuildError> {
    let text = fs::read_to_string(path)
        .map_err(|e| BuildError::BodyFile(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| BuildError::BodyJson(format!("{}: {}", path.display(), e)))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn json_body_file(suffix: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, r#"{{"server": {{"name": "vm-1"}}}}"#).unwrap();
        file
    }

    fn content_type(spec: &RequestSpec) -> Option<&str> {
        spec.headers.get("Content-Type").map(String::as_str)
    }

    #[test]
    fn test_get_never_has_a_body() {
        let file = json_body_file(".json");
        let spec = build_request(
            HttpMethod::GET,
            "http://x/v2/images".to_string(),
            IndexMap::new(),
            Some(file.path()),
            None,
        )
        .unwrap();
        assert!(spec.body.is_none());
        assert_eq!(content_type(&spec), None);
    }

    #[test]
    fn test_post_json_body() {
        let file = json_body_file(".json");
        let spec = build_request(
            HttpMethod::POST,
            "http://x/v2/servers".to_string(),
            IndexMap::new(),
            Some(file.path()),
            None,
        )
        .unwrap();
        assert_eq!(content_type(&spec), Some("application/json"));
        match &spec.body {
            RequestBody::Json(value) => assert_eq!(value["server"]["name"], "vm-1"),
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[test]
    fn test_post_without_body_file() {
        let spec = build_request(
            HttpMethod::POST,
            "http://x/v2/servers".to_string(),
            IndexMap::new(),
            None,
            None,
        )
        .unwrap();
        assert!(spec.body.is_none());
        assert_eq!(content_type(&spec), None);
    }

    #[test]
    fn test_multipart_skips_json_content_type() {
        let file = json_body_file(".bin");
        let spec = build_request(
            HttpMethod::PUT,
            "http://x/v2/images/7/file".to_string(),
            IndexMap::new(),
            Some(file.path()),
            Some("image"),
        )
        .unwrap();
        assert_eq!(content_type(&spec), None);
        match &spec.body {
            RequestBody::MultipartFile { title, path } => {
                assert_eq!(title, "image");
                assert_eq!(path, file.path());
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[test]
    fn test_patch_content_type_inference() {
        let file = json_body_file(".json");
        let spec = build_request(
            HttpMethod::PATCH,
            "http://x/v2/servers/7".to_string(),
            IndexMap::new(),
            Some(file.path()),
            None,
        )
        .unwrap();
        assert_eq!(content_type(&spec), Some("application/json-patch+json"));
    }

    #[test]
    fn test_delete_content_type_inference() {
        let file = json_body_file(".json");
        let spec = build_request(
            HttpMethod::DELETE,
            "http://x/v2/servers/7".to_string(),
            IndexMap::new(),
            Some(file.path()),
            None,
        )
        .unwrap();
        assert_eq!(content_type(&spec), Some("application/json"));
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        let file = json_body_file(".JSON");
        let spec = build_request(
            HttpMethod::PATCH,
            "http://x/v2/servers/7".to_string(),
            IndexMap::new(),
            Some(file.path()),
            None,
        )
        .unwrap();
        assert_eq!(content_type(&spec), Some("application/json-patch+json"));
    }

    #[test]
    fn test_unknown_extension_leaves_content_type_unset() {
        let file = json_body_file(".body");
        let spec = build_request(
            HttpMethod::DELETE,
            "http://x/v2/servers/7".to_string(),
            IndexMap::new(),
            Some(file.path()),
            None,
        )
        .unwrap();
        assert_eq!(content_type(&spec), None);
        assert!(matches!(spec.body, RequestBody::Json(_)));
    }

    #[test]
    fn test_descriptor_headers_survive_composition() {
        let file = json_body_file(".json");
        let mut headers = IndexMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("X-Auth-Token".to_string(), "t1".to_string());

        let spec = build_request(
            HttpMethod::POST,
            "http://x/v2/servers".to_string(),
            headers,
            Some(file.path()),
            None,
        )
        .unwrap();
        let names: Vec<&String> = spec.headers.keys().collect();
        assert_eq!(names, vec!["Accept", "X-Auth-Token", "Content-Type"]);
    }

    #[test]
    fn test_body_file_errors() {
        let err = build_request(
            HttpMethod::POST,
            "http://x".to_string(),
            IndexMap::new(),
            Some(Path::new("/nonexistent/body.json")),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::BodyFile(_)));

        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "not json").unwrap();
        let err = build_request(
            HttpMethod::POST,
            "http://x".to_string(),
            IndexMap::new(),
            Some(file.path()),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::BodyJson(_)));
    }
}
