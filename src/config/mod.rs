//! Run configuration.
//!
//! Configuration is loaded once per run from a YAML file and passed
//! explicitly, by reference, to every operation that needs it. There is no
//! global configuration state; the value is immutable after load.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Read(String),

    /// The configuration file is not valid YAML or has the wrong shape.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(msg) => write!(f, "Failed to read configuration: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Failed to parse configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

fn default_auth_token_title() -> String {
    "X-Auth-Token".to_string()
}

/// Run configuration, mirroring the recognized config-file keys.
///
/// `path_vars` is an explicitly ordered list of (pattern, replacement)
/// pairs; substitution order is observable when patterns overlap, so an
/// unordered mapping would not do.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the exported collection document.
    pub postman_file: PathBuf,

    /// Live base URL substituted for the endpoint placeholder token.
    pub end_point: String,

    /// Endpoint placeholder token as it appears in URI templates,
    /// e.g. `{{BASE}}`.
    pub end_point_var: String,

    /// Ordered (pattern, replacement) rewrite rules applied to the URI.
    /// Patterns are regular expressions, each applied once, in list order.
    #[serde(default)]
    pub path_vars: Vec<(String, String)>,

    /// Login endpoint path, relative to `end_point`. When unset, no login
    /// exchange is ever attempted.
    #[serde(default)]
    pub auth_uri: Option<String>,

    /// Header name the auth token is attached under, and the first header
    /// checked when extracting a token from the login response.
    #[serde(default = "default_auth_token_title")]
    pub auth_token_title: String,

    /// Static auth token. When set, it is used verbatim and no login
    /// exchange happens.
    #[serde(default)]
    pub auth_token_value: Option<String>,

    /// File whose contents are sent as the JSON login body.
    #[serde(default)]
    pub auth_body_file: Option<PathBuf>,

    /// Client certificate file (PEM) for mutual TLS.
    #[serde(default)]
    pub crt_file: Option<PathBuf>,

    /// Client private key file (PEM) for mutual TLS.
    #[serde(default)]
    pub key_file: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;
        Self::parse(&text)
    }

    /// Parses configuration from YAML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Returns the client certificate pair when both files are configured.
    pub fn cert_pair(&self) -> Option<(&Path, &Path)> {
        match (&self.crt_file, &self.key_file) {
            (Some(crt), Some(key)) => Some((crt.as_path(), key.as_path())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
postman_file: cloud.postman_collection.json
end_point: http://controller:8774
end_point_var: "{{BASE}}"
path_vars:
  - ["\\{tenant_id\\}", "demo"]
  - ["\\{region\\}", "kr-1"]
auth_uri: /v3/auth/tokens
auth_token_title: X-Subject-Token
auth_body_file: auth.json
crt_file: client.crt
key_file: client.key
"#;

    const MINIMAL_CONFIG: &str = r#"
postman_file: api.json
end_point: http://localhost
end_point_var: "{{BASE}}"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(FULL_CONFIG).unwrap();
        assert_eq!(config.end_point, "http://controller:8774");
        assert_eq!(config.end_point_var, "{{BASE}}");
        assert_eq!(config.path_vars.len(), 2);
        assert_eq!(config.path_vars[0].1, "demo");
        assert_eq!(config.auth_uri.as_deref(), Some("/v3/auth/tokens"));
        assert_eq!(config.auth_token_title, "X-Subject-Token");
        assert!(config.cert_pair().is_some());
    }

    #[test]
    fn test_parse_minimal_config_defaults() {
        let config = Config::parse(MINIMAL_CONFIG).unwrap();
        assert!(config.path_vars.is_empty());
        assert!(config.auth_uri.is_none());
        assert_eq!(config.auth_token_title, "X-Auth-Token");
        assert!(config.auth_token_value.is_none());
        assert!(config.cert_pair().is_none());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Config::parse(": not yaml : ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_cert_pair_requires_both_files() {
        let mut config = Config::parse(FULL_CONFIG).unwrap();
        config.key_file = None;
        assert!(config.cert_pair().is_none());
    }
}
