//! URI template resolution.
//!
//! This module rewrites a descriptor's URI template into a final, absolute
//! URI. Resolution happens in a fixed, caller-visible order:
//!
//! 1. Every occurrence of the configured endpoint placeholder token is
//!    replaced with the live endpoint.
//! 2. Any query suffix already present in the template is stripped.
//! 3. The configured path-variable rules are applied in list order, each
//!    pattern replaced once.
//! 4. Remaining `{...}` placeholders are filled left to right from the
//!    caller's positional parameters, one placeholder per parameter,
//!    verbatim. Leftover placeholders stay literal when parameters run out.
//! 5. A single final unconsumed parameter containing `=` is appended as a
//!    raw query string.
//!
//! Parameters not consumed here are the caller's body-file argument.

use crate::config::Config;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::fmt;

/// Cached pattern matching one `{name}` path placeholder.
///
/// `/` is excluded so a single placeholder never swallows multiple path
/// segments.
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^/]*\}").expect("Failed to compile placeholder regex"));

/// Errors that can occur during URI resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarError {
    /// A configured path-variable pattern is not a valid regular expression.
    InvalidPattern {
        /// The offending pattern text
        pattern: String,
        /// Compilation error detail
        detail: String,
    },
}

impl fmt::Display for VarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarError::InvalidPattern { pattern, detail } => {
                write!(f, "Invalid path_vars pattern '{}': {}", pattern, detail)
            }
        }
    }
}

impl std::error::Error for VarError {}

/// Result of URI resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUri {
    /// The final URI.
    pub uri: String,

    /// How many positional parameters were consumed by placeholder filling
    /// and query-string appending.
    pub consumed: usize,
}

/// Resolves a URI template against the configuration and the caller's
/// positional parameters.
///
/// # Arguments
///
/// * `template` - The descriptor's URI template
/// * `config` - Run configuration (endpoint, endpoint token, path rules)
/// * `params` - Ordered caller-supplied positional parameters
///
/// # Errors
///
/// Returns [`VarError::InvalidPattern`] when a configured path-variable
/// pattern fails to compile.
///
/// # Examples
///
/// ```
/// use rtr::config::Config;
/// use rtr::variables::resolve_uri;
///
/// let config = Config::parse(
///     "postman_file: api.json\nend_point: http://x\nend_point_var: \"{{BASE}}\"",
/// )
/// .unwrap();
/// let resolved = resolve_uri("{{BASE}}/v2/images", &config, &[]).unwrap();
/// assert_eq!(resolved.uri, "http://x/v2/images");
/// ```
pub fn resolve_uri(
    template: &str,
    config: &Config,
    params: &[String],
) -> Result<ResolvedUri, VarError> {
    // 1. Endpoint substitution, every occurrence.
    let mut uri = template.replace(&config.end_point_var, &config.end_point);

    // 2. Discard any query suffix baked into the template.
    if let Some(pos) = uri.find('?') {
        uri.truncate(pos);
    }

    // 3. Configured path-variable rules, in list order, one replacement each.
    for (pattern, replacement) in &config.path_vars {
        let re = Regex::new(pattern).map_err(|e| VarError::InvalidPattern {
            pattern: pattern.clone(),
            detail: e.to_string(),
        })?;
        uri = re.replace(&uri, replacement.as_str()).into_owned();
    }

    // 4. Leftmost placeholder gets the next unconsumed parameter, verbatim.
    let mut consumed = 0;
    while consumed < params.len() && PLACEHOLDER_REGEX.is_match(&uri) {
        uri = PLACEHOLDER_REGEX
            .replace(&uri, NoExpand(params[consumed].as_str()))
            .into_owned();
        consumed += 1;
    }

    // 5. Exactly one parameter left and it looks like a query string.
    if params.len() - consumed == 1 && params[consumed].contains('=') {
        uri.push('?');
        uri.push_str(&params[consumed]);
        consumed += 1;
    }

    Ok(ResolvedUri { uri, consumed })
}
