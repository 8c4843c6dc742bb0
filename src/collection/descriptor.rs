//! Version-independent view of one collection entry.

use crate::models::request::HttpMethod;
use indexmap::IndexMap;

/// Normalized descriptor for a single API entry.
///
/// Produced on demand by index from a loaded collection; the same logical
/// entry yields an identical descriptor regardless of the collection's
/// schema version. Never mutated once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Human-readable entry name.
    pub name: String,

    /// HTTP method of the entry.
    pub method: HttpMethod,

    /// Unresolved URI template.
    ///
    /// May contain the configured endpoint placeholder token and `{name}`
    /// path placeholders; resolution happens later, never here.
    pub uri_template: String,

    /// Headers stored with the entry, in document order.
    ///
    /// Always empty for v1 collections, which carry no header information.
    pub headers: IndexMap<String, String>,

    /// Sample request body stored with the entry, if any.
    pub body_sample: Option<String>,

    /// Name of the folder the entry belongs to.
    pub folder_name: String,
}

impl Descriptor {
    /// Returns the URI template with the given endpoint token removed.
    ///
    /// Used for listing and URI search, where the placeholder is noise.
    pub fn display_uri(&self, endpoint_var: &str) -> String {
        self.uri_template.replace(endpoint_var, "")
    }
}
