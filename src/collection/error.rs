//! Error types for collection loading and normalization.

use std::fmt;

/// Errors that can occur while loading a collection document or producing
/// descriptors from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// The document matches neither the v1 shape (top-level `requests`
    /// array) nor the v2/2.1 shape (top-level `item` array).
    SchemaMismatch {
        /// Detail about what was found instead
        detail: String,
    },

    /// A descriptor index outside `[0, count_apis())` was requested.
    IndexOutOfRange {
        /// The requested index
        index: i64,
        /// Number of descriptors in the collection
        count: usize,
    },

    /// A v1 entry references a folder id with no match in the collection's
    /// folder table.
    UnresolvedReference {
        /// The dangling folder id
        folder_id: String,
        /// Name of the entry holding the reference
        entry: String,
    },

    /// An entry carries an HTTP method this tool does not dispatch.
    UnsupportedMethod {
        /// The method string found in the document
        method: String,
        /// Name of the offending entry
        entry: String,
    },

    /// The collection file could not be read.
    Read(String),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::SchemaMismatch { detail } => {
                write!(
                    f,
                    "Unrecognized collection schema: {}. Expected a v1 'requests' array or a v2/2.1 'item' array",
                    detail
                )
            }
            CollectionError::IndexOutOfRange { index, count } => {
                write!(
                    f,
                    "The index is not found! index: {} (collection holds {} APIs)",
                    index, count
                )
            }
            CollectionError::UnresolvedReference { folder_id, entry } => {
                write!(
                    f,
                    "Entry '{}' references unknown folder id '{}'",
                    entry, folder_id
                )
            }
            CollectionError::UnsupportedMethod { method, entry } => {
                write!(
                    f,
                    "Entry '{}' uses unsupported HTTP method '{}'. Expected one of: GET, POST, PUT, PATCH, DELETE",
                    entry, method
                )
            }
            CollectionError::Read(msg) => write!(f, "Failed to read collection file: {}", msg),
        }
    }
}

impl std::error::Error for CollectionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_display() {
        let err = CollectionError::IndexOutOfRange { index: 9, count: 3 };
        let msg = format!("{}", err);
        assert!(msg.contains("index: 9"));
        assert!(msg.contains("3 APIs"));
    }

    #[test]
    fn test_unresolved_reference_display() {
        let err = CollectionError::UnresolvedReference {
            folder_id: "f-404".to_string(),
            entry: "List images".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("f-404"));
        assert!(msg.contains("List images"));
    }

    #[test]
    fn test_schema_mismatch_display() {
        let err = CollectionError::SchemaMismatch {
            detail: "no marker field".to_string(),
        };
        assert!(format!("{}", err).contains("no marker field"));
    }
}
