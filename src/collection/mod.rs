//! Collection loading and schema normalization.
//!
//! Exported collections come in several incompatible schema versions. This
//! module detects the version once at parse time and exposes a uniform,
//! indexable sequence of [`Descriptor`]s over the document:
//!
//! - **v1**: a flat top-level `requests` array with folder membership held
//!   as an id reference into a separate `folders` table.
//! - **v2 / v2.1**: two-level nesting, top-level folders each holding an
//!   `item` array. v2 stores the URL as a plain string, v2.1 as an object
//!   with a `raw` field; both normalize to the same descriptor.
//!
//! Descriptor indices are folder-major and stable for the lifetime of a
//! loaded collection.

pub mod descriptor;
pub mod error;

pub use descriptor::Descriptor;
pub use error::CollectionError;

use crate::models::request::HttpMethod;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// v1 request entry: flat, folder membership by id.
#[derive(Debug, Clone, Deserialize)]
struct V1Request {
    name: String,
    method: String,
    url: String,
    #[serde(rename = "rawModeData", default)]
    raw_mode_data: Option<String>,
    #[serde(default)]
    folder: Option<String>,
}

/// v1 folder table entry.
#[derive(Debug, Clone, Deserialize)]
struct V1Folder {
    id: String,
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct V1Document {
    requests: Vec<V1Request>,
    #[serde(default)]
    folders: Vec<V1Folder>,
}

/// v2/v2.1 URL: a plain string in v2, an object with `raw` in v2.1.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum V2Url {
    Raw(String),
    Detailed {
        raw: String,
    },
}

impl V2Url {
    fn raw(&self) -> &str {
        match self {
            V2Url::Raw(s) => s,
            V2Url::Detailed { raw } => raw,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct V2Header {
    key: String,
    value: String,
}

#[derive(Debug, Clone, Deserialize)]
struct V2Body {
    #[serde(default)]
    raw: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct V2Request {
    method: String,
    url: V2Url,
    #[serde(default)]
    header: Vec<V2Header>,
    #[serde(default)]
    body: Option<V2Body>,
}

#[derive(Debug, Clone, Deserialize)]
struct V2Item {
    name: String,
    request: V2Request,
}

#[derive(Debug, Clone, Deserialize)]
struct V2Folder {
    name: String,
    #[serde(default)]
    item: Vec<V2Item>,
}

#[derive(Debug, Clone, Deserialize)]
struct V2Document {
    item: Vec<V2Folder>,
}

/// A loaded collection with its schema variant fixed at parse time.
///
/// Immutable after load; all access goes through [`Collection::count_apis`]
/// and [`Collection::get_api`].
#[derive(Debug, Clone)]
pub enum Collection {
    /// v1 shape: flat `requests` array plus a folder id table.
    V1(V1Collection),
    /// v2/v2.1 shape: folders nesting their items directly.
    V2(V2Collection),
}

/// Parsed v1 document.
#[derive(Debug, Clone)]
pub struct V1Collection {
    document: V1Document,
}

/// Parsed v2/v2.1 document with the leaf count fixed at load.
#[derive(Debug, Clone)]
pub struct V2Collection {
    document: V2Document,
    count: usize,
}

impl Collection {
    /// Parses a collection document, detecting its schema version.
    ///
    /// A top-level `requests` array selects the v1 shape; otherwise a
    /// top-level `item` array selects v2/2.1.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::SchemaMismatch`] when neither marker field
    /// is present, or when the selected shape fails to deserialize.
    pub fn parse(document: &str) -> Result<Self, CollectionError> {
        let root: serde_json::Value =
            serde_json::from_str(document).map_err(|e| CollectionError::SchemaMismatch {
                detail: format!("not valid JSON ({})", e),
            })?;

        if root.get("requests").is_some() {
            let document: V1Document = serde_json::from_value(root).map_err(|e| {
                CollectionError::SchemaMismatch {
                    detail: format!("malformed v1 document ({})", e),
                }
            })?;
            Ok(Collection::V1(V1Collection { document }))
        } else if root.get("item").is_some() {
            let document: V2Document = serde_json::from_value(root).map_err(|e| {
                CollectionError::SchemaMismatch {
                    detail: format!("malformed v2 document ({})", e),
                }
            })?;
            let count = document.item.iter().map(|folder| folder.item.len()).sum();
            Ok(Collection::V2(V2Collection { document, count }))
        } else {
            Err(CollectionError::SchemaMismatch {
                detail: "neither 'requests' nor 'item' present at top level".to_string(),
            })
        }
    }

    /// Reads and parses a collection file.
    pub fn load(path: &Path) -> Result<Self, CollectionError> {
        let text = fs::read_to_string(path)
            .map_err(|e| CollectionError::Read(format!("{}: {}", path.display(), e)))?;
        Self::parse(&text)
    }

    /// Returns the number of leaf API entries in the collection.
    ///
    /// v1 counts the flat `requests` array; v2 sums item counts across every
    /// top-level folder (two-level nesting only).
    pub fn count_apis(&self) -> usize {
        match self {
            Collection::V1(c) => c.document.requests.len(),
            Collection::V2(c) => c.count,
        }
    }

    /// Produces the normalized descriptor at `index`.
    ///
    /// Indices are folder-major and stable within a single load.
    ///
    /// # Errors
    ///
    /// [`CollectionError::IndexOutOfRange`] when `index` is negative or not
    /// below [`Collection::count_apis`]; [`CollectionError::UnresolvedReference`]
    /// when a v1 entry's folder id has no match in the folder table.
    pub fn get_api(&self, index: i64) -> Result<Descriptor, CollectionError> {
        let count = self.count_apis();
        if index < 0 || index as usize >= count {
            return Err(CollectionError::IndexOutOfRange { index, count });
        }
        match self {
            Collection::V1(c) => c.descriptor(index as usize),
            Collection::V2(c) => c.descriptor(index as usize),
        }
    }

    /// Iterates every descriptor in index order.
    ///
    /// Stops at the first error (e.g., a dangling v1 folder reference).
    pub fn descriptors(&self) -> impl Iterator<Item = Result<Descriptor, CollectionError>> + '_ {
        (0..self.count_apis()).map(move |i| self.get_api(i as i64))
    }
}

impl V1Collection {
    fn descriptor(&self, index: usize) -> Result<Descriptor, CollectionError> {
        let request = &self.document.requests[index];

        // v1 stores folder membership as an id reference. A missing field
        // means the entry sits at the collection root; a dangling id is an
        // unresolved reference.
        let folder_name = match &request.folder {
            Some(id) => self
                .document
                .folders
                .iter()
                .find(|folder| &folder.id == id)
                .map(|folder| folder.name.clone())
                .ok_or_else(|| CollectionError::UnresolvedReference {
                    folder_id: id.clone(),
                    entry: request.name.clone(),
                })?,
            None => String::new(),
        };

        Ok(Descriptor {
            name: request.name.clone(),
            method: parse_method(&request.method, &request.name)?,
            uri_template: request.url.clone(),
            headers: IndexMap::new(),
            body_sample: request.raw_mode_data.clone(),
            folder_name,
        })
    }
}

impl V2Collection {
    fn descriptor(&self, index: usize) -> Result<Descriptor, CollectionError> {
        let mut remaining = index;
        for folder in &self.document.item {
            if remaining < folder.item.len() {
                return descriptor_from_v2(&folder.item[remaining], &folder.name);
            }
            remaining -= folder.item.len();
        }
        // count was fixed at load, so the walk always lands inside a folder
        unreachable!("descriptor index verified against count before dispatch")
    }
}

fn descriptor_from_v2(item: &V2Item, folder_name: &str) -> Result<Descriptor, CollectionError> {
    let mut headers = IndexMap::new();
    for header in &item.request.header {
        headers.insert(header.key.clone(), header.value.clone());
    }

    Ok(Descriptor {
        name: item.name.clone(),
        method: parse_method(&item.request.method, &item.name)?,
        uri_template: item.request.url.raw().to_string(),
        headers,
        body_sample: item.request.body.as_ref().and_then(|b| b.raw.clone()),
        folder_name: folder_name.to_string(),
    })
}

fn parse_method(method: &str, entry: &str) -> Result<HttpMethod, CollectionError> {
    HttpMethod::from_str(method).ok_or_else(|| CollectionError::UnsupportedMethod {
        method: method.to_string(),
        entry: entry.to_string(),
    })
}
