//! Reference documents: keybind tables, maps, diagrams.
//!
//! References are identified by `(refType, id)`; the same `id` may appear under
//! different reference types.

use crate::content::module::ContentStatus;
use crate::core::error::ContentError;
use crate::core::fields::{
    ContentEnum, ensure_id_matches_filename, ensure_type, optional_list, optional_string,
    require_date, require_enum, require_string,
};
use crate::core::frontmatter::FieldMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

pub const REFERENCE_TYPE_TAG: &str = "reference";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    Keybind,
    Map,
    Diagram,
}

impl ContentEnum for RefType {
    const ALLOWED: &'static [&'static str] = &["keybind", "map", "diagram"];

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "keybind" => Some(Self::Keybind),
            "map" => Some(Self::Map),
            "diagram" => Some(Self::Diagram),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Keybind => "keybind",
            Self::Map => "map",
            Self::Diagram => "diagram",
        }
    }
}

/// Composite identity of a reference, rendered as `refType/id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RefKey {
    pub ref_type: RefType,
    pub id: String,
}

impl RefKey {
    pub fn new(ref_type: RefType, id: impl Into<String>) -> Self {
        Self {
            ref_type,
            id: id.into(),
        }
    }

    /// Parse `refType/id`. Anything else, including an unknown type or a
    /// blank id, is `None`.
    pub fn from_raw(raw: &str) -> Option<Self> {
        let (ref_type, id) = raw.split_once('/')?;
        let ref_type = RefType::from_token(ref_type.trim())?;
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        Some(Self::new(ref_type, id))
    }
}

impl fmt::Display for RefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ref_type.as_str(), self.id)
    }
}

impl Serialize for RefKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    #[serde(skip)]
    pub path: PathBuf,
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: &'static str,
    pub status: ContentStatus,
    pub ref_type: RefType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub last_updated: String,
    pub tags: Vec<String>,
    #[serde(skip)]
    pub body: String,
}

impl Reference {
    pub fn key(&self) -> RefKey {
        RefKey::new(self.ref_type, self.id.clone())
    }

    /// Always `"reference"`.
    pub fn type_tag(&self) -> &'static str {
        self.doc_type
    }
}

pub fn build_reference(
    fields: &FieldMap,
    body: &str,
    path: &Path,
) -> Result<Reference, ContentError> {
    ensure_type(fields, REFERENCE_TYPE_TAG, path)?;

    let reference = Reference {
        path: path.to_path_buf(),
        id: require_string(fields, "id", path)?,
        title: require_string(fields, "title", path)?,
        doc_type: REFERENCE_TYPE_TAG,
        status: require_enum(fields, "status", path)?,
        ref_type: require_enum(fields, "refType", path)?,
        summary: optional_string(fields, "summary"),
        last_updated: require_date(fields, "lastUpdated", path)?,
        tags: optional_list(fields, "tags"),
        body: body.to_string(),
    };

    ensure_id_matches_filename(&reference.id, path)?;
    Ok(reference)
}
