//! Doctrine modules: procedure documents.

use crate::core::error::{ContentError, IncludeDimension};
use crate::core::fields::{
    ContentEnum, dedup_ordered, ensure_id_matches_filename, ensure_type, optional_list,
    optional_string, require_date, require_enum, require_list, require_string,
};
use crate::core::frontmatter::FieldMap;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MODULE_TYPE_TAG: &str = "module";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    Review,
    Validated,
}

impl ContentEnum for ContentStatus {
    const ALLOWED: &'static [&'static str] = &["draft", "review", "validated"];

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "draft" => Some(Self::Draft),
            "review" => Some(Self::Review),
            "validated" => Some(Self::Validated),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Validated => "validated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Flying,
    Manning,
    Facing,
    Recovery,
}

impl ContentEnum for ModuleType {
    const ALLOWED: &'static [&'static str] = &["flying", "manning", "facing", "recovery"];

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "flying" => Some(Self::Flying),
            "manning" => Some(Self::Manning),
            "facing" => Some(Self::Facing),
            "recovery" => Some(Self::Recovery),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Flying => "flying",
            Self::Manning => "manning",
            Self::Facing => "facing",
            Self::Recovery => "recovery",
        }
    }
}

/// A validated procedure. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    #[serde(skip)]
    pub path: PathBuf,
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: &'static str,
    pub status: ContentStatus,
    pub module_type: ModuleType,
    pub owner: String,
    pub intent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_label: Option<String>,
    pub last_validated: String,
    pub tags: Vec<String>,
    pub ships: Vec<String>,
    pub roles: Vec<String>,
    pub exclude_ships: Vec<String>,
    pub exclude_roles: Vec<String>,
    pub enemies: Vec<String>,
    pub maps: Vec<String>,
    pub power_projection: Vec<String>,
    pub use_when: Vec<String>,
    pub steps: Vec<String>,
    pub failure_modes: Vec<String>,
    pub validation: Vec<String>,
    pub prerequisites: Vec<String>,
    pub related_module_ids: Vec<String>,
    #[serde(skip)]
    pub body: String,
}

impl Module {
    /// Always `"module"`.
    pub fn type_tag(&self) -> &'static str {
        self.doc_type
    }

    /// Whether this module applies in the given ship/role context. A blank
    /// context value matches anything; an empty include list matches any value
    /// that is not explicitly excluded.
    pub fn matches_ship_role(&self, ship: Option<&str>, role: Option<&str>) -> bool {
        fn allowed(value: Option<&str>, include: &[String], exclude: &[String]) -> bool {
            let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                return true;
            };
            if !include.is_empty() && !include.iter().any(|i| i == value) {
                return false;
            }
            !exclude.iter().any(|e| e == value)
        }

        allowed(ship, &self.ships, &self.exclude_ships)
            && allowed(role, &self.roles, &self.exclude_roles)
    }
}

fn first_conflict<'a>(include: &'a [String], exclude: &'a [String]) -> Option<&'a String> {
    exclude.iter().find(|value| include.contains(value))
}

/// Build a module from one document's frontmatter and body.
pub fn build_module(fields: &FieldMap, body: &str, path: &Path) -> Result<Module, ContentError> {
    ensure_type(fields, MODULE_TYPE_TAG, path)?;

    let module = Module {
        path: path.to_path_buf(),
        id: require_string(fields, "id", path)?,
        title: require_string(fields, "title", path)?,
        doc_type: MODULE_TYPE_TAG,
        status: require_enum(fields, "status", path)?,
        module_type: require_enum(fields, "moduleType", path)?,
        owner: require_string(fields, "owner", path)?,
        intent: require_string(fields, "intent", path)?,
        summary: optional_string(fields, "summary"),
        video_src: optional_string(fields, "videoSrc"),
        video_label: optional_string(fields, "videoLabel"),
        last_validated: require_date(fields, "lastValidated", path)?,
        tags: dedup_ordered(require_list(fields, "tags", path)?),
        ships: optional_list(fields, "ships"),
        roles: optional_list(fields, "roles"),
        exclude_ships: optional_list(fields, "excludeShips"),
        exclude_roles: optional_list(fields, "excludeRoles"),
        enemies: optional_list(fields, "enemies"),
        maps: optional_list(fields, "maps"),
        power_projection: optional_list(fields, "powerProjection"),
        use_when: require_list(fields, "useWhen", path)?,
        steps: require_list(fields, "steps", path)?,
        failure_modes: require_list(fields, "failureModes", path)?,
        validation: require_list(fields, "validation", path)?,
        prerequisites: optional_list(fields, "prerequisites"),
        related_module_ids: optional_list(fields, "relatedModuleIds"),
        body: body.to_string(),
    };

    ensure_id_matches_filename(&module.id, path)?;

    let conflicts = [
        (IncludeDimension::Ship, &module.ships, &module.exclude_ships),
        (IncludeDimension::Role, &module.roles, &module.exclude_roles),
    ];
    for (dimension, include, exclude) in conflicts {
        if let Some(value) = first_conflict(include, exclude) {
            return Err(ContentError::ConflictingIncludeExclude {
                path: path.to_path_buf(),
                dimension,
                value: value.clone(),
            });
        }
    }

    Ok(module)
}
