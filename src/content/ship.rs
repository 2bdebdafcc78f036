//! Ship hubs: curated per-platform aggregates from `ships.toml`.
//!
//! Hubs are not parsed from frontmatter, but they go through the same kind of
//! builder (required fields, enums) and the same referential checks as
//! documents.

use crate::content::reference::RefKey;
use crate::core::error::{ContentError, DoctrineError};
use crate::core::fields::{ContentEnum, parse_enum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Career {
    Combat,
    Industry,
    Logistics,
}

impl ContentEnum for Career {
    const ALLOWED: &'static [&'static str] = &["combat", "industry", "logistics"];

    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "combat" => Some(Self::Combat),
            "industry" => Some(Self::Industry),
            "logistics" => Some(Self::Logistics),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Combat => "combat",
            Self::Industry => "industry",
            Self::Logistics => "logistics",
        }
    }
}

/// Crew lens a hub is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleLens {
    Pilot,
    Gunner,
    Engineer,
}

impl ContentEnum for RoleLens {
    const ALLOWED: &'static [&'static str] = &["pilot", "gunner", "engineer"];

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "pilot" => Some(Self::Pilot),
            "gunner" => Some(Self::Gunner),
            "engineer" => Some(Self::Engineer),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pilot => "pilot",
            Self::Gunner => "gunner",
            Self::Engineer => "engineer",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperationalLink {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub to: String,
}

/// One `[[ship]]` table as written in `ships.toml`, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ShipHubSpec {
    pub slug: String,
    pub name: String,
    pub career: String,
    pub role: String,
    pub image_src: String,
    pub primary_roles: Vec<String>,
    pub loadout_assumption: Option<String>,
    pub primary_role_flow: Vec<String>,
    pub common_failure_modes: Vec<String>,
    pub recommended_module_ids: Vec<String>,
    pub reference_ids: Vec<String>,
    pub operational_links: Vec<OperationalLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ShipFile {
    ship: Vec<ShipHubSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipHub {
    #[serde(skip)]
    pub source: PathBuf,
    pub slug: String,
    pub name: String,
    pub career: Career,
    pub role: String,
    pub image_src: String,
    pub primary_roles: Vec<RoleLens>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loadout_assumption: Option<String>,
    pub primary_role_flow: Vec<String>,
    pub common_failure_modes: Vec<String>,
    pub recommended_module_ids: Vec<String>,
    /// `refType/id` strings as written; resolved by the integrity pass.
    pub reference_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operational_links: Vec<OperationalLink>,
}

impl ShipHub {
    /// Each reference entry with its composite key, or `None` when the entry
    /// is not a well-formed `refType/id`.
    pub fn reference_keys(&self) -> impl Iterator<Item = (&str, Option<RefKey>)> {
        self.reference_ids
            .iter()
            .map(|raw| (raw.as_str(), RefKey::from_raw(raw)))
    }
}

/// Ship hub specs plus the file they came from.
#[derive(Debug, Clone, Default)]
pub struct ShipSource {
    pub path: PathBuf,
    pub specs: Vec<ShipHubSpec>,
}

pub fn parse_ship_specs(content: &str, path: &Path) -> Result<ShipSource, DoctrineError> {
    let file: ShipFile = toml::from_str(content)
        .map_err(|e| DoctrineError::ConfigError(format!("{}: {}", path.display(), e)))?;
    Ok(ShipSource {
        path: path.to_path_buf(),
        specs: file.ship,
    })
}

/// Read ship hub specs. A missing file means no hubs.
pub fn load_ship_specs(path: &Path) -> Result<ShipSource, DoctrineError> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), "ship hub file not found; no ship hubs loaded");
        return Ok(ShipSource {
            path: path.to_path_buf(),
            specs: Vec::new(),
        });
    }
    let content = fs::read_to_string(path).map_err(DoctrineError::IoError)?;
    parse_ship_specs(&content, path)
}

fn required(value: &str, key: &str, path: &Path) -> Result<String, ContentError> {
    if value.trim().is_empty() {
        return Err(ContentError::MissingRequiredField {
            path: path.to_path_buf(),
            key: key.to_string(),
        });
    }
    Ok(value.to_string())
}

fn required_list(items: &[String], key: &str, path: &Path) -> Result<Vec<String>, ContentError> {
    if items.is_empty() || items.iter().any(|item| item.trim().is_empty()) {
        return Err(ContentError::MissingRequiredList {
            path: path.to_path_buf(),
            key: key.to_string(),
        });
    }
    Ok(items.to_vec())
}

pub fn build_ship_hub(spec: &ShipHubSpec, path: &Path) -> Result<ShipHub, ContentError> {
    let slug = required(&spec.slug, "slug", path)?;
    let name = required(&spec.name, "name", path)?;
    let career = parse_enum::<Career>(&required(&spec.career, "career", path)?, "career", path)?;
    let role = required(&spec.role, "role", path)?;
    let image_src = required(&spec.image_src, "imageSrc", path)?;
    let primary_roles = required_list(&spec.primary_roles, "primaryRoles", path)?
        .iter()
        .map(|r| parse_enum::<RoleLens>(r, "primaryRoles", path))
        .collect::<Result<Vec<_>, _>>()?;
    let reference_ids = spec
        .reference_ids
        .iter()
        .map(|raw| raw.trim().to_string())
        .collect();

    Ok(ShipHub {
        source: path.to_path_buf(),
        slug,
        name,
        career,
        role,
        image_src,
        primary_roles,
        loadout_assumption: spec
            .loadout_assumption
            .clone()
            .filter(|s| !s.trim().is_empty()),
        primary_role_flow: required_list(&spec.primary_role_flow, "primaryRoleFlow", path)?,
        common_failure_modes: required_list(
            &spec.common_failure_modes,
            "commonFailureModes",
            path,
        )?,
        recommended_module_ids: spec.recommended_module_ids.clone(),
        reference_ids,
        operational_links: spec.operational_links.clone(),
    })
}
