//! Project configuration from `doctrine.toml`.
//!
//! Every key has a default, so a project without the file behaves like one with
//! an empty file.

use crate::core::error::DoctrineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "doctrine.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DoctrineConfig {
    pub content: ContentConfig,
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Content root, relative to the project root unless absolute.
    pub root: PathBuf,
    pub modules_dir: PathBuf,
    pub references_dir: PathBuf,
    /// Document extension without the leading dot.
    pub extension: String,
    pub ships_file: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("content"),
            modules_dir: PathBuf::from("modules"),
            references_dir: PathBuf::from("refs"),
            extension: "mdx".to_string(),
            ships_file: PathBuf::from("ships.toml"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Upper bound on parse workers; 0 lets rayon pick.
    pub max_workers: usize,
    /// Development only: substitute an empty corpus (with a warning) when the
    /// load fails instead of returning the failure.
    pub allow_empty_on_failure: bool,
}

/// Resolved on-disk locations for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentPaths {
    pub modules_dir: PathBuf,
    pub references_dir: PathBuf,
    pub ships_file: PathBuf,
    pub extension: String,
}

impl DoctrineConfig {
    pub fn resolve(&self, project_root: &Path) -> ContentPaths {
        let content_root = project_root.join(&self.content.root);
        ContentPaths {
            modules_dir: content_root.join(&self.content.modules_dir),
            references_dir: content_root.join(&self.content.references_dir),
            ships_file: content_root.join(&self.content.ships_file),
            extension: self
                .content
                .extension
                .trim_start_matches('.')
                .to_string(),
        }
    }
}

pub fn parse_config(content: &str) -> Result<DoctrineConfig, DoctrineError> {
    toml::from_str(content).map_err(|e| DoctrineError::ConfigError(e.to_string()))
}

/// Load `doctrine.toml` from the project root. A missing file is not an error.
pub fn load_config(project_root: &Path) -> Result<DoctrineConfig, DoctrineError> {
    let config_path = project_root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(DoctrineConfig::default());
    }
    let content = fs::read_to_string(&config_path).map_err(DoctrineError::IoError)?;
    parse_config(&content).map_err(|e| match e {
        DoctrineError::ConfigError(msg) => {
            DoctrineError::ConfigError(format!("{}: {}", config_path.display(), msg))
        }
        other => other,
    })
}
