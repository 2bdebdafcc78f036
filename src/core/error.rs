use serde::Serialize;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Entity families that can own or be the target of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Module,
    Reference,
    Ship,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module => write!(f, "module"),
            Self::Reference => write!(f, "reference"),
            Self::Ship => write!(f, "ship"),
        }
    }
}

/// Include/exclude pairs on a module that must not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncludeDimension {
    Ship,
    Role,
}

impl fmt::Display for IncludeDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ship => write!(f, "ship"),
            Self::Role => write!(f, "role"),
        }
    }
}

/// A single content problem, carrying enough context to locate and fix the
/// offending document without re-running.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum ContentError {
    #[error("{} is missing frontmatter; expected a leading --- block", .path.display())]
    MissingFrontmatter { path: PathBuf },
    #[error("{} has invalid frontmatter line: {line:?}", .path.display())]
    MalformedFrontmatterLine { path: PathBuf, line: String },
    #[error("{} declares frontmatter key {key:?} more than once", .path.display())]
    DuplicateFrontmatterKey { path: PathBuf, key: String },
    #[error("{} has invalid literal value for {key:?}: {reason}", .path.display())]
    InvalidLiteralValue {
        path: PathBuf,
        key: String,
        reason: String,
    },
    #[error("{} is missing required string field {key:?}", .path.display())]
    MissingRequiredField { path: PathBuf, key: String },
    #[error("{} has invalid {key:?}: {value:?} (allowed: {})", .path.display(), .allowed.join(", "))]
    InvalidEnumValue {
        path: PathBuf,
        key: String,
        value: String,
        allowed: &'static [&'static str],
    },
    #[error("{} must define a non-empty string list {key:?}", .path.display())]
    MissingRequiredList { path: PathBuf, key: String },
    #[error("{} has invalid {key:?} date {value:?} (expected YYYY-MM-DD)", .path.display())]
    InvalidDateFormat {
        path: PathBuf,
        key: String,
        value: String,
    },
    #[error("{} id {id:?} must match filename {expected:?}", .path.display())]
    IdFilenameMismatch {
        path: PathBuf,
        id: String,
        expected: String,
    },
    #[error("{} must have type {expected:?}, found {found:?}", .path.display())]
    UnexpectedDocumentType {
        path: PathBuf,
        expected: &'static str,
        found: String,
    },
    #[error("{} cannot include and exclude {dimension} {value:?}", .path.display())]
    ConflictingIncludeExclude {
        path: PathBuf,
        dimension: IncludeDimension,
        value: String,
    },
    #[error("duplicate {kind} {key:?} in {} and {}", .first.display(), .second.display())]
    DuplicateId {
        kind: EntityKind,
        key: String,
        first: PathBuf,
        second: PathBuf,
    },
    #[error("{source_kind} {source_id:?} references unknown {target_kind} {missing_id:?}")]
    UnknownReference {
        source_kind: EntityKind,
        source_id: String,
        target_kind: EntityKind,
        missing_id: String,
    },
}

/// Aggregated outcome of a failed load. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub errors: Vec<ContentError>,
}

impl LoadFailure {
    pub fn new(errors: Vec<ContentError>) -> Self {
        debug_assert!(!errors.is_empty(), "load failure without errors");
        Self { errors }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "content load failed with {} error(s)", self.errors.len())?;
        for err in &self.errors {
            write!(f, "\n  - {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoadFailure {}

impl From<ContentError> for LoadFailure {
    fn from(err: ContentError) -> Self {
        Self { errors: vec![err] }
    }
}

#[derive(Error, Debug)]
pub enum DoctrineError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error(transparent)]
    Load(#[from] LoadFailure),
    #[error("A content load is already in progress")]
    LoadInProgress,
    #[error("Worker pool error: {0}")]
    WorkerPool(String),
    #[error("Not found: {0}")]
    NotFound(String),
}
