//! Per-field extraction contracts shared by the entity builders.
//!
//! Builders never poke at a [`FieldMap`] directly; every field goes through one
//! of these functions so the required/optional/enum/date rules stay uniform
//! across entity kinds.

use crate::core::error::ContentError;
use crate::core::frontmatter::FieldMap;
use crate::core::value::FieldValue;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// A closed set of string tokens accepted for one field.
pub trait ContentEnum: Sized + Copy {
    const ALLOWED: &'static [&'static str];

    fn from_token(token: &str) -> Option<Self>;

    fn as_str(&self) -> &'static str;
}

pub fn require_string(fields: &FieldMap, key: &str, path: &Path) -> Result<String, ContentError> {
    match fields.get(key).and_then(FieldValue::as_str) {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(ContentError::MissingRequiredField {
            path: path.to_path_buf(),
            key: key.to_string(),
        }),
    }
}

/// Absent, non-string, or blank values are all "unset".
pub fn optional_string(fields: &FieldMap, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(FieldValue::as_str)
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

pub fn require_enum<T: ContentEnum>(
    fields: &FieldMap,
    key: &str,
    path: &Path,
) -> Result<T, ContentError> {
    let value = require_string(fields, key, path)?;
    parse_enum(&value, key, path)
}

pub fn parse_enum<T: ContentEnum>(value: &str, key: &str, path: &Path) -> Result<T, ContentError> {
    T::from_token(value).ok_or_else(|| ContentError::InvalidEnumValue {
        path: path.to_path_buf(),
        key: key.to_string(),
        value: value.to_string(),
        allowed: T::ALLOWED,
    })
}

pub fn require_date(fields: &FieldMap, key: &str, path: &Path) -> Result<String, ContentError> {
    let value = require_string(fields, key, path)?;
    if !ISO_DATE.is_match(&value) {
        return Err(ContentError::InvalidDateFormat {
            path: path.to_path_buf(),
            key: key.to_string(),
            value,
        });
    }
    Ok(value)
}

fn string_items(value: &FieldValue) -> Option<Vec<String>> {
    value
        .as_list()?
        .iter()
        .map(|item| match item {
            FieldValue::Text(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        })
        .collect()
}

pub fn require_list(fields: &FieldMap, key: &str, path: &Path) -> Result<Vec<String>, ContentError> {
    match fields.get(key).and_then(string_items) {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(ContentError::MissingRequiredList {
            path: path.to_path_buf(),
            key: key.to_string(),
        }),
    }
}

/// Absent or malformed lists default to empty, unlike [`require_list`].
pub fn optional_list(fields: &FieldMap, key: &str) -> Vec<String> {
    fields.get(key).and_then(string_items).unwrap_or_default()
}

/// Drop repeated entries, keeping the first occurrence of each.
pub fn dedup_ordered(items: Vec<String>) -> Vec<String> {
    let mut seen = rustc_hash::FxHashSet::default();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// The filename stem, i.e. `foo` for `.../foo.mdx`.
pub fn filename_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn ensure_id_matches_filename(id: &str, path: &Path) -> Result<(), ContentError> {
    let expected = filename_stem(path);
    if id != expected {
        return Err(ContentError::IdFilenameMismatch {
            path: path.to_path_buf(),
            id: id.to_string(),
            expected,
        });
    }
    Ok(())
}

pub fn ensure_type(
    fields: &FieldMap,
    expected: &'static str,
    path: &Path,
) -> Result<(), ContentError> {
    let found = require_string(fields, "type", path)?;
    if found != expected {
        return Err(ContentError::UnexpectedDocumentType {
            path: path.to_path_buf(),
            expected,
            found,
        });
    }
    Ok(())
}
