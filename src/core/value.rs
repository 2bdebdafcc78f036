//! Frontmatter value coercion.
//!
//! Raw values are sniffed before anything is parsed: only text that looks like a
//! literal (quoted string, array, object, boolean, or plain decimal number) goes
//! through the JSON parser. Everything else is kept as trimmed text, so a bare
//! word like `draft` is never mistaken for a literal.

use crate::core::error::ContentError;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static DECIMAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?$").unwrap());

/// A coerced frontmatter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Number(f64),
    List(Vec<FieldValue>),
    Object(Vec<(String, FieldValue)>),
    Null,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::List(_) => "array",
            Self::Object(_) => "object",
            Self::Null => "null",
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, FieldValue::from(v)))
                    .collect(),
            ),
        }
    }
}

fn looks_literal(trimmed: &str) -> bool {
    trimmed.starts_with('"')
        || trimmed.starts_with('[')
        || trimmed.starts_with('{')
        || trimmed == "true"
        || trimmed == "false"
        || DECIMAL_NUMBER.is_match(trimmed)
}

/// Coerce one raw (un-trimmed) frontmatter value.
///
/// Blank input yields `Text("")`, which builders treat as unset.
pub fn coerce_value(raw: &str, path: &Path, key: &str) -> Result<FieldValue, ContentError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(FieldValue::Text(String::new()));
    }

    if looks_literal(trimmed) {
        return serde_json::from_str::<serde_json::Value>(trimmed)
            .map(FieldValue::from)
            .map_err(|e| ContentError::InvalidLiteralValue {
                path: path.to_path_buf(),
                key: key.to_string(),
                reason: e.to_string(),
            });
    }

    Ok(FieldValue::Text(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coerce(raw: &str) -> Result<FieldValue, ContentError> {
        coerce_value(raw, Path::new("content/modules/x.mdx"), "k")
    }

    #[test]
    fn bare_word_stays_text() {
        assert_eq!(coerce(" draft").unwrap(), FieldValue::Text("draft".into()));
        assert_eq!(
            coerce(" Hold the aft window ").unwrap(),
            FieldValue::Text("Hold the aft window".into())
        );
    }

    #[test]
    fn array_literal_becomes_ordered_list() {
        let value = coerce(r#" ["a","b"]"#).unwrap();
        assert_eq!(
            value,
            FieldValue::List(vec![
                FieldValue::Text("a".into()),
                FieldValue::Text("b".into())
            ])
        );
    }

    #[test]
    fn scalars_are_parsed_strictly() {
        assert_eq!(coerce("true").unwrap(), FieldValue::Bool(true));
        assert_eq!(coerce("false").unwrap(), FieldValue::Bool(false));
        assert_eq!(coerce("-12.5").unwrap(), FieldValue::Number(-12.5));
        assert_eq!(coerce("42").unwrap(), FieldValue::Number(42.0));
        assert_eq!(
            coerce(r#""quoted: value""#).unwrap(),
            FieldValue::Text("quoted: value".into())
        );
    }

    #[test]
    fn words_resembling_literals_are_not_parsed() {
        assert_eq!(coerce("True").unwrap(), FieldValue::Text("True".into()));
        assert_eq!(coerce("null").unwrap(), FieldValue::Text("null".into()));
        assert_eq!(coerce("1.2.3").unwrap(), FieldValue::Text("1.2.3".into()));
        assert_eq!(
            coerce("2026-01-15").unwrap(),
            FieldValue::Text("2026-01-15".into())
        );
    }

    #[test]
    fn empty_value_is_unset_text() {
        assert_eq!(coerce("   ").unwrap(), FieldValue::Text(String::new()));
    }

    #[test]
    fn broken_literal_reports_key_and_reason() {
        let err = coerce(r#" ["a", "b""#).unwrap_err();
        match err {
            ContentError::InvalidLiteralValue { key, reason, .. } => {
                assert_eq!(key, "k");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn object_literal_keeps_entries() {
        let value = coerce(r#"{"x": [1, null]}"#).unwrap();
        assert_eq!(
            value,
            FieldValue::Object(vec![(
                "x".into(),
                FieldValue::List(vec![FieldValue::Number(1.0), FieldValue::Null])
            )])
        );
        assert_eq!(value.type_name(), "object");
    }
}
