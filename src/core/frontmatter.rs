//! Frontmatter block parsing.
//!
//! A document starts with a `---` marker line, followed by `key: value` lines,
//! closed by another `---` line. Everything after the closing marker is the body
//! and is returned verbatim.

use crate::core::error::ContentError;
use crate::core::value::{FieldValue, coerce_value};
use std::path::Path;

const MARKER: &str = "---";

/// Ordered key/value pairs from one frontmatter block. Keys are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `false` (and keeps the existing value) when `key` is already present.
    pub fn insert(&mut self, key: String, value: FieldValue) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub fields: FieldMap,
    pub body: String,
}

/// Split raw document text into coerced frontmatter fields and body.
pub fn parse_document(text: &str, path: &Path) -> Result<ParsedDocument, ContentError> {
    let missing = || ContentError::MissingFrontmatter {
        path: path.to_path_buf(),
    };

    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text.split_inclusive('\n');

    let opening = lines.next().ok_or_else(missing)?;
    if !opening.ends_with('\n') || opening.trim_end() != MARKER {
        return Err(missing());
    }

    let mut consumed = opening.len();
    let mut block: Vec<&str> = Vec::new();
    let mut closed = false;
    for line in lines {
        consumed += line.len();
        if line.trim_end() == MARKER {
            closed = true;
            break;
        }
        block.push(line);
    }
    if !closed {
        return Err(missing());
    }

    let mut fields = FieldMap::default();
    for line in block {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let separator = match trimmed.find(':') {
            Some(idx) if idx > 0 => idx,
            _ => {
                return Err(ContentError::MalformedFrontmatterLine {
                    path: path.to_path_buf(),
                    line: line.trim_end_matches(['\r', '\n']).to_string(),
                });
            }
        };

        let key = trimmed[..separator].trim();
        let value = coerce_value(&trimmed[separator + 1..], path, key)?;
        if !fields.insert(key.to_string(), value) {
            return Err(ContentError::DuplicateFrontmatterKey {
                path: path.to_path_buf(),
                key: key.to_string(),
            });
        }
    }

    Ok(ParsedDocument {
        fields,
        body: text[consumed..].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ParsedDocument, ContentError> {
        parse_document(text, Path::new("content/modules/a.mdx"))
    }

    #[test]
    fn splits_fields_and_body() {
        let doc = parse("---\nid: a\nstatus: draft\ntags: [\"x\"]\n---\n# Heading\nBody\n").unwrap();
        assert_eq!(doc.fields.len(), 3);
        assert_eq!(doc.fields.get("id"), Some(&FieldValue::Text("a".into())));
        assert_eq!(
            doc.fields.keys().collect::<Vec<_>>(),
            vec!["id", "status", "tags"]
        );
        assert_eq!(doc.body, "# Heading\nBody\n");
    }

    #[test]
    fn handles_crlf_bom_comments_and_blank_lines() {
        let doc = parse("\u{feff}---\r\n# comment\r\n\r\nid: a\r\n---\r\nbody").unwrap();
        assert_eq!(doc.fields.get("id"), Some(&FieldValue::Text("a".into())));
        assert_eq!(doc.fields.len(), 1);
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn value_keeps_everything_after_first_colon() {
        let doc = parse("---\nintent: Hold range: 1.5km\n---\n").unwrap();
        assert_eq!(
            doc.fields.get("intent"),
            Some(&FieldValue::Text("Hold range: 1.5km".into()))
        );
    }

    #[test]
    fn closing_marker_at_end_of_input_gives_empty_body() {
        let doc = parse("---\nid: a\n---").unwrap();
        assert_eq!(doc.body, "");
    }

    #[test]
    fn empty_block_is_valid() {
        let doc = parse("---\n---\nbody").unwrap();
        assert!(doc.fields.is_empty());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn missing_or_unclosed_block_is_rejected() {
        for text in ["# Title\n", "", "---", "---\nid: a\n", " ---\nid: a\n---\n"] {
            assert!(
                matches!(parse(text), Err(ContentError::MissingFrontmatter { .. })),
                "expected missing frontmatter for {text:?}"
            );
        }
    }

    #[test]
    fn line_without_key_is_malformed() {
        let err = parse("---\nid: a\njust words\n---\n").unwrap_err();
        assert_eq!(
            err,
            ContentError::MalformedFrontmatterLine {
                path: "content/modules/a.mdx".into(),
                line: "just words".into(),
            }
        );
        assert!(matches!(
            parse("---\n: value\n---\n"),
            Err(ContentError::MalformedFrontmatterLine { .. })
        ));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let err = parse("---\nid: a\nid: b\n---\n").unwrap_err();
        assert_eq!(
            err,
            ContentError::DuplicateFrontmatterKey {
                path: "content/modules/a.mdx".into(),
                key: "id".into(),
            }
        );
    }

    #[test]
    fn invalid_literal_propagates() {
        assert!(matches!(
            parse("---\ntags: [\"a\",\n---\n"),
            Err(ContentError::InvalidLiteralValue { .. })
        ));
    }
}
