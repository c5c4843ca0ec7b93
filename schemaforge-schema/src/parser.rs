//! JSON Schema document decoding.
//!
//! This module turns raw text into [`SchemaDocument`]s and decodes single
//! fragments into [`SchemaNode`] keyword sets. It also splits `$ref`
//! strings into their document and fragment parts.

use crate::error::{ParseError, SchemaError};
use crate::types::{SchemaDocument, SchemaNode};
use serde::Deserialize;
use serde_json::Value;

/// Decodes a schema document from JSON text.
///
/// # Arguments
/// * `location` - Label of the document (file path or `-`)
/// * `text` - Document content
///
/// # Errors
/// Returns `ParseError` if the text is not well-formed JSON.
pub fn parse_document(location: &str, text: &str) -> Result<SchemaDocument, ParseError> {
    let root = serde_json::from_str::<Value>(text).map_err(|source| ParseError::Json {
        location: location.to_string(),
        source,
    })?;
    Ok(SchemaDocument::new(location, root))
}

/// Decodes the keyword set of one schema fragment.
///
/// Boolean schemas are accepted: `true` decodes to an empty keyword set,
/// `false` admits no value and is rejected.
///
/// # Errors
/// Returns `SchemaError::Malformed` if a keyword has the wrong shape.
pub fn parse_node(value: &Value, location: &str) -> Result<SchemaNode, SchemaError> {
    match value {
        Value::Bool(true) => Ok(SchemaNode::default()),
        Value::Bool(false) => Err(SchemaError::malformed(
            location,
            "schema `false` admits no value",
        )),
        Value::Object(_) => {
            SchemaNode::deserialize(value).map_err(|e| SchemaError::malformed(location, e.to_string()))
        }
        other => Err(SchemaError::malformed(
            location,
            format!("expected an object or boolean schema, found {}", kind_name(other)),
        )),
    }
}

/// A `$ref` split into document and fragment parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference<'a> {
    /// Document part; empty for local references.
    pub document: &'a str,
    /// Decoded JSON pointer of the fragment (`""` for the whole document).
    pub pointer: String,
}

/// Splits a `$ref` value.
///
/// Returns `None` for fragments that are not JSON pointers (plain-name
/// anchors), which are not supported.
#[must_use]
pub fn split_reference(reference: &str) -> Option<Reference<'_>> {
    let (document, fragment) = match reference.split_once('#') {
        Some((document, fragment)) => (document, fragment),
        None => (reference, ""),
    };
    let fragment = percent_decode(fragment);
    if !fragment.is_empty() && !fragment.starts_with('/') {
        return None;
    }
    Some(Reference {
        document,
        pointer: fragment,
    })
}

/// Decodes `%XX` escapes in a URI fragment. Malformed escapes are kept.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]))
        {
            out.push((hi << 4) | lo);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Human-readable name of a JSON value's kind.
#[must_use]
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_document() {
        let doc = parse_document("a.json", r#"{"$id": "urn:a", "type": "string"}"#)
            .expect("Failed to parse");
        assert_eq!(doc.location, "a.json");
        assert_eq!(doc.id.as_deref(), Some("urn:a"));
    }

    #[test]
    fn test_parse_document_rejects_malformed_json() {
        let result = parse_document("bad.json", r#"{"type": "#);
        assert!(matches!(result, Err(ParseError::Json { ref location, .. }) if location == "bad.json"));
    }

    #[test]
    fn test_parse_node_boolean_schemas() {
        assert!(parse_node(&json!(true), "x").is_ok());
        assert!(matches!(
            parse_node(&json!(false), "x"),
            Err(SchemaError::Malformed { .. })
        ));
        assert!(matches!(
            parse_node(&json!(42), "x"),
            Err(SchemaError::Malformed { .. })
        ));
    }

    #[test]
    fn test_parse_node_malformed_keyword() {
        let result = parse_node(&json!({"required": "name"}), "doc#/");
        assert!(matches!(result, Err(SchemaError::Malformed { .. })));
    }

    #[test]
    fn test_split_local_reference() {
        let reference = split_reference("#/definitions/Address").expect("pointer");
        assert_eq!(reference.document, "");
        assert_eq!(reference.pointer, "/definitions/Address");
    }

    #[test]
    fn test_split_cross_document_reference() {
        let reference = split_reference("common.json#/definitions/Id").expect("pointer");
        assert_eq!(reference.document, "common.json");
        assert_eq!(reference.pointer, "/definitions/Id");

        let whole = split_reference("common.json").expect("pointer");
        assert_eq!(whole.document, "common.json");
        assert_eq!(whole.pointer, "");
    }

    #[test]
    fn test_split_reference_decodes_percent_escapes() {
        let reference = split_reference("#/definitions/a%20b").expect("pointer");
        assert_eq!(reference.pointer, "/definitions/a b");
    }

    #[test]
    fn test_split_reference_rejects_anchor() {
        assert!(split_reference("#anchor").is_none());
    }
}
