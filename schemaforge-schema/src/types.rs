//! Schema type definitions.
//!
//! This module contains the data structures representing a JSON Schema
//! fragment as written ([`SchemaNode`]), the input documents it comes from,
//! and the [`Location`] used as the identity of every fragment.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;
use std::fmt;

/// One decoded input document.
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    /// Where the document came from (file path, or `-` for stdin).
    pub location: String,
    /// The document's `$id`, if declared at the root.
    pub id: Option<String>,
    /// Root JSON value.
    pub root: Value,
}

impl SchemaDocument {
    /// Wraps an already-decoded JSON value.
    #[must_use]
    pub fn new(location: impl Into<String>, root: Value) -> Self {
        let id = root
            .get("$id")
            .or_else(|| root.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self {
            location: location.into(),
            id,
            root,
        }
    }

    /// Returns true if a `$ref` document part names this document.
    ///
    /// Matches the `$id` or the location label, either exactly or by the
    /// final path segment.
    #[must_use]
    pub fn answers_to(&self, reference: &str) -> bool {
        let reference = reference.trim_end_matches('#');
        let wanted = last_segment(reference);
        let candidates = self.id.iter().map(String::as_str).chain([self.location.as_str()]);
        for candidate in candidates {
            let candidate = candidate.trim_end_matches('#');
            if candidate == reference || last_segment(candidate) == wanted {
                return true;
            }
        }
        false
    }

    /// File stem of the location label, if it looks like a path.
    #[must_use]
    pub fn stem(&self) -> Option<&str> {
        if self.location == "-" || self.location.is_empty() {
            return None;
        }
        let file = last_segment(&self.location);
        let stem = file.split('.').next().unwrap_or(file);
        (!stem.is_empty()).then_some(stem)
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Identity of a schema fragment: a document index plus a JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    /// Index of the document in the input sequence.
    pub document: usize,
    /// JSON pointer inside the document (`""` is the root).
    pub pointer: String,
}

impl Location {
    /// Location of a document root.
    #[must_use]
    pub fn root(document: usize) -> Self {
        Self {
            document,
            pointer: String::new(),
        }
    }

    /// Location of a named child, escaping the token.
    #[must_use]
    pub fn child(&self, token: &str) -> Self {
        let mut pointer = String::with_capacity(self.pointer.len() + token.len() + 1);
        pointer.push_str(&self.pointer);
        pointer.push('/');
        pointer.push_str(&token.replace('~', "~0").replace('/', "~1"));
        Self {
            document: self.document,
            pointer,
        }
    }

    /// Location of an array element.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self {
            document: self.document,
            pointer: format!("{}/{}", self.pointer, index),
        }
    }

    /// Unescaped reference tokens of the pointer.
    pub fn tokens(&self) -> impl Iterator<Item = String> + '_ {
        self.pointer
            .split('/')
            .skip(1)
            .map(|token| token.replace("~1", "/").replace("~0", "~"))
    }

    /// Returns the definition key if this location is an entry of
    /// `definitions` or `$defs`, at the root or nested in another entry.
    #[must_use]
    pub fn definition_key(&self) -> Option<String> {
        let tokens: Vec<String> = self.tokens().collect();
        if tokens.is_empty() || tokens.len() % 2 != 0 {
            return None;
        }
        let is_container = |token: &String| token == "definitions" || token == "$defs";
        if !tokens.iter().step_by(2).all(is_container) {
            return None;
        }
        tokens.last().cloned()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc{}#{}", self.document, self.pointer)
    }
}

/// JSON type names accepted by the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// `"string"`.
    String,
    /// `"integer"`, mapped to a 64-bit signed integer.
    Integer,
    /// `"number"`, mapped to a double.
    Number,
    /// `"boolean"`.
    Boolean,
    /// `"null"`.
    Null,
    /// `"object"`.
    Object,
    /// `"array"`.
    Array,
}

impl JsonType {
    /// Returns the keyword spelling of the type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    /// Returns true for types that map onto a primitive.
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::String | Self::Integer | Self::Number | Self::Boolean | Self::Null
        )
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value of the `type` keyword.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    /// A single type name.
    Single(JsonType),
    /// A list of type names.
    Multiple(Vec<JsonType>),
}

impl TypeSet {
    /// Returns the type names, deduplicated, in declaration order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<JsonType> {
        match self {
            Self::Single(single) => vec![*single],
            Self::Multiple(many) => {
                let mut out = Vec::with_capacity(many.len());
                for ty in many {
                    if !out.contains(ty) {
                        out.push(*ty);
                    }
                }
                out
            }
        }
    }
}

/// Value of `additionalProperties`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `true` or `false`.
    Bool(bool),
    /// A schema for the extra values.
    Schema(IgnoredAny),
}

/// Value of `items`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Items {
    /// Tuple form (a list of schemas).
    Tuple(Vec<IgnoredAny>),
    /// A single schema applied to every element.
    Schema(IgnoredAny),
}

/// The keyword set of one schema fragment, as written.
///
/// Subschemas are not decoded here; they are addressed by [`Location`] and
/// decoded when the resolver reaches them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// `$ref`.
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    /// `title`.
    pub title: Option<String>,
    /// `description`.
    pub description: Option<String>,
    /// `type`.
    #[serde(rename = "type")]
    pub type_set: Option<TypeSet>,
    /// `properties`, in declaration order.
    pub properties: Option<IndexMap<String, IgnoredAny>>,
    /// `required`.
    pub required: Option<Vec<String>>,
    /// `items`.
    pub items: Option<Items>,
    /// `additionalProperties`.
    pub additional_properties: Option<AdditionalProperties>,
    /// `enum`.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
    /// `const`; present even when the constant is `null`.
    #[serde(rename = "const", default, deserialize_with = "deserialize_present")]
    pub const_value: Option<Value>,
    /// `oneOf`.
    pub one_of: Option<Vec<IgnoredAny>>,
    /// `anyOf`.
    pub any_of: Option<Vec<IgnoredAny>>,
    /// `allOf`.
    pub all_of: Option<Vec<IgnoredAny>>,
}

fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
