//! Keyword merging and shape classification.
//!
//! The resolver collects a [`Keywords`] set for every schema identity,
//! folding `allOf` members into it, and then asks [`classify`] which shape
//! the keywords describe. Contradictory combinations are rejected here.

use crate::error::SchemaError;
use crate::types::{AdditionalProperties, Items, JsonType, Location, SchemaNode};
use indexmap::IndexMap;
use serde_json::Value;

/// `additionalProperties` with its subschema located.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalKeyword {
    /// Boolean form.
    Bool(bool),
    /// Schema form.
    Schema(Location),
}

/// Keyword set of one schema with every subschema addressed by location.
#[derive(Debug, Clone, Default)]
pub struct Keywords {
    /// `title`.
    pub title: Option<String>,
    /// `description`.
    pub description: Option<String>,
    /// `type`, deduplicated.
    pub types: Option<Vec<JsonType>>,
    /// `properties`, in declaration order.
    pub properties: IndexMap<String, Location>,
    /// `required`, deduplicated, in declaration order.
    pub required: Vec<String>,
    /// `items` in single-schema form.
    pub items: Option<Location>,
    /// True if `items` used the tuple form.
    pub tuple_items: bool,
    /// `additionalProperties`.
    pub additional: Option<AdditionalKeyword>,
    /// `enum`, or `const` as a one-element list.
    pub literals: Option<Vec<Value>>,
    /// `oneOf` members.
    pub one_of: Option<Vec<Location>>,
    /// `anyOf` members.
    pub any_of: Option<Vec<Location>>,
}

impl Keywords {
    /// Builds the located keyword set of a decoded node.
    #[must_use]
    pub fn from_node(node: &SchemaNode, at: &Location) -> Self {
        let properties = node
            .properties
            .as_ref()
            .map(|props| {
                let base = at.child("properties");
                props.keys().map(|key| (key.clone(), base.child(key))).collect()
            })
            .unwrap_or_default();

        let mut required = Vec::new();
        for name in node.required.iter().flatten() {
            if !required.contains(name) {
                required.push(name.clone());
            }
        }

        let (items, tuple_items) = match &node.items {
            Some(Items::Schema(_)) => (Some(at.child("items")), false),
            Some(Items::Tuple(_)) => (None, true),
            None => (None, false),
        };

        let additional = node.additional_properties.as_ref().map(|ap| match ap {
            AdditionalProperties::Bool(allowed) => AdditionalKeyword::Bool(*allowed),
            AdditionalProperties::Schema(_) => {
                AdditionalKeyword::Schema(at.child("additionalProperties"))
            }
        });

        let literals = match (&node.enum_values, &node.const_value) {
            (Some(values), _) => Some(values.clone()),
            (None, Some(value)) => Some(vec![value.clone()]),
            (None, None) => None,
        };

        let members = |keyword: &str, list: &Option<Vec<serde::de::IgnoredAny>>| {
            list.as_ref().map(|list| {
                let base = at.child(keyword);
                (0..list.len()).map(|i| base.index(i)).collect::<Vec<_>>()
            })
        };

        Self {
            title: node.title.clone(),
            description: node.description.clone(),
            types: node.type_set.as_ref().map(|t| t.to_vec()),
            properties,
            required,
            items,
            tuple_items,
            additional,
            literals,
            one_of: members("oneOf", &node.one_of),
            any_of: members("anyOf", &node.any_of),
        }
    }

    /// Folds an `allOf` member into this set.
    ///
    /// Properties and required names are unioned; the first declaration of
    /// a property wins. Scalar keywords keep the first value seen. Types
    /// are intersected, with `integer` narrowing `number`.
    ///
    /// # Errors
    /// Returns `SchemaError::IncompatibleAllOf` if the types share nothing.
    pub fn merge(&mut self, member: Keywords, location: &str) -> Result<(), SchemaError> {
        self.types = match (self.types.take(), member.types) {
            (Some(left), Some(right)) => {
                let common = intersect_types(&left, &right);
                if common.is_empty() {
                    return Err(SchemaError::IncompatibleAllOf {
                        location: location.to_string(),
                        left: describe_types(&left),
                        right: describe_types(&right),
                    });
                }
                Some(common)
            }
            (left, right) => left.or(right),
        };

        for (key, schema) in member.properties {
            if self.properties.contains_key(&key) {
                tracing::debug!(%location, property = %key, "allOf member property shadowed by earlier declaration");
                continue;
            }
            self.properties.insert(key, schema);
        }
        for name in member.required {
            if !self.required.contains(&name) {
                self.required.push(name);
            }
        }

        self.title = self.title.take().or(member.title);
        self.description = self.description.take().or(member.description);
        if self.items.is_none() && !self.tuple_items {
            self.items = member.items;
            self.tuple_items = member.tuple_items;
        }
        self.additional = self.additional.take().or(member.additional);
        self.literals = self.literals.take().or(member.literals);
        self.one_of = self.one_of.take().or(member.one_of);
        self.any_of = self.any_of.take().or(member.any_of);
        Ok(())
    }
}

fn intersect_types(left: &[JsonType], right: &[JsonType]) -> Vec<JsonType> {
    let mut out = Vec::new();
    for &ty in left {
        let kept = if right.contains(&ty) {
            Some(ty)
        } else if (ty == JsonType::Number && right.contains(&JsonType::Integer))
            || (ty == JsonType::Integer && right.contains(&JsonType::Number))
        {
            Some(JsonType::Integer)
        } else {
            None
        };
        if let Some(kept) = kept
            && !out.contains(&kept)
        {
            out.push(kept);
        }
    }
    out
}

fn describe_types(types: &[JsonType]) -> String {
    let names: Vec<&str> = types.iter().map(|t| t.name()).collect();
    names.join("|")
}

/// Structural shape described by a keyword set.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// No constraining keywords.
    Any,
    /// A scalar type.
    Primitive(JsonType),
    /// An object.
    Object,
    /// An array.
    Array,
    /// A closed set of literals.
    Enum,
    /// `oneOf`/`anyOf` alternatives.
    Union,
    /// A `type` list naming several non-null types.
    TypeUnion(Vec<JsonType>),
}

/// Shape plus whether `null` is also admitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// The shape.
    pub shape: Shape,
    /// True if a `type` list also admits `null`.
    pub nullable: bool,
}

/// Decides which shape a keyword set describes.
///
/// `enum`/`const` take precedence, then `oneOf`/`anyOf`, then `type` and
/// the structural keywords.
///
/// # Errors
/// Returns `SchemaError::InvalidKeywords` for contradictory combinations.
pub fn classify(keywords: &Keywords, location: &str) -> Result<Classification, SchemaError> {
    let declared = keywords.types.clone().unwrap_or_default();
    let non_null: Vec<JsonType> = declared
        .iter()
        .copied()
        .filter(|t| *t != JsonType::Null)
        .collect();
    let nullable = declared.contains(&JsonType::Null) && !non_null.is_empty();

    if let Some(literals) = &keywords.literals {
        if literals.is_empty() {
            return Err(SchemaError::invalid_keywords(location, "enum has no values"));
        }
        return Ok(Classification {
            shape: Shape::Enum,
            nullable: false,
        });
    }

    if keywords.one_of.is_some() || keywords.any_of.is_some() {
        let count = keywords.one_of.as_ref().map_or(0, Vec::len)
            + keywords.any_of.as_ref().map_or(0, Vec::len);
        if count == 0 {
            return Err(SchemaError::invalid_keywords(
                location,
                "oneOf/anyOf has no alternatives",
            ));
        }
        return Ok(Classification {
            shape: Shape::Union,
            nullable,
        });
    }

    if non_null.len() > 1 {
        return Ok(Classification {
            shape: Shape::TypeUnion(non_null),
            nullable,
        });
    }

    let has_items = keywords.items.is_some() || keywords.tuple_items;
    let has_object_keywords = !keywords.properties.is_empty()
        || matches!(keywords.additional, Some(AdditionalKeyword::Schema(_)));
    let single = non_null.first().copied().or_else(|| {
        declared
            .contains(&JsonType::Null)
            .then_some(JsonType::Null)
    });

    if has_items && !matches!(single, None | Some(JsonType::Array)) {
        return Err(SchemaError::invalid_keywords(
            location,
            format!("items requires type array, found {}", describe_types(&declared)),
        ));
    }
    if has_object_keywords && !matches!(single, None | Some(JsonType::Object)) {
        return Err(SchemaError::invalid_keywords(
            location,
            format!(
                "object keywords require type object, found {}",
                describe_types(&declared)
            ),
        ));
    }
    if has_items && has_object_keywords {
        return Err(SchemaError::invalid_keywords(
            location,
            "items and properties cannot describe the same value",
        ));
    }

    let shape = match single {
        Some(JsonType::Object) => Shape::Object,
        Some(JsonType::Array) => Shape::Array,
        Some(scalar) => Shape::Primitive(scalar),
        None if has_object_keywords => Shape::Object,
        None if has_items => Shape::Array,
        None => Shape::Any,
    };
    Ok(Classification { shape, nullable })
}
