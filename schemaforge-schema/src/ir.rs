//! Intermediate representation for code generation.
//!
//! [`TypeGraphBuilder`] walks a resolved [`SchemaGraph`] and synthesizes one
//! [`TypeDescriptor`] per schema identity. Aggregates, named schemas and
//! reference targets get declarations; everything else is inlined at its
//! use site. Declarations are recorded in post-order so that dependencies
//! come before their dependents, except across indirect back-edges.

use crate::error::SchemaError;
use crate::naming::{NamingPolicy, literal_candidate, pascal_case};
use crate::resolver::{Additional, Property, ResolvedSchema, SchemaGraph, SchemaId, SchemaKind};
use crate::types::JsonType;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Scalar target types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// UTF-8 string.
    String,
    /// 64-bit signed integer.
    Integer,
    /// Double precision float.
    Number,
    /// Boolean.
    Boolean,
    /// The unit value, for `null`.
    Null,
}

impl Primitive {
    /// Maps a scalar JSON type; `None` for object and array.
    #[must_use]
    pub const fn from_json_type(ty: JsonType) -> Option<Self> {
        match ty {
            JsonType::String => Some(Self::String),
            JsonType::Integer => Some(Self::Integer),
            JsonType::Number => Some(Self::Number),
            JsonType::Boolean => Some(Self::Boolean),
            JsonType::Null => Some(Self::Null),
            JsonType::Object | JsonType::Array => None,
        }
    }
}

/// Use of a declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedRef {
    /// Identity of the declaration.
    pub id: SchemaId,
    /// Declared name.
    pub name: String,
    /// True for a cycle back-edge; the use must go through a pointer.
    pub indirect: bool,
}

/// One struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Generated identifier.
    pub name: String,
    /// JSON key on the wire.
    pub key: String,
    /// Field type, including any `Optional` wrapper.
    pub ty: TypeDescriptor,
    /// Whether the key must be present.
    pub required: bool,
    /// Whether the value may be `null`.
    pub nullable: bool,
    /// True for the catch-all map of extra keys.
    pub flatten: bool,
    /// The wrapped type accepts `null` itself, so a present `null` must
    /// decode to `Some` rather than `None`.
    pub admits_null: bool,
    /// Description of the property schema.
    pub description: Option<String>,
}

/// A struct declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    /// Type name.
    pub name: String,
    /// Fields in property order.
    pub fields: Vec<FieldDef>,
    /// Reject keys not listed in the fields.
    pub deny_unknown_fields: bool,
    /// Schema description.
    pub description: Option<String>,
}

/// One enum literal.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    /// Variant identifier.
    pub name: String,
    /// Literal in its original JSON type.
    pub value: Value,
}

/// A closed set of literals.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    /// Type name.
    pub name: String,
    /// Literals in declaration order.
    pub variants: Vec<EnumVariant>,
    /// Schema description.
    pub description: Option<String>,
}

/// One alternative of a sum type.
#[derive(Debug, Clone, PartialEq)]
pub struct SumVariant {
    /// Variant identifier.
    pub name: String,
    /// Payload type.
    pub ty: TypeDescriptor,
}

/// Alternatives tried in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct SumTypeDef {
    /// Type name.
    pub name: String,
    /// Variants in declaration order.
    pub variants: Vec<SumVariant>,
    /// Schema description.
    pub description: Option<String>,
}

/// A name given to an inline type.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasDef {
    /// Type name.
    pub name: String,
    /// Aliased type.
    pub target: Box<TypeDescriptor>,
    /// Declare a transparent wrapper instead of a plain alias. Used for
    /// containers, which may refer to themselves.
    pub transparent: bool,
    /// Schema description.
    pub description: Option<String>,
}

/// Synthesized type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// Record with named fields.
    Struct(StructDef),
    /// Homogeneous list.
    Slice(Box<TypeDescriptor>),
    /// String-keyed map.
    Map(Box<TypeDescriptor>),
    /// Possibly absent value.
    Optional(Box<TypeDescriptor>),
    /// Closed literal set.
    Enum(EnumDef),
    /// Untagged alternatives.
    SumType(SumTypeDef),
    /// Scalar.
    Primitive(Primitive),
    /// Any JSON value.
    Dynamic,
    /// Use of a declaration.
    NamedReference(NamedRef),
    /// Named inline type.
    Alias(AliasDef),
}

impl TypeDescriptor {
    /// Declared name, for declaration variants.
    #[must_use]
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Self::Struct(def) => Some(&def.name),
            Self::Enum(def) => Some(&def.name),
            Self::SumType(def) => Some(&def.name),
            Self::Alias(def) => Some(&def.name),
            _ => None,
        }
    }

    /// Returns true for inline containers with a natural empty value.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Slice(_) | Self::Map(_))
    }

    fn optional(self) -> Self {
        match self {
            Self::Optional(_) => self,
            other => Self::Optional(Box::new(other)),
        }
    }
}

/// Ordered declarations of one compilation.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    descriptors: HashMap<SchemaId, TypeDescriptor>,
    order: Vec<SchemaId>,
}

impl TypeGraph {
    /// Builds the type graph with default options.
    ///
    /// # Errors
    /// Returns `SchemaError` on naming collisions.
    pub fn build(graph: &SchemaGraph) -> Result<Self, SchemaError> {
        TypeGraphBuilder::new(graph).build()
    }

    /// Descriptor synthesized for an identity: the declaration for declared
    /// identities, the inline type otherwise.
    #[must_use]
    pub fn descriptor(&self, id: SchemaId) -> Option<&TypeDescriptor> {
        self.descriptors.get(&id)
    }

    /// Declared identities in declaration order.
    #[must_use]
    pub fn order(&self) -> &[SchemaId] {
        &self.order
    }

    /// Declarations in order.
    pub fn declarations(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.order.iter().filter_map(|id| self.descriptors.get(id))
    }

    /// Number of identities with a descriptor.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if nothing was synthesized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Visit {
    InProgress,
    Done(TypeDescriptor),
}

/// Synthesizes a [`TypeGraph`] from a [`SchemaGraph`].
#[derive(Debug)]
pub struct TypeGraphBuilder<'g> {
    graph: &'g SchemaGraph,
    names: NamingPolicy,
    root_name: String,
    visits: HashMap<SchemaId, Visit>,
    declared_names: HashMap<SchemaId, String>,
    descriptors: HashMap<SchemaId, TypeDescriptor>,
    order: Vec<SchemaId>,
}

impl<'g> TypeGraphBuilder<'g> {
    /// Creates a builder over a resolved graph.
    #[must_use]
    pub fn new(graph: &'g SchemaGraph) -> Self {
        Self {
            graph,
            names: NamingPolicy::for_types(),
            root_name: "Root".to_string(),
            visits: HashMap::new(),
            declared_names: HashMap::new(),
            descriptors: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Sets the name used for untitled roots without a file stem.
    #[must_use]
    pub fn root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Replaces the type naming policy.
    #[must_use]
    pub fn naming(mut self, names: NamingPolicy) -> Self {
        self.names = names;
        self
    }

    /// Visits every root, then every definition entry.
    ///
    /// # Errors
    /// Returns `SchemaError::NamingCollision` if a name cannot be allocated.
    pub fn build(mut self) -> Result<TypeGraph, SchemaError> {
        let graph = self.graph;
        for &id in graph.roots() {
            self.visit(id, None)?;
        }
        for &id in graph.definitions() {
            self.visit(id, None)?;
        }
        tracing::debug!(
            identities = self.descriptors.len(),
            declarations = self.order.len(),
            "built type graph"
        );
        Ok(TypeGraph {
            descriptors: self.descriptors,
            order: self.order,
        })
    }

    /// Synthesizes `id` and returns the type to use at the referring site.
    fn visit(&mut self, id: SchemaId, path: Option<&str>) -> Result<TypeDescriptor, SchemaError> {
        let graph = self.graph;
        let schema = graph.schema(id);

        match self.visits.get(&id) {
            Some(Visit::Done(use_ty)) => return Ok(use_ty.clone()),
            Some(Visit::InProgress) => {
                let Some(name) = self.declared_names.get(&id) else {
                    return Err(SchemaError::invalid_keywords(
                        &schema.location,
                        "recursive schema has no declaration",
                    ));
                };
                tracing::debug!(id = %id, name = %name, "breaking cycle with indirect reference");
                return Ok(TypeDescriptor::NamedReference(NamedRef {
                    id,
                    name: name.clone(),
                    indirect: true,
                }));
            }
            None => {}
        }

        let declared = needs_declaration(schema);
        let name = if declared {
            let candidate = self.candidate(schema, path);
            let name = self.names.claim(&candidate)?;
            self.declared_names.insert(id, name.clone());
            Some(name)
        } else {
            None
        };
        self.visits.insert(id, Visit::InProgress);

        let context = name
            .clone()
            .or_else(|| path.map(str::to_string))
            .unwrap_or_else(|| self.root_name.clone());
        let body = self.synthesize(schema, &context)?;

        let use_ty = match name {
            Some(name) => {
                let declaration = match body {
                    TypeDescriptor::Struct(_) | TypeDescriptor::Enum(_) | TypeDescriptor::SumType(_) => body,
                    target => TypeDescriptor::Alias(AliasDef {
                        name: name.clone(),
                        transparent: target.is_container(),
                        target: Box::new(target),
                        description: schema.description.clone(),
                    }),
                };
                tracing::debug!(id = %id, name = %name, "declared type");
                self.descriptors.insert(id, declaration);
                self.order.push(id);
                TypeDescriptor::NamedReference(NamedRef {
                    id,
                    name,
                    indirect: false,
                })
            }
            None => {
                self.descriptors.insert(id, body.clone());
                body
            }
        };
        self.visits.insert(id, Visit::Done(use_ty.clone()));
        Ok(use_ty)
    }

    /// Type of an edge at a use site, with `null` folded into `Optional`.
    fn use_type(&mut self, id: SchemaId, path: &str) -> Result<TypeDescriptor, SchemaError> {
        let ty = self.visit(id, Some(path))?;
        if self.graph.schema(id).nullable {
            Ok(ty.optional())
        } else {
            Ok(ty)
        }
    }

    /// Returns true if the type synthesized for `id` accepts `null` as one
    /// of its own values.
    fn admits_null(&self, id: SchemaId, seen: &mut HashSet<SchemaId>) -> bool {
        if !seen.insert(id) {
            return false;
        }
        let schema = self.graph.schema(id);
        if schema.nullable {
            return true;
        }
        match &schema.kind {
            SchemaKind::Any | SchemaKind::Primitive(JsonType::Null) => true,
            SchemaKind::Enum { values } => values.contains(&Value::Null),
            SchemaKind::Union { variants } => variants
                .iter()
                .any(|edge| self.admits_null(edge.target, seen)),
            _ => false,
        }
    }

    fn candidate(&self, schema: &ResolvedSchema, path: Option<&str>) -> String {
        if let Some(title) = schema.title.as_deref().filter(|t| !t.trim().is_empty()) {
            return title.to_string();
        }
        if let Some(key) = schema.definition_key() {
            return key;
        }
        if schema.root {
            if let Some(stem) = self.graph.document_stem(schema.location.document) {
                return stem.to_string();
            }
            return self.root_name.clone();
        }
        path.map_or_else(|| self.root_name.clone(), str::to_string)
    }

    fn synthesize(&mut self, schema: &ResolvedSchema, context: &str) -> Result<TypeDescriptor, SchemaError> {
        let ty = match &schema.kind {
            SchemaKind::Any => TypeDescriptor::Dynamic,
            SchemaKind::Primitive(ty) => {
                Primitive::from_json_type(*ty).map_or(TypeDescriptor::Dynamic, TypeDescriptor::Primitive)
            }
            SchemaKind::Array { items } => {
                let item = match items {
                    Some(edge) => self.use_type(edge.target, &format!("{context}Item"))?,
                    None => TypeDescriptor::Dynamic,
                };
                TypeDescriptor::Slice(Box::new(item))
            }
            SchemaKind::Object {
                properties,
                additional,
            } => {
                if properties.is_empty() && !matches!(additional, Additional::Forbidden) {
                    let value = match additional {
                        Additional::Schema(edge) => {
                            self.use_type(edge.target, &format!("{context}Value"))?
                        }
                        _ => TypeDescriptor::Dynamic,
                    };
                    TypeDescriptor::Map(Box::new(value))
                } else {
                    self.synthesize_struct(schema, properties, additional, context)?
                }
            }
            SchemaKind::Enum { values } => {
                let mut variant_names = NamingPolicy::for_variants();
                let mut variants = Vec::with_capacity(values.len());
                for value in values {
                    if variants.iter().any(|v: &EnumVariant| &v.value == value) {
                        continue;
                    }
                    variants.push(EnumVariant {
                        name: variant_names.claim(&literal_candidate(value))?,
                        value: value.clone(),
                    });
                }
                TypeDescriptor::Enum(EnumDef {
                    name: context.to_string(),
                    variants,
                    description: schema.description.clone(),
                })
            }
            SchemaKind::Union { variants: edges } => {
                let mut variant_names = NamingPolicy::for_variants();
                let mut variants = Vec::with_capacity(edges.len());
                for (i, edge) in edges.iter().enumerate() {
                    let ty = self.use_type(edge.target, &format!("{context}Variant{}", i + 1))?;
                    variants.push(SumVariant {
                        name: variant_names.claim(&variant_candidate(&ty))?,
                        ty,
                    });
                }
                TypeDescriptor::SumType(SumTypeDef {
                    name: context.to_string(),
                    variants,
                    description: schema.description.clone(),
                })
            }
        };
        Ok(ty)
    }

    fn synthesize_struct(
        &mut self,
        schema: &ResolvedSchema,
        properties: &[Property],
        additional: &Additional,
        context: &str,
    ) -> Result<TypeDescriptor, SchemaError> {
        let graph = self.graph;
        let mut field_names = NamingPolicy::for_fields();
        let mut fields = Vec::with_capacity(properties.len() + 1);

        for property in properties {
            let path = format!("{context}{}", pascal_case(&property.key));
            let mut ty = self.use_type(property.schema.target, &path)?;
            let target = graph.schema(property.schema.target);
            let container = ty.is_container()
                || (matches!(ty, TypeDescriptor::NamedReference(_)) && synthesizes_container(target));
            if !property.required && !container {
                ty = ty.optional();
            }
            let admits_null = matches!(ty, TypeDescriptor::Optional(_))
                && !target.nullable
                && self.admits_null(property.schema.target, &mut HashSet::new());
            fields.push(FieldDef {
                name: field_names.claim(&property.key)?,
                key: property.key.clone(),
                ty,
                required: property.required,
                nullable: target.nullable,
                flatten: false,
                admits_null,
                description: target.description.clone(),
            });
        }

        if let Additional::Schema(edge) = additional {
            let value = self.use_type(edge.target, &format!("{context}Value"))?;
            fields.push(FieldDef {
                name: field_names.claim("additional_properties")?,
                key: String::new(),
                ty: TypeDescriptor::Map(Box::new(value)),
                required: false,
                nullable: false,
                flatten: true,
                admits_null: false,
                description: None,
            });
        }

        Ok(TypeDescriptor::Struct(StructDef {
            name: context.to_string(),
            fields,
            deny_unknown_fields: matches!(additional, Additional::Forbidden),
            description: schema.description.clone(),
        }))
    }
}

/// Returns true if the schema synthesizes to a list or a map.
fn synthesizes_container(schema: &ResolvedSchema) -> bool {
    match &schema.kind {
        SchemaKind::Array { .. } => true,
        SchemaKind::Object { properties, additional } => {
            properties.is_empty() && !matches!(additional, Additional::Forbidden)
        }
        _ => false,
    }
}

/// Returns true if the schema gets a declaration of its own.
fn needs_declaration(schema: &ResolvedSchema) -> bool {
    match &schema.kind {
        SchemaKind::Object { properties, additional } => {
            !properties.is_empty() || matches!(additional, Additional::Forbidden) || schema.is_named()
        }
        SchemaKind::Enum { .. } | SchemaKind::Union { .. } => true,
        SchemaKind::Any | SchemaKind::Primitive(_) | SchemaKind::Array { .. } => schema.is_named(),
    }
}

/// Variant name candidate derived from the payload type.
fn variant_candidate(ty: &TypeDescriptor) -> String {
    match ty {
        TypeDescriptor::NamedReference(named) => named.name.clone(),
        TypeDescriptor::Primitive(Primitive::String) => "String".to_string(),
        TypeDescriptor::Primitive(Primitive::Integer) => "Integer".to_string(),
        TypeDescriptor::Primitive(Primitive::Number) => "Number".to_string(),
        TypeDescriptor::Primitive(Primitive::Boolean) => "Boolean".to_string(),
        TypeDescriptor::Primitive(Primitive::Null) => "Null".to_string(),
        TypeDescriptor::Slice(_) => "Array".to_string(),
        TypeDescriptor::Map(_) => "Object".to_string(),
        TypeDescriptor::Optional(inner) => variant_candidate(inner),
        TypeDescriptor::Dynamic => "Any".to_string(),
        other => other.declared_name().unwrap_or("Variant").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SchemaDocument;
    use serde_json::json;

    fn build(value: Value) -> TypeGraph {
        let doc = SchemaDocument::new("-", value);
        let graph = SchemaGraph::resolve(&[doc]).expect("Failed to resolve");
        TypeGraph::build(&graph).expect("Failed to build")
    }

    fn declared(graph: &TypeGraph) -> Vec<String> {
        graph
            .declarations()
            .filter_map(|d| d.declared_name().map(str::to_string))
            .collect()
    }

    fn find_struct<'a>(graph: &'a TypeGraph, name: &str) -> &'a StructDef {
        graph
            .declarations()
            .find_map(|d| match d {
                TypeDescriptor::Struct(def) if def.name == name => Some(def),
                _ => None,
            })
            .unwrap_or_else(|| panic!("struct {name} not declared"))
    }

    #[test]
    fn test_required_and_optional_fields() {
        let graph = build(json!({
            "type": "object",
            "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
            "required": ["name"]
        }));
        assert_eq!(declared(&graph), vec!["Root"]);
        let root = find_struct(&graph, "Root");
        assert_eq!(root.fields[0].ty, TypeDescriptor::Primitive(Primitive::String));
        assert_eq!(
            root.fields[1].ty,
            TypeDescriptor::Optional(Box::new(TypeDescriptor::Primitive(Primitive::Integer)))
        );
    }

    #[test]
    fn test_containers_are_not_wrapped() {
        let graph = build(json!({
            "title": "Bag",
            "properties": {
                "tags": {"type": "array", "items": {"type": "string"}},
                "extra": {"type": "object"}
            }
        }));
        let bag = find_struct(&graph, "Bag");
        assert!(matches!(bag.fields[0].ty, TypeDescriptor::Slice(_)));
        assert!(matches!(bag.fields[1].ty, TypeDescriptor::Map(_)));
    }

    #[test]
    fn test_nested_struct_path_name() {
        let graph = build(json!({
            "title": "Person",
            "properties": {
                "home_address": {"properties": {"street": {"type": "string"}}}
            }
        }));
        assert_eq!(declared(&graph), vec!["PersonHomeAddress", "Person"]);
    }

    #[test]
    fn test_reference_dedup() {
        let graph = build(json!({
            "title": "Person",
            "properties": {
                "home": {"$ref": "#/definitions/Address"},
                "work": {"$ref": "#/definitions/Address"}
            },
            "definitions": {
                "Address": {"properties": {"street": {"type": "string"}}}
            }
        }));
        assert_eq!(declared(&graph), vec!["Address", "Person"]);
        let person = find_struct(&graph, "Person");
        for field in &person.fields {
            let TypeDescriptor::Optional(inner) = &field.ty else {
                panic!("expected optional");
            };
            assert!(matches!(inner.as_ref(), TypeDescriptor::NamedReference(r) if r.name == "Address" && !r.indirect));
        }
    }

    #[test]
    fn test_self_reference_is_indirect() {
        let graph = build(json!({
            "title": "Node",
            "properties": {
                "children": {"type": "array", "items": {"$ref": "#"}},
                "parent": {"$ref": "#"}
            }
        }));
        assert_eq!(declared(&graph), vec!["Node"]);
        let node = find_struct(&graph, "Node");
        let TypeDescriptor::Slice(item) = &node.fields[0].ty else {
            panic!("expected slice");
        };
        assert!(matches!(item.as_ref(), TypeDescriptor::NamedReference(r) if r.indirect));
        let TypeDescriptor::Optional(parent) = &node.fields[1].ty else {
            panic!("expected optional");
        };
        assert!(matches!(parent.as_ref(), TypeDescriptor::NamedReference(r) if r.indirect));
    }

    #[test]
    fn test_enum_literals() {
        let graph = build(json!({
            "title": "Status",
            "enum": ["active", "in-active", 3, null, "active"]
        }));
        let Some(TypeDescriptor::Enum(def)) = graph.declarations().next() else {
            panic!("expected enum");
        };
        let names: Vec<_> = def.variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Active", "InActive", "V3", "Null"]);
        assert_eq!(def.variants[2].value, json!(3));
    }

    #[test]
    fn test_one_of_sum_type() {
        let graph = build(json!({
            "title": "Shape",
            "oneOf": [
                {"title": "Circle", "properties": {"r": {"type": "number"}}, "required": ["r"]},
                {"type": "string"},
                {"type": "array"}
            ]
        }));
        assert_eq!(declared(&graph), vec!["Circle", "Shape"]);
        let Some(TypeDescriptor::SumType(def)) = graph.declarations().last() else {
            panic!("expected sum type");
        };
        let names: Vec<_> = def.variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Circle", "String", "Array"]);
    }

    #[test]
    fn test_named_aliases() {
        let graph = build(json!({
            "title": "Doc",
            "properties": {"id": {"$ref": "#/definitions/Id"}, "tags": {"$ref": "#/definitions/Tags"}},
            "definitions": {
                "Id": {"type": "string"},
                "Tags": {"type": "array", "items": {"type": "string"}}
            }
        }));
        let aliases: Vec<_> = graph
            .declarations()
            .filter_map(|d| match d {
                TypeDescriptor::Alias(def) => Some((def.name.as_str(), def.transparent)),
                _ => None,
            })
            .collect();
        assert_eq!(aliases, vec![("Id", false), ("Tags", true)]);
    }

    #[test]
    fn test_nullable_required_field() {
        let graph = build(json!({
            "title": "Note",
            "properties": {"text": {"type": ["string", "null"]}},
            "required": ["text"]
        }));
        let note = find_struct(&graph, "Note");
        let field = &note.fields[0];
        assert!(field.required && field.nullable);
        assert!(matches!(field.ty, TypeDescriptor::Optional(_)));
    }

    #[test]
    fn test_additional_properties_field() {
        let graph = build(json!({
            "title": "Labels",
            "properties": {"name": {"type": "string"}},
            "additionalProperties": {"type": "string"}
        }));
        let labels = find_struct(&graph, "Labels");
        let extra = &labels.fields[1];
        assert!(extra.flatten);
        assert_eq!(extra.name, "additional_properties");
        assert!(matches!(extra.ty, TypeDescriptor::Map(_)));
    }

    #[test]
    fn test_name_collisions_across_roots() {
        let a = SchemaDocument::new("-", json!({"title": "Item", "properties": {"a": {}}}));
        let b = SchemaDocument::new("-", json!({"title": "Item", "properties": {"b": {}}}));
        let graph = SchemaGraph::resolve(&[a, b]).expect("resolve");
        let types = TypeGraph::build(&graph).expect("build");
        assert_eq!(declared(&types), vec!["Item", "Item2"]);
    }

    #[test]
    fn test_document_stem_names_root() {
        let doc = SchemaDocument::new("schemas/user-profile.json", json!({"properties": {"a": {}}}));
        let graph = SchemaGraph::resolve(&[doc]).expect("resolve");
        let types = TypeGraph::build(&graph).expect("build");
        assert_eq!(declared(&types), vec!["UserProfile"]);
    }

    #[test]
    fn test_optional_field_admitting_null() {
        let graph = build(json!({
            "title": "Person",
            "properties": {
                "status": {"$ref": "#/definitions/Status"},
                "anything": {},
                "nothing": {"type": "null"},
                "nickname": {"type": ["string", "null"]},
                "name": {"type": "string"}
            },
            "definitions": {"Status": {"enum": ["active", null]}}
        }));
        let person = find_struct(&graph, "Person");
        let flags: Vec<_> = person.fields.iter().map(|f| (f.name.as_str(), f.admits_null)).collect();
        assert_eq!(
            flags,
            vec![
                ("status", true),
                ("anything", true),
                ("nothing", true),
                ("nickname", false),
                ("name", false)
            ]
        );
    }

    #[test]
    fn test_sum_type_with_null_variant_admits_null() {
        let graph = build(json!({
            "title": "Cell",
            "properties": {"value": {"oneOf": [{"type": "integer"}, {"type": "null"}]}}
        }));
        let cell = find_struct(&graph, "Cell");
        assert!(cell.fields[0].admits_null);
    }

    #[test]
    fn test_named_container_reference_is_not_wrapped() {
        let graph = build(json!({
            "title": "Post",
            "properties": {
                "tags": {"$ref": "#/definitions/Tags"},
                "meta": {"$ref": "#/definitions/Meta"},
                "inline": {"type": "array", "items": {"type": "string"}}
            },
            "definitions": {
                "Tags": {"type": "array", "items": {"type": "string"}},
                "Meta": {"type": "object", "additionalProperties": {"type": "string"}}
            }
        }));
        let post = find_struct(&graph, "Post");
        assert!(matches!(&post.fields[0].ty, TypeDescriptor::NamedReference(r) if r.name == "Tags"));
        assert!(matches!(&post.fields[1].ty, TypeDescriptor::NamedReference(r) if r.name == "Meta"));
        assert!(matches!(post.fields[2].ty, TypeDescriptor::Slice(_)));
    }

    #[test]
    fn test_property_named_definitions_declares_nothing_extra() {
        let graph = build(json!({
            "title": "Catalog",
            "properties": {"definitions": {"type": "array", "items": {"type": "string"}}}
        }));
        assert_eq!(declared(&graph), vec!["Catalog"]);
        let catalog = find_struct(&graph, "Catalog");
        assert_eq!(
            catalog.fields[0].ty,
            TypeDescriptor::Slice(Box::new(TypeDescriptor::Primitive(Primitive::String)))
        );
    }
}
