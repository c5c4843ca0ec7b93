//! Reference and composition resolution.
//!
//! [`SchemaGraph::resolve`] walks every root document, follows `$ref`
//! pointers, flattens `allOf` and stores one [`ResolvedSchema`] per
//! distinct target location in an arena addressed by [`SchemaId`]. Two
//! references to the same definition share one id. An id is registered
//! before its children are resolved, so a reference back into a schema
//! that is still being resolved yields an edge tagged as a back-edge
//! instead of recursing.

use crate::error::SchemaError;
use crate::parser::{parse_node, split_reference};
use crate::types::{JsonType, Location, SchemaDocument, SchemaNode};
use crate::validation::{AdditionalKeyword, Keywords, Shape, classify};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Stable identity of a resolved schema inside a [`SchemaGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub usize);

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A reference from one resolved schema to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Target schema.
    pub target: SchemaId,
    /// True if the edge closes a cycle in resolution order.
    pub back_edge: bool,
}

/// One property of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// JSON key.
    pub key: String,
    /// Property schema.
    pub schema: Edge,
    /// Whether the key is listed in `required`.
    pub required: bool,
}

/// Treatment of keys not listed in `properties`.
#[derive(Debug, Clone, PartialEq)]
pub enum Additional {
    /// Extra keys of any value are allowed.
    Allowed,
    /// Extra keys are rejected.
    Forbidden,
    /// Extra keys must match the schema.
    Schema(Edge),
}

/// Shape of a resolved schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    /// Accepts any JSON value.
    Any,
    /// A scalar.
    Primitive(JsonType),
    /// An object.
    Object {
        /// Declared properties in order.
        properties: Vec<Property>,
        /// Extra-key policy.
        additional: Additional,
    },
    /// An array.
    Array {
        /// Element schema, if declared.
        items: Option<Edge>,
    },
    /// A closed set of literals.
    Enum {
        /// Literal values in declaration order.
        values: Vec<Value>,
    },
    /// Alternatives, `oneOf` members first.
    Union {
        /// Variant schemas in declaration order.
        variants: Vec<Edge>,
    },
}

/// A schema after reference dereferencing and `allOf` merging.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    /// Identity.
    pub id: SchemaId,
    /// Canonical location.
    pub location: Location,
    /// `title`.
    pub title: Option<String>,
    /// `description`.
    pub description: Option<String>,
    /// Shape.
    pub kind: SchemaKind,
    /// True if `null` is admitted besides the shape.
    pub nullable: bool,
    /// True if some `$ref` points here.
    pub referenced: bool,
    /// True if this is a document root.
    pub root: bool,
    /// Key of the `definitions`/`$defs` entry this schema was declared as.
    pub definition: Option<String>,
}

impl ResolvedSchema {
    /// Definition key if the schema lives under `definitions` or `$defs`.
    #[must_use]
    pub fn definition_key(&self) -> Option<String> {
        self.definition.clone()
    }

    /// Returns true if the schema deserves a declaration of its own even
    /// when its shape would otherwise be inlined.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.root || self.referenced || self.definition.is_some()
    }
}

/// Arena of resolved schemas for one compilation.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    schemas: Vec<ResolvedSchema>,
    roots: Vec<SchemaId>,
    definitions: Vec<SchemaId>,
    stems: Vec<Option<String>>,
}

impl SchemaGraph {
    /// Resolves an ordered sequence of documents.
    ///
    /// # Errors
    /// Returns `SchemaError` for dangling references, reference loops,
    /// invalid `allOf` composition and contradictory keywords.
    pub fn resolve(documents: &[SchemaDocument]) -> Result<Self, SchemaError> {
        let mut resolver = Resolver::new(documents);

        for index in 0..documents.len() {
            let edge = resolver.resolve_at(Location::root(index))?;
            resolver.schemas[edge.target.0].root = true;
            resolver.roots.push(edge.target);
        }
        for (index, document) in documents.iter().enumerate() {
            for container in ["definitions", "$defs"] {
                let Some(Value::Object(entries)) = document.root.get(container) else {
                    continue;
                };
                let base = Location::root(index).child(container);
                for key in entries.keys() {
                    let entry = base.child(key);
                    let edge = resolver.resolve_at(entry.clone())?;
                    let schema = &mut resolver.schemas[edge.target.0];
                    if schema.location == entry {
                        schema.definition = Some(key.clone());
                    }
                    if !resolver.definitions.contains(&edge.target) {
                        resolver.definitions.push(edge.target);
                    }
                }
            }
        }

        tracing::debug!(
            documents = documents.len(),
            schemas = resolver.schemas.len(),
            "resolved schema graph"
        );
        Ok(Self {
            schemas: resolver.schemas,
            roots: resolver.roots,
            definitions: resolver.definitions,
            stems: documents
                .iter()
                .map(|d| d.stem().map(str::to_string))
                .collect(),
        })
    }

    /// Returns the schema with the given id.
    ///
    /// Ids are only handed out by this graph, so the lookup cannot miss.
    #[must_use]
    pub fn schema(&self, id: SchemaId) -> &ResolvedSchema {
        &self.schemas[id.0]
    }

    /// Root schema ids in document order.
    #[must_use]
    pub fn roots(&self) -> &[SchemaId] {
        &self.roots
    }

    /// Definition entry ids in document order.
    #[must_use]
    pub fn definitions(&self) -> &[SchemaId] {
        &self.definitions
    }

    /// File stem of a document, if it has one.
    #[must_use]
    pub fn document_stem(&self, document: usize) -> Option<&str> {
        self.stems.get(document).and_then(|s| s.as_deref())
    }

    /// Number of resolved schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterates over all schemas in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedSchema> {
        self.schemas.iter()
    }
}

struct Resolver<'a> {
    documents: &'a [SchemaDocument],
    schemas: Vec<ResolvedSchema>,
    index: HashMap<Location, SchemaId>,
    in_progress: HashSet<SchemaId>,
    roots: Vec<SchemaId>,
    definitions: Vec<SchemaId>,
}

impl<'a> Resolver<'a> {
    fn new(documents: &'a [SchemaDocument]) -> Self {
        Self {
            documents,
            schemas: Vec::new(),
            index: HashMap::new(),
            in_progress: HashSet::new(),
            roots: Vec::new(),
            definitions: Vec::new(),
        }
    }

    /// Human-readable label of a location, using the document's own label.
    fn describe(&self, location: &Location) -> String {
        match self.documents.get(location.document) {
            Some(doc) => format!("{}#{}", doc.location, location.pointer),
            None => location.to_string(),
        }
    }

    fn value_at(&self, location: &Location) -> Option<&'a Value> {
        let documents = self.documents;
        documents
            .get(location.document)
            .and_then(|doc| doc.root.pointer(&location.pointer))
    }

    /// Follows `$ref` chains from `location` to the first node that is not
    /// a reference. Returns the canonical location, its keywords and whether
    /// any reference was followed.
    fn dereference(
        &self,
        location: Location,
    ) -> Result<(Location, SchemaNode, bool), SchemaError> {
        let mut current = location;
        let mut seen = HashSet::new();
        let mut followed = false;
        loop {
            let label = self.describe(&current);
            let value = self
                .value_at(&current)
                .ok_or_else(|| SchemaError::malformed(&label, "no schema at this location"))?;
            let node = parse_node(value, &label)?;
            let Some(reference) = node.reference.as_deref() else {
                return Ok((current, node, followed));
            };
            if !seen.insert(current.clone()) {
                return Err(SchemaError::RefLoop { location: label });
            }
            let target = self.locate(reference, &current)?;
            tracing::trace!(from = %label, reference, to = %self.describe(&target), "following $ref");
            current = target;
            followed = true;
        }
    }

    fn locate(&self, reference: &str, referrer: &Location) -> Result<Location, SchemaError> {
        let unresolved = || SchemaError::unresolved(reference, self.describe(referrer));
        let parts = split_reference(reference).ok_or_else(unresolved)?;
        let document = if parts.document.is_empty() {
            referrer.document
        } else {
            self.documents
                .iter()
                .position(|doc| doc.answers_to(parts.document))
                .ok_or_else(unresolved)?
        };
        let target = Location {
            document,
            pointer: parts.pointer,
        };
        if self.value_at(&target).is_none() {
            return Err(unresolved());
        }
        Ok(target)
    }

    fn resolve_at(&mut self, location: Location) -> Result<Edge, SchemaError> {
        let (canonical, node, followed) = self.dereference(location)?;

        if let Some(&id) = self.index.get(&canonical) {
            if followed {
                let schema = &mut self.schemas[id.0];
                schema.referenced = true;
                if schema.definition.is_none() {
                    schema.definition = canonical.definition_key();
                }
            }
            return Ok(Edge {
                target: id,
                back_edge: self.in_progress.contains(&id),
            });
        }

        let id = self.register(canonical.clone());
        if followed {
            let schema = &mut self.schemas[id.0];
            schema.referenced = true;
            schema.definition = canonical.definition_key();
        }
        self.in_progress.insert(id);

        let label = self.describe(&canonical);
        let mut stack = vec![canonical.clone()];
        let keywords = self.collect(&node, &canonical, &mut stack)?;
        let class = classify(&keywords, &label)?;
        tracing::debug!(location = %label, id = %id, shape = ?class.shape, nullable = class.nullable, "resolving schema");

        let kind = match &class.shape {
            Shape::TypeUnion(types) => {
                let mut variants = Vec::with_capacity(types.len());
                for (i, ty) in types.iter().enumerate() {
                    let at = canonical.child("type").index(i);
                    let variant = self.register(at);
                    let shape = match ty {
                        JsonType::Object => Shape::Object,
                        JsonType::Array => Shape::Array,
                        scalar => Shape::Primitive(*scalar),
                    };
                    let kind = self.build_kind(&shape, &keywords, &canonical)?;
                    self.schemas[variant.0].kind = kind;
                    variants.push(Edge {
                        target: variant,
                        back_edge: false,
                    });
                }
                SchemaKind::Union { variants }
            }
            shape => self.build_kind(shape, &keywords, &canonical)?,
        };

        let schema = &mut self.schemas[id.0];
        schema.kind = kind;
        schema.nullable = class.nullable;
        schema.title = keywords.title;
        schema.description = keywords.description;
        self.in_progress.remove(&id);
        Ok(Edge {
            target: id,
            back_edge: false,
        })
    }

    fn register(&mut self, location: Location) -> SchemaId {
        let id = SchemaId(self.schemas.len());
        self.index.insert(location.clone(), id);
        self.schemas.push(ResolvedSchema {
            id,
            location,
            title: None,
            description: None,
            kind: SchemaKind::Any,
            nullable: false,
            referenced: false,
            root: false,
            definition: None,
        });
        id
    }

    /// Gathers the keywords of a node with its `allOf` members folded in.
    fn collect(
        &self,
        node: &SchemaNode,
        at: &Location,
        stack: &mut Vec<Location>,
    ) -> Result<Keywords, SchemaError> {
        let mut keywords = Keywords::from_node(node, at);
        let Some(members) = &node.all_of else {
            return Ok(keywords);
        };
        let label = self.describe(at);
        let base = at.child("allOf");
        for i in 0..members.len() {
            let (member_at, member, _) = self.dereference(base.index(i))?;
            if stack.contains(&member_at) {
                return Err(SchemaError::CyclicAllOf { location: label });
            }
            stack.push(member_at.clone());
            let merged = self.collect(&member, &member_at, stack)?;
            stack.pop();
            keywords.merge(merged, &label)?;
        }
        Ok(keywords)
    }

    fn build_kind(
        &mut self,
        shape: &Shape,
        keywords: &Keywords,
        at: &Location,
    ) -> Result<SchemaKind, SchemaError> {
        let kind = match shape {
            Shape::Any => SchemaKind::Any,
            Shape::Primitive(ty) => SchemaKind::Primitive(*ty),
            Shape::Enum => SchemaKind::Enum {
                values: keywords.literals.clone().unwrap_or_default(),
            },
            Shape::Union => {
                let mut variants = Vec::new();
                let members = keywords.one_of.iter().chain(keywords.any_of.iter());
                for location in members.flatten() {
                    variants.push(self.resolve_at(location.clone())?);
                }
                SchemaKind::Union { variants }
            }
            Shape::Array => {
                if keywords.tuple_items {
                    tracing::warn!(location = %self.describe(at), "tuple-form items are not supported, elements are left untyped");
                }
                let items = match &keywords.items {
                    Some(location) => Some(self.resolve_at(location.clone())?),
                    None => None,
                };
                SchemaKind::Array { items }
            }
            Shape::Object => {
                let mut properties = Vec::with_capacity(keywords.properties.len());
                for (key, location) in &keywords.properties {
                    let schema = self.resolve_at(location.clone())?;
                    properties.push(Property {
                        key: key.clone(),
                        schema,
                        required: keywords.required.contains(key),
                    });
                }
                let additional = match &keywords.additional {
                    None | Some(AdditionalKeyword::Bool(true)) => Additional::Allowed,
                    Some(AdditionalKeyword::Bool(false)) => Additional::Forbidden,
                    Some(AdditionalKeyword::Schema(location)) => {
                        Additional::Schema(self.resolve_at(location.clone())?)
                    }
                };
                SchemaKind::Object {
                    properties,
                    additional,
                }
            }
            Shape::TypeUnion(_) => {
                return Err(SchemaError::invalid_keywords(
                    self.describe(at),
                    "nested type list",
                ));
            }
        };
        Ok(kind)
    }
}
