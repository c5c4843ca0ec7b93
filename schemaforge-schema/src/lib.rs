//! # schemaforge Schema
//!
//! JSON Schema front end of the schemaforge compiler.
//!
//! This crate provides:
//! - Decoding of schema documents and fragments
//! - `$ref` resolution and `allOf` flattening into a shared schema graph
//! - Identifier sanitization and deduplication
//! - The type graph consumed by code generation

pub mod error;
pub mod ir;
pub mod naming;
pub mod parser;
pub mod resolver;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use ir::{
    AliasDef, EnumDef, EnumVariant, FieldDef, NamedRef, Primitive, StructDef, SumTypeDef,
    SumVariant, TypeDescriptor, TypeGraph, TypeGraphBuilder,
};
pub use naming::{Case, NamingPolicy};
pub use parser::parse_document;
pub use resolver::{Additional, Edge, Property, ResolvedSchema, SchemaGraph, SchemaId, SchemaKind};
pub use types::{JsonType, Location, SchemaDocument, SchemaNode};
