//! Prelude module for convenient imports.
//!
//! ```ignore
//! use schemaforge::prelude::*;
//! ```

pub use crate::compile_documents;

// Schema front end
pub use schemaforge_schema::{
    NamingPolicy, ParseError, SchemaDocument, SchemaError, SchemaGraph, TypeDescriptor, TypeGraph,
    TypeGraphBuilder, parse_document,
};

// Code generation
pub use schemaforge_codegen::{CodegenError, Generator, GeneratorConfig, write_if_changed};
