//! # schemaforge
//!
//! Compile JSON Schema documents into serde-annotated Rust types.
//!
//! schemaforge resolves `$ref` pointers and `allOf` composition into a
//! shared schema graph, synthesizes one type per distinct schema, and emits
//! structs, literal enums and untagged sum types that marshal to and from
//! JSON conforming to the schemas.
//!
//! ## Features
//!
//! - **Reference sharing** - Two references to one definition produce one type
//! - **Cycle handling** - Recursive schemas compile through `Box` indirection
//! - **Deterministic output** - Identical input yields byte-identical code
//! - **Idempotent writes** - Unchanged output leaves files untouched
//!
//! ## Quick Start
//!
//! ```ignore
//! use schemaforge::prelude::*;
//!
//! let doc = parse_document("person.json", r#"{"type": "object"}"#)?;
//! let code = compile_documents(&[doc], &GeneratorConfig::default())?;
//! println!("{code}");
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Decoding, resolution, naming and the type graph
//! - [`codegen`] - Rust emission, formatting and output writing

pub mod prelude;

/// Schema decoding, resolution and type synthesis.
pub mod schema {
    pub use schemaforge_schema::*;
}

/// Rust code generation.
pub mod codegen {
    pub use schemaforge_codegen::*;
}

pub use schemaforge_codegen::{CodegenError, GeneratorConfig, write_if_changed};
pub use schemaforge_schema::{ParseError, SchemaDocument, SchemaError, parse_document};

/// Compiles decoded documents into one formatted Rust source file.
///
/// # Errors
/// Returns `CodegenError` if resolution, type synthesis or formatting
/// fails. No partial output is produced.
pub fn compile_documents(
    documents: &[SchemaDocument],
    config: &GeneratorConfig,
) -> Result<String, CodegenError> {
    schemaforge_codegen::compile(documents, config)
}
