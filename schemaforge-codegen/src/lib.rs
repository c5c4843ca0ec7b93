//! # schemaforge Codegen
//!
//! Rust code generation from JSON Schema documents.
//!
//! This crate provides:
//! - serde-annotated structs, literal enums and untagged sum types
//! - Deterministic import collection
//! - Validation and formatting of the generated file
//! - Idempotent output writing

pub mod config;
pub mod error;
pub mod generator;
pub mod output;
pub mod rust;

pub use config::GeneratorConfig;
pub use error::CodegenError;
pub use generator::{Emitted, Generator};
pub use output::write_if_changed;

use schemaforge_schema::{SchemaDocument, SchemaGraph, TypeGraphBuilder};

/// Compiles schema documents into one Rust source file.
///
/// All documents share one naming scope, so identifiers never collide
/// across files.
///
/// # Arguments
/// * `documents` - Decoded schema documents, in input order
/// * `config` - Generation options
///
/// # Returns
/// The formatted file, starting with the configured marker line.
///
/// # Errors
/// Returns `CodegenError` if resolution, synthesis or formatting fails.
pub fn compile(documents: &[SchemaDocument], config: &GeneratorConfig) -> Result<String, CodegenError> {
    let graph = SchemaGraph::resolve(documents)?;
    let types = TypeGraphBuilder::new(&graph)
        .root_name(config.root_name.clone())
        .build()?;
    Generator::new(&types, config).generate()
}

/// Compiles schema documents given as JSON text.
///
/// # Arguments
/// * `sources` - Pairs of document label and JSON text
/// * `config` - Generation options
///
/// # Errors
/// Returns `CodegenError` if decoding or compilation fails.
pub fn compile_str(sources: &[(&str, &str)], config: &GeneratorConfig) -> Result<String, CodegenError> {
    let documents = sources
        .iter()
        .map(|(location, text)| schemaforge_schema::parse_document(location, text))
        .collect::<Result<Vec<_>, _>>()?;
    compile(&documents, config)
}
