//! Main code generator.

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::output;
use crate::rust::{
    EnumGenerator, ImportSet, StructGenerator, TypeContext, TypeGenerator, UnionGenerator,
};
use proc_macro2::TokenStream;
use schemaforge_schema::ir::{TypeDescriptor, TypeGraph};

/// Declarations of one compilation and the imports they need.
#[derive(Debug, Clone)]
pub struct Emitted {
    /// Declarations in type graph order.
    pub declarations: Vec<TokenStream>,
    /// Imports used by the declarations.
    pub imports: ImportSet,
}

/// Main code generator that orchestrates all generation phases.
pub struct Generator<'a> {
    types: &'a TypeGraph,
    config: &'a GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator for the given type graph.
    #[must_use]
    pub fn new(types: &'a TypeGraph, config: &'a GeneratorConfig) -> Self {
        Self { types, config }
    }

    /// Emits every declaration in order.
    ///
    /// # Errors
    /// Returns `CodegenError::InvariantViolation` if a declaration uses a
    /// type that is not declared before it.
    pub fn emit(&self) -> Result<Emitted, CodegenError> {
        let docs = self.config.docs;
        let derives = self.config.derive_extra.as_slice();
        let mut ctx = TypeContext::new();
        let mut declarations = Vec::with_capacity(self.types.order().len());

        for declaration in self.types.declarations() {
            let tokens = match declaration {
                TypeDescriptor::Struct(def) => StructGenerator::new(def, derives, docs).generate(&mut ctx)?,
                TypeDescriptor::Enum(def) => EnumGenerator::new(def, derives, docs).generate()?,
                TypeDescriptor::SumType(def) => {
                    UnionGenerator::new(def, derives, docs).generate(&mut ctx)?
                }
                TypeDescriptor::Alias(def) => TypeGenerator::new(def, derives, docs).generate(&mut ctx)?,
                other => {
                    return Err(CodegenError::invariant(format!(
                        "type graph declares a non-declaration descriptor: {other:?}"
                    )));
                }
            };
            if let Some(name) = declaration.declared_name() {
                ctx.declare(name);
            }
            declarations.push(tokens);
        }

        tracing::debug!(declarations = declarations.len(), "emitted declarations");
        Ok(Emitted {
            declarations,
            imports: ctx.into_imports(),
        })
    }

    /// Emits and renders the complete file.
    ///
    /// # Errors
    /// Returns `CodegenError` if emission fails or the result does not
    /// parse as Rust.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let emitted = self.emit()?;
        output::render_file(&emitted, self.config)
    }
}
