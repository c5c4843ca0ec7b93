//! Sum type code generation.

use super::imports::Import;
use super::types::{TypeContext, doc_attrs, extra_derives};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use schemaforge_schema::ir::SumTypeDef;

/// Generator for untagged sum types.
///
/// serde tries untagged variants in declaration order and keeps the first
/// one that decodes, which is the selection rule for overlapping
/// alternatives.
pub struct UnionGenerator<'a> {
    def: &'a SumTypeDef,
    derive_extra: &'a [String],
    docs: bool,
}

impl<'a> UnionGenerator<'a> {
    /// Creates a new sum type generator.
    #[must_use]
    pub fn new(def: &'a SumTypeDef, derive_extra: &'a [String], docs: bool) -> Self {
        Self {
            def,
            derive_extra,
            docs,
        }
    }

    /// Generates the sum type declaration. A requested `Default` is
    /// dropped since no variant is preferred.
    ///
    /// # Errors
    /// Propagates invariant violations from variant payload types and
    /// rejects malformed derives.
    pub fn generate(&self, ctx: &mut TypeContext) -> Result<TokenStream, CodegenError> {
        let def = self.def;
        ctx.require(Import::Serde);

        let ident = format_ident!("{}", def.name);
        let docs = doc_attrs(def.description.as_deref(), self.docs);
        let extra = extra_derives(
            self.derive_extra,
            &["Debug", "Clone", "PartialEq", "Serialize", "Deserialize", "Default"],
        )?;
        let mut variants = Vec::with_capacity(def.variants.len());
        for variant in &def.variants {
            let name = format_ident!("{}", variant.name);
            let ty = ctx.type_tokens(&variant.ty)?;
            variants.push(quote! { #name(#ty), });
        }

        Ok(quote! {
            #docs
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize #(, #extra)*)]
            #[serde(untagged)]
            pub enum #ident {
                #(#variants)*
            }
        })
    }
}
