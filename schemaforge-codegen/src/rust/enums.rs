//! Enum code generation.
//!
//! Literal sets become unit enums with hand-written serde impls, since the
//! literals may be of any JSON type and derive attributes only cover
//! strings.

use super::types::{doc_attrs, extra_derives, json_literal};
use crate::error::CodegenError;
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use schemaforge_schema::ir::EnumDef;

/// Generator for closed literal sets.
pub struct EnumGenerator<'a> {
    def: &'a EnumDef,
    derive_extra: &'a [String],
    docs: bool,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(def: &'a EnumDef, derive_extra: &'a [String], docs: bool) -> Self {
        Self {
            def,
            derive_extra,
            docs,
        }
    }

    /// Generates the enum, its inherent impl and its serde impls.
    ///
    /// `Default` has no variant to pick and the serde traits are written
    /// by hand, so those requested derives are dropped.
    ///
    /// # Errors
    /// Returns `CodegenError::Formatting` for a malformed derive.
    pub fn generate(&self) -> Result<TokenStream, CodegenError> {
        let def = self.def;
        let ident = format_ident!("{}", def.name);
        let docs = doc_attrs(def.description.as_deref(), self.docs);
        let extra = extra_derives(
            self.derive_extra,
            &[
                "Debug",
                "Clone",
                "Copy",
                "PartialEq",
                "Eq",
                "Hash",
                "Default",
                "Serialize",
                "Deserialize",
            ],
        )?;
        let variants: Vec<_> = def
            .variants
            .iter()
            .map(|v| format_ident!("{}", v.name))
            .collect();
        let literals = def.variants.iter().map(|v| json_literal(&v.value));
        let count = Literal::usize_unsuffixed(variants.len());
        let unexpected = format!("unexpected value {{}} for {}", def.name);

        Ok(quote! {
            #docs
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash #(, #extra)*)]
            pub enum #ident {
                #(#variants,)*
            }

            impl #ident {
                /// Every literal in declaration order.
                pub const ALL: [Self; #count] = [#(Self::#variants),*];

                /// Returns the JSON literal of this variant.
                #[must_use]
                pub fn as_json(&self) -> serde_json::Value {
                    match self {
                        #(Self::#variants => serde_json::json!(#literals),)*
                    }
                }
            }

            impl serde::Serialize for #ident {
                fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serde::Serialize::serialize(&self.as_json(), serializer)
                }
            }

            impl<'de> serde::Deserialize<'de> for #ident {
                fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let value = <serde_json::Value as serde::Deserialize>::deserialize(deserializer)?;
                    Self::ALL
                        .into_iter()
                        .find(|candidate| candidate.as_json() == value)
                        .ok_or_else(|| serde::de::Error::custom(format!(#unexpected, value)))
                }
            }
        })
    }
}
