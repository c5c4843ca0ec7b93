//! Type expressions and alias declarations.

use super::imports::{Helper, Import, ImportSet};
use crate::error::CodegenError;
use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use schemaforge_schema::ir::{AliasDef, NamedRef, Primitive, TypeDescriptor};
use serde_json::Value;
use std::collections::HashSet;

/// State shared by every declaration of one generated file: the names
/// declared so far and the imports they need.
#[derive(Debug, Default)]
pub struct TypeContext {
    declared: HashSet<String>,
    imports: ImportSet,
}

impl TypeContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a name as declared.
    pub fn declare(&mut self, name: &str) {
        self.declared.insert(name.to_string());
    }

    /// Records an import.
    pub fn require(&mut self, import: Import) {
        self.imports.insert(import);
    }

    /// Records a helper function.
    pub fn require_helper(&mut self, helper: Helper) {
        self.imports.insert_helper(helper);
    }

    /// Imports recorded so far.
    #[must_use]
    pub fn imports(&self) -> &ImportSet {
        &self.imports
    }

    /// Consumes the context, returning the recorded imports.
    #[must_use]
    pub fn into_imports(self) -> ImportSet {
        self.imports
    }

    /// Renders the type of a use site.
    ///
    /// # Errors
    /// Returns `CodegenError::InvariantViolation` if a direct reference
    /// names a type not declared yet, or if a declaration appears where a
    /// type expression is expected.
    pub fn type_tokens(&mut self, ty: &TypeDescriptor) -> Result<TokenStream, CodegenError> {
        self.render(ty, false)
    }

    fn render(&mut self, ty: &TypeDescriptor, in_container: bool) -> Result<TokenStream, CodegenError> {
        let tokens = match ty {
            TypeDescriptor::Primitive(primitive) => primitive_tokens(*primitive),
            TypeDescriptor::Dynamic => {
                self.require(Import::JsonValue);
                quote! { Value }
            }
            TypeDescriptor::Slice(item) => {
                let item = self.render(item, true)?;
                quote! { Vec<#item> }
            }
            TypeDescriptor::Map(value) => {
                self.require(Import::BTreeMap);
                let value = self.render(value, true)?;
                quote! { BTreeMap<String, #value> }
            }
            TypeDescriptor::Optional(inner) => {
                let inner = self.render(inner, false)?;
                quote! { Option<#inner> }
            }
            TypeDescriptor::NamedReference(named) => self.reference(named, in_container)?,
            other => {
                return Err(CodegenError::invariant(format!(
                    "declaration {} used as a type expression",
                    other.declared_name().unwrap_or("<anonymous>")
                )));
            }
        };
        Ok(tokens)
    }

    fn reference(&self, named: &NamedRef, in_container: bool) -> Result<TokenStream, CodegenError> {
        let ident = format_ident!("{}", named.name);
        if named.indirect {
            // Vec and BTreeMap already allocate.
            return Ok(if in_container {
                quote! { #ident }
            } else {
                quote! { Box<#ident> }
            });
        }
        if !self.declared.contains(&named.name) {
            return Err(CodegenError::invariant(format!(
                "type {} is referenced before it is declared",
                named.name
            )));
        }
        Ok(quote! { #ident })
    }
}

/// Rust type of a scalar.
#[must_use]
pub fn primitive_tokens(primitive: Primitive) -> TokenStream {
    match primitive {
        Primitive::String => quote! { String },
        Primitive::Integer => quote! { i64 },
        Primitive::Number => quote! { f64 },
        Primitive::Boolean => quote! { bool },
        Primitive::Null => quote! { () },
    }
}

/// Parses user supplied derive paths, dropping any whose last segment is
/// in `skip`. `skip` lists what the declaration derives already and what
/// it cannot derive.
///
/// # Errors
/// Returns `CodegenError::Formatting` if a derive is not a path.
pub fn extra_derives(derive_extra: &[String], skip: &[&str]) -> Result<Vec<syn::Path>, CodegenError> {
    let mut paths = Vec::with_capacity(derive_extra.len());
    for derive in derive_extra {
        let path = syn::parse_str::<syn::Path>(derive)
            .map_err(|e| CodegenError::formatting(format!("invalid derive '{derive}': {e}")))?;
        let last = path.segments.last().map(|segment| segment.ident.to_string());
        if last.is_some_and(|last| skip.contains(&last.as_str())) {
            continue;
        }
        paths.push(path);
    }
    Ok(paths)
}

/// `#[doc]` attributes for a description, one per line.
#[must_use]
pub fn doc_attrs(description: Option<&str>, enabled: bool) -> TokenStream {
    let Some(description) = description.filter(|_| enabled) else {
        return TokenStream::new();
    };
    description
        .lines()
        .map(|line| {
            let line = format!(" {}", line.trim_end());
            quote! { #[doc = #line] }
        })
        .collect()
}

/// Tokens of a `serde_json::json!` argument reproducing the value.
#[must_use]
pub fn json_literal(value: &Value) -> TokenStream {
    match value {
        Value::Null => quote! { null },
        Value::Bool(b) => quote! { #b },
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                let lit = Literal::u64_unsuffixed(u);
                quote! { #lit }
            } else if let Some(i) = n.as_i64() {
                let lit = Literal::u64_unsuffixed(i.unsigned_abs());
                quote! { -#lit }
            } else {
                let f = n.as_f64().unwrap_or_default();
                let lit = Literal::f64_unsuffixed(f.abs());
                if f.is_sign_negative() {
                    quote! { -#lit }
                } else {
                    quote! { #lit }
                }
            }
        }
        Value::String(s) => {
            let lit = Literal::string(s);
            quote! { #lit }
        }
        Value::Array(items) => {
            let items = items.iter().map(json_literal);
            quote! { [#(#items),*] }
        }
        Value::Object(entries) => {
            let entries = entries.iter().map(|(key, value)| {
                let key = Literal::string(key);
                let value = json_literal(value);
                quote! { #key: #value }
            });
            quote! { { #(#entries),* } }
        }
    }
}

/// Generator for alias and newtype declarations.
pub struct TypeGenerator<'a> {
    docs: bool,
    alias: &'a AliasDef,
    derive_extra: &'a [String],
}

impl<'a> TypeGenerator<'a> {
    /// Creates a new alias generator.
    #[must_use]
    pub fn new(alias: &'a AliasDef, derive_extra: &'a [String], docs: bool) -> Self {
        Self {
            docs,
            alias,
            derive_extra,
        }
    }

    /// Generates a `pub type` alias, or a transparent wrapper struct for
    /// containers.
    ///
    /// # Errors
    /// Propagates invariant violations from the aliased type and rejects
    /// malformed derives.
    pub fn generate(&self, ctx: &mut TypeContext) -> Result<TokenStream, CodegenError> {
        let alias = self.alias;
        let ident = format_ident!("{}", alias.name);
        let docs = doc_attrs(alias.description.as_deref(), self.docs);

        if !alias.transparent {
            let target = ctx.type_tokens(&alias.target)?;
            return Ok(quote! {
                #docs
                pub type #ident = #target;
            });
        }

        // The wrapper is declared before its target is rendered so that
        // the container may refer to it.
        ctx.declare(&alias.name);
        ctx.require(Import::Serde);
        let target = ctx.type_tokens(&alias.target)?;
        let extra = extra_derives(
            self.derive_extra,
            &["Debug", "Clone", "Default", "PartialEq", "Serialize", "Deserialize"],
        )?;
        Ok(quote! {
            #docs
            #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize #(, #extra)*)]
            #[serde(transparent)]
            pub struct #ident(pub #target);

            impl #ident {
                /// Returns true if the wrapped container is empty.
                #[must_use]
                pub fn is_empty(&self) -> bool {
                    self.0.is_empty()
                }
            }
        })
    }
}
