//! Struct code generation.

use super::imports::{Helper, Import};
use super::types::{TypeContext, doc_attrs, extra_derives};
use crate::error::CodegenError;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use schemaforge_schema::ir::{FieldDef, StructDef, TypeDescriptor};

/// Generator for struct declarations.
pub struct StructGenerator<'a> {
    def: &'a StructDef,
    derive_extra: &'a [String],
    docs: bool,
}

impl<'a> StructGenerator<'a> {
    /// Creates a new struct generator.
    #[must_use]
    pub fn new(def: &'a StructDef, derive_extra: &'a [String], docs: bool) -> Self {
        Self {
            def,
            derive_extra,
            docs,
        }
    }

    /// Generates the struct declaration.
    ///
    /// # Errors
    /// Propagates invariant violations from field types.
    pub fn generate(&self, ctx: &mut TypeContext) -> Result<TokenStream, CodegenError> {
        let def = self.def;
        ctx.require(Import::Serde);

        let ident = format_ident!("{}", def.name);
        let docs = doc_attrs(def.description.as_deref(), self.docs);
        let extra = extra_derives(
            self.derive_extra,
            &["Debug", "Clone", "PartialEq", "Serialize", "Deserialize"],
        )?;
        let deny = def
            .deny_unknown_fields
            .then(|| quote! { #[serde(deny_unknown_fields)] });

        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            fields.push(self.generate_field(field, ctx)?);
        }

        Ok(quote! {
            #docs
            #[derive(Debug, Clone, PartialEq, Serialize, Deserialize #(, #extra)*)]
            #deny
            pub struct #ident {
                #(#fields)*
            }
        })
    }

    fn generate_field(&self, field: &FieldDef, ctx: &mut TypeContext) -> Result<TokenStream, CodegenError> {
        let ident = format_ident!("{}", field.name);
        let ty = ctx.type_tokens(&field.ty)?;
        let docs = doc_attrs(field.description.as_deref(), self.docs);
        if field.admits_null && !field.required {
            ctx.require_helper(Helper::DeserializeSome);
        }
        let attrs = serde_field_attrs(field);
        Ok(quote! {
            #docs
            #attrs
            pub #ident: #ty,
        })
    }
}

/// `#[serde(...)]` attributes of a field.
fn serde_field_attrs(field: &FieldDef) -> TokenStream {
    if field.flatten {
        return quote! { #[serde(flatten)] };
    }

    let mut args = Vec::new();
    if field.name != field.key {
        let key = &field.key;
        args.push(quote! { rename = #key });
    }
    if field.required {
        if field.nullable {
            // Absent and null are different on the wire for required keys.
            args.push(quote! { deserialize_with = "Option::deserialize" });
        }
    } else {
        let skip = match &field.ty {
            TypeDescriptor::Slice(_) => Some("Vec::is_empty".to_string()),
            TypeDescriptor::Map(_) => Some("BTreeMap::is_empty".to_string()),
            TypeDescriptor::Optional(_) => Some("Option::is_none".to_string()),
            // Optional references left unwrapped name container newtypes.
            TypeDescriptor::NamedReference(named) => Some(format!("{}::is_empty", named.name)),
            _ => None,
        };
        args.push(quote! { default });
        if field.admits_null {
            // Without this a present null would decode to None.
            let helper = Helper::DeserializeSome.name();
            args.push(quote! { deserialize_with = #helper });
        }
        if let Some(skip) = skip {
            args.push(quote! { skip_serializing_if = #skip });
        }
    }

    if args.is_empty() {
        TokenStream::new()
    } else {
        quote! { #[serde(#(#args),*)] }
    }
}
