//! External imports and private helpers required by generated
//! declarations.

use proc_macro2::TokenStream;
use quote::quote;
use std::collections::BTreeSet;

/// One `use` item the generated file may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Import {
    /// `serde::{Deserialize, Serialize}`.
    Serde,
    /// `serde_json::Value`.
    JsonValue,
    /// `std::collections::BTreeMap`.
    BTreeMap,
}

impl Import {
    /// Path of the import as written in the `use` item.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Serde => "serde::{Deserialize, Serialize}",
            Self::JsonValue => "serde_json::Value",
            Self::BTreeMap => "std::collections::BTreeMap",
        }
    }

    fn tokens(self) -> TokenStream {
        match self {
            Self::Serde => quote! { use serde::{Deserialize, Serialize}; },
            Self::JsonValue => quote! { use serde_json::Value; },
            Self::BTreeMap => quote! { use std::collections::BTreeMap; },
        }
    }
}

/// A private function emitted once after the declarations that use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Helper {
    /// Decodes a present value, `null` included, into `Some`.
    DeserializeSome,
}

impl Helper {
    /// Name of the helper as referenced from `#[serde(...)]`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DeserializeSome => "deserialize_some",
        }
    }

    fn tokens(self) -> TokenStream {
        match self {
            Self::DeserializeSome => quote! {
                fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
                where
                    T: serde::Deserialize<'de>,
                    D: serde::Deserializer<'de>,
                {
                    T::deserialize(deserializer).map(Some)
                }
            },
        }
    }
}

/// Deterministically ordered set of imports and helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    imports: BTreeSet<Import>,
    helpers: BTreeSet<Helper>,
}

impl ImportSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an import.
    pub fn insert(&mut self, import: Import) {
        self.imports.insert(import);
    }

    /// Returns true if the import was recorded.
    #[must_use]
    pub fn contains(&self, import: Import) -> bool {
        self.imports.contains(&import)
    }

    /// Records a helper function.
    pub fn insert_helper(&mut self, helper: Helper) {
        self.helpers.insert(helper);
    }

    /// Returns true if the helper was recorded.
    #[must_use]
    pub fn contains_helper(&self, helper: Helper) -> bool {
        self.helpers.contains(&helper)
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty() && self.helpers.is_empty()
    }

    /// Imports in emission order.
    pub fn iter(&self) -> impl Iterator<Item = Import> + '_ {
        self.imports.iter().copied()
    }

    /// Renders the `use` items.
    #[must_use]
    pub fn to_tokens(&self) -> TokenStream {
        self.iter().map(Import::tokens).collect()
    }

    /// Renders the helper functions.
    #[must_use]
    pub fn helper_tokens(&self) -> TokenStream {
        self.helpers.iter().copied().map(Helper::tokens).collect()
    }
}
