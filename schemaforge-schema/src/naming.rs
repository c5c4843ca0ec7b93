//! Identifier sanitization and deduplication.
//!
//! A [`NamingPolicy`] owns the set of identifiers already handed out in one
//! scope. The first claimant of a sanitized name gets it unchanged; later
//! claimants get numeric suffixes in claim order.

use crate::error::SchemaError;
use serde_json::Value;
use std::collections::HashSet;

/// Default number of suffixes tried before giving up.
pub const DEFAULT_MAX_SUFFIX: usize = 9_999;

/// Names the emitted prelude imports or that shadow common std items.
pub const RESERVED_TYPE_NAMES: &[&str] = &[
    "Option",
    "Some",
    "None",
    "Result",
    "Ok",
    "Err",
    "Vec",
    "Box",
    "String",
    "Value",
    "BTreeMap",
    "Serialize",
    "Deserialize",
    "Serializer",
    "Deserializer",
];

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Identifier case convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// `UpperCamelCase`, for types and variants.
    Pascal,
    /// `snake_case`, for fields.
    Snake,
}

/// Allocator of unique identifiers within one scope.
#[derive(Debug, Clone)]
pub struct NamingPolicy {
    case: Case,
    claimed: HashSet<String>,
    max_suffix: usize,
}

impl NamingPolicy {
    /// Creates an empty policy for the given case.
    #[must_use]
    pub fn new(case: Case) -> Self {
        Self {
            case,
            claimed: HashSet::new(),
            max_suffix: DEFAULT_MAX_SUFFIX,
        }
    }

    /// Policy for top-level type names, with prelude names reserved.
    #[must_use]
    pub fn for_types() -> Self {
        let mut policy = Self::new(Case::Pascal);
        policy
            .claimed
            .extend(RESERVED_TYPE_NAMES.iter().map(|s| (*s).to_string()));
        policy
    }

    /// Policy for the fields of one struct.
    #[must_use]
    pub fn for_fields() -> Self {
        Self::new(Case::Snake)
    }

    /// Policy for the variants of one enum or sum type.
    #[must_use]
    pub fn for_variants() -> Self {
        Self::new(Case::Pascal)
    }

    /// Sets the number of suffixes tried before failing.
    #[must_use]
    pub fn with_max_suffix(mut self, max_suffix: usize) -> Self {
        self.max_suffix = max_suffix;
        self
    }

    /// Returns true if the identifier is already taken.
    #[must_use]
    pub fn is_claimed(&self, ident: &str) -> bool {
        self.claimed.contains(ident)
    }

    /// Sanitizes a candidate without claiming it.
    #[must_use]
    pub fn sanitize(&self, candidate: &str) -> String {
        let base = match self.case {
            Case::Pascal => pascal_case(candidate),
            Case::Snake => snake_case(candidate),
        };
        escape_keyword(base)
    }

    /// Claims a unique identifier derived from `candidate`.
    ///
    /// # Errors
    /// Returns `SchemaError::NamingCollision` if every suffix up to the
    /// limit is taken.
    pub fn claim(&mut self, candidate: &str) -> Result<String, SchemaError> {
        let base = match self.case {
            Case::Pascal => pascal_case(candidate),
            Case::Snake => snake_case(candidate),
        };
        let first = escape_keyword(base.clone());
        if self.claimed.insert(first.clone()) {
            tracing::trace!(candidate, ident = %first, "claimed identifier");
            return Ok(first);
        }
        for n in 2..=self.max_suffix {
            let next = match self.case {
                Case::Pascal => format!("{base}{n}"),
                Case::Snake => format!("{base}_{n}"),
            };
            let next = escape_keyword(next);
            if self.claimed.insert(next.clone()) {
                tracing::trace!(candidate, ident = %next, "claimed suffixed identifier");
                return Ok(next);
            }
        }
        Err(SchemaError::NamingCollision {
            candidate: candidate.to_string(),
        })
    }
}

/// Splits text into words on separators, case changes and acronym ends.
#[must_use]
pub fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Converts text to `UpperCamelCase`.
#[must_use]
pub fn pascal_case(input: &str) -> String {
    let mut out = String::new();
    for word in split_words(input) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    if out.is_empty() {
        return "Empty".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'N');
    }
    out
}

/// Converts text to `snake_case`.
#[must_use]
pub fn snake_case(input: &str) -> String {
    let words: Vec<String> = split_words(input)
        .into_iter()
        .map(|w| w.to_ascii_lowercase())
        .collect();
    let mut out = words.join("_");
    if out.is_empty() {
        return "empty".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert_str(0, "n_");
    }
    out
}

/// Appends `_` to identifiers that collide with a keyword.
#[must_use]
pub fn escape_keyword(ident: String) -> String {
    if KEYWORDS.contains(&ident.as_str()) {
        format!("{ident}_")
    } else {
        ident
    }
}

/// Name candidate for an enum literal.
#[must_use]
pub fn literal_candidate(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            let text = n.to_string().replace('-', "Neg").replace('.', "Dot");
            format!("V{text}")
        }
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Null => "Null".to_string(),
        Value::Array(_) | Value::Object(_) => "Value".to_string(),
    }
}
