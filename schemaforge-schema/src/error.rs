//! Error types for schema decoding, resolution and type synthesis.

use thiserror::Error;

/// Error type for decoding schema documents.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed JSON.
    #[error("invalid JSON in '{location}': {source}")]
    Json {
        /// Document location (file path or `-`).
        location: String,
        /// Underlying decoder error.
        #[source]
        source: serde_json::Error,
    },
}

/// Error type for schema resolution and type synthesis.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A `$ref` points at nothing.
    #[error("unresolved reference '{pointer}' (referenced from {referrer})")]
    UnresolvedRef {
        /// The reference as written.
        pointer: String,
        /// Location of the referencing schema.
        referrer: String,
    },

    /// A chain of `$ref`-only schemas loops back on itself.
    #[error("reference loop without any structure at {location}")]
    RefLoop {
        /// Location where the loop was detected.
        location: String,
    },

    /// `allOf` members assert types that have no common value.
    #[error("incompatible allOf at {location}: type {left} conflicts with {right}")]
    IncompatibleAllOf {
        /// Location of the schema carrying the `allOf`.
        location: String,
        /// Types accumulated so far.
        left: String,
        /// Types asserted by the conflicting member.
        right: String,
    },

    /// An `allOf` member reaches the schema that includes it.
    #[error("cyclic allOf composition at {location}")]
    CyclicAllOf {
        /// Location of the schema carrying the `allOf`.
        location: String,
    },

    /// A keyword has a malformed value.
    #[error("malformed schema at {location}: {message}")]
    Malformed {
        /// Schema location.
        location: String,
        /// Error message.
        message: String,
    },

    /// Keywords that contradict each other.
    #[error("invalid keyword combination at {location}: {message}")]
    InvalidKeywords {
        /// Schema location.
        location: String,
        /// Error message.
        message: String,
    },

    /// No unique identifier could be derived for a candidate name.
    #[error("naming collision: cannot derive a unique name for '{candidate}'")]
    NamingCollision {
        /// The candidate name.
        candidate: String,
    },
}

impl SchemaError {
    /// Creates an unresolved reference error.
    pub fn unresolved(pointer: impl Into<String>, referrer: impl ToString) -> Self {
        Self::UnresolvedRef {
            pointer: pointer.into(),
            referrer: referrer.to_string(),
        }
    }

    /// Creates a malformed keyword error.
    pub fn malformed(location: impl ToString, message: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.to_string(),
            message: message.into(),
        }
    }

    /// Creates an invalid keyword combination error.
    pub fn invalid_keywords(location: impl ToString, message: impl Into<String>) -> Self {
        Self::InvalidKeywords {
            location: location.to_string(),
            message: message.into(),
        }
    }
}
