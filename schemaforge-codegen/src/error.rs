//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema decoding error.
    #[error("schema parse error: {0}")]
    Parse(#[from] schemaforge_schema::ParseError),

    /// Schema resolution or type synthesis error.
    #[error("schema error: {0}")]
    Schema(#[from] schemaforge_schema::SchemaError),

    /// IO error while writing output.
    #[error("IO error on '{path}': {source}")]
    Io {
        /// Path being written.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The emitted declarations do not form a valid source file.
    #[error("generated code is invalid: {message}")]
    Formatting {
        /// Parser message.
        message: String,
    },

    /// A declaration refers to a type that is not declared before it.
    #[error("internal invariant violated: {message}")]
    InvariantViolation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates an IO error for the given path.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Creates a formatting error with the given message.
    pub fn formatting(message: impl Into<String>) -> Self {
        Self::Formatting {
            message: message.into(),
        }
    }

    /// Creates an invariant violation with the given message.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_conversion() {
        let err: CodegenError = schemaforge_schema::SchemaError::NamingCollision {
            candidate: "Item".to_string(),
        }
        .into();
        assert!(matches!(err, CodegenError::Schema(_)));
        assert!(err.to_string().contains("'Item'"));
    }

    #[test]
    fn test_io_error_names_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CodegenError::io(std::path::Path::new("out/types.rs"), source);
        assert_eq!(err.to_string(), "IO error on 'out/types.rs': denied");
    }
}
