//! # schemaforge CLI
//!
//! Argument handling and document I/O for the `schemaforge` binary.

use clap::Parser;
use schemaforge_codegen::{CodegenError, GeneratorConfig, compile, write_if_changed};
use schemaforge_schema::{ParseError, SchemaDocument, parse_document};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Label used for standard input.
pub const STDIN: &str = "-";

/// Compile JSON Schema documents into serde-annotated Rust types
#[derive(Parser, Debug, Clone)]
#[command(name = "schemaforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Wrap the generated code in `pub mod <PKG>`
    #[arg(short = 'p', long = "pkg")]
    pub package: Option<String>,

    /// Write the result to a file instead of stdout
    #[arg(short = 'o', long = "out")]
    pub output: Option<PathBuf>,

    /// Name for untitled root schemas read from stdin
    #[arg(long, default_value = "Root")]
    pub root_name: String,

    /// Extra derives for generated types (repeatable, comma separated).
    /// Plain aliases take none, and enums never derive `Default`.
    #[arg(long = "derive", value_delimiter = ',')]
    pub derive: Vec<String>,

    /// Do not emit doc comments from `description`
    #[arg(long)]
    pub no_docs: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Schema files to compile (`-` reads stdin)
    pub files: Vec<String>,
}

impl Cli {
    /// Generator options selected by the flags.
    #[must_use]
    pub fn config(&self) -> GeneratorConfig {
        let mut config = GeneratorConfig::new()
            .root_name(self.root_name.clone())
            .docs(!self.no_docs);
        if let Some(package) = &self.package {
            config = config.package(package.clone());
        }
        for derive in &self.derive {
            config = config.derive(derive.trim());
        }
        config
    }
}

/// Error type for the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid command line.
    #[error("{0}")]
    Argument(String),

    /// No input files were given.
    #[error("no JSON Schema files listed")]
    NoInputs,

    /// Reading an input failed.
    #[error("error reading JSON Schema from {path}: {source}")]
    Io {
        /// Input path or `-`.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An input is not well-formed JSON.
    #[error("error reading JSON Schema from {path}: {source}")]
    Decode {
        /// Input path or `-`.
        path: String,
        /// Underlying error.
        #[source]
        source: ParseError,
    },

    /// Resolution, synthesis or formatting failed.
    #[error("compilation error: {0}")]
    Compile(#[source] CodegenError),

    /// Writing the result failed.
    #[error("output error: {0}")]
    Output(#[source] CodegenError),
}

impl CliError {
    /// Converts a clap parse error into a one-line argument error.
    #[must_use]
    pub fn from_clap(err: &clap::Error) -> Self {
        let rendered = err.to_string();
        let first = rendered.lines().next().unwrap_or_default();
        Self::Argument(first.trim_start_matches("error: ").trim().to_string())
    }
}

/// Reads and decodes one input document.
///
/// # Errors
/// Returns `CliError::Io` if the input cannot be read, or
/// `CliError::Decode` if it is not JSON.
pub fn read_document<R: Read>(path: &str, stdin: &mut R) -> Result<SchemaDocument, CliError> {
    let io_error = |source| CliError::Io {
        path: path.to_string(),
        source,
    };
    let text = if path == STDIN {
        let mut text = String::new();
        stdin.read_to_string(&mut text).map_err(io_error)?;
        text
    } else {
        std::fs::read_to_string(path).map_err(io_error)?
    };
    tracing::debug!(path, bytes = text.len(), "read schema document");
    parse_document(path, &text).map_err(|source| CliError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Runs one compilation as selected by the command line.
///
/// # Errors
/// Returns the first error encountered; nothing is written on failure.
pub fn run<R: Read, W: Write>(cli: &Cli, stdin: &mut R, stdout: &mut W) -> Result<(), CliError> {
    if cli.files.is_empty() {
        return Err(CliError::NoInputs);
    }

    let mut documents = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        documents.push(read_document(path, stdin)?);
    }
    tracing::info!(documents = documents.len(), "compiling schemas");

    let code = compile(&documents, &cli.config()).map_err(CliError::Compile)?;

    match &cli.output {
        Some(path) => {
            write_if_changed(path, code.as_bytes()).map_err(CliError::Output)?;
        }
        None => {
            let stdout_error = |e| CliError::Output(CodegenError::io(Path::new("<stdout>"), e));
            stdout.write_all(code.as_bytes()).map_err(stdout_error)?;
            stdout.flush().map_err(stdout_error)?;
        }
    }
    Ok(())
}
