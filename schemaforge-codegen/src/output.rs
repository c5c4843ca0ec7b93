//! Output assembly and file writing for generated code.
//!
//! Declarations and imports are assembled into one file, validated with
//! `syn`, formatted with `prettyplease` and prefixed with the generated
//! marker. Writing skips files whose bytes would not change, so that file
//! watchers are not disturbed by identical regenerations.

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::generator::Emitted;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use schemaforge_schema::naming::{escape_keyword, snake_case};
use std::fs;
use std::path::Path;

/// Assembles imports, declarations and helper functions, optionally
/// inside `pub mod`.
#[must_use]
pub fn assemble(emitted: &Emitted, package: Option<&str>) -> TokenStream {
    let imports = emitted.imports.to_tokens();
    let helpers = emitted.imports.helper_tokens();
    let declarations = &emitted.declarations;
    let body = quote! {
        #imports

        #(#declarations)*

        #helpers
    };
    match package {
        Some(package) => {
            let module = format_ident!("{}", escape_keyword(snake_case(package)));
            quote! {
                pub mod #module {
                    #body
                }
            }
        }
        None => body,
    }
}

/// Parses generated tokens as a Rust file.
///
/// # Errors
/// Returns `CodegenError::Formatting` if the tokens do not parse.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, CodegenError> {
    syn::parse2(tokens.clone()).map_err(|e| CodegenError::formatting(e.to_string()))
}

/// Formats a parsed file and prefixes the marker line.
#[must_use]
pub fn format_code(file: &syn::File, header: &str) -> String {
    let formatted = prettyplease::unparse(file);
    let mut out = format!("{header}\n\n{formatted}");
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Assembles, validates and formats a complete file.
///
/// # Errors
/// Returns `CodegenError::Formatting` if the declarations are not valid
/// Rust.
pub fn render_file(emitted: &Emitted, config: &GeneratorConfig) -> Result<String, CodegenError> {
    let tokens = assemble(emitted, config.package.as_deref());
    let file = validate_code(&tokens)?;
    Ok(format_code(&file, &config.header))
}

/// Writes `bytes` to `path` unless the file already holds exactly them.
///
/// Parent directories are created as needed. The new content goes to a
/// sibling temporary file first and is renamed into place.
///
/// # Returns
/// `true` if the file was written, `false` if it was left untouched.
///
/// # Errors
/// Returns `CodegenError::Io` if reading, writing or renaming fails.
pub fn write_if_changed(path: &Path, bytes: &[u8]) -> Result<bool, CodegenError> {
    match fs::read(path) {
        Ok(existing) if existing == bytes => {
            tracing::info!(path = %path.display(), "output unchanged, skipping write");
            return Ok(false);
        }
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(CodegenError::io(path, e)),
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| CodegenError::io(parent, e))?;
    }

    replace_file(path, bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(true)
}

/// Writes `bytes` to `<path>.tmp` and renames it over `path`. The
/// temporary file is removed if either step fails.
fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), CodegenError> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    if let Err(e) = fs::write(&temp_path, bytes) {
        let _ = fs::remove_file(&temp_path);
        return Err(CodegenError::io(&temp_path, e));
    }
    if let Err(e) = fs::rename(&temp_path, path) {
        tracing::warn!(path = %temp_path.display(), error = %e, "rename failed, removing temporary file");
        let _ = fs::remove_file(&temp_path);
        return Err(CodegenError::io(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rust::{Helper, Import, ImportSet};

    fn emitted() -> Emitted {
        let mut imports = ImportSet::new();
        imports.insert(Import::Serde);
        Emitted {
            declarations: vec![quote! {
                #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
                pub struct Person {
                    pub name: String,
                }
            }],
            imports,
        }
    }

    #[test]
    fn test_render_file() {
        let code = render_file(&emitted(), &GeneratorConfig::default()).expect("render");
        assert!(code.starts_with("// Code generated by schemaforge. DO NOT EDIT.\n\n"));
        assert!(code.contains("use serde::{Deserialize, Serialize};"));
        assert!(code.contains("pub struct Person {"));
        assert!(code.ends_with('\n'));
    }

    #[test]
    fn test_render_file_in_package() {
        let config = GeneratorConfig::default().package("my-model");
        let code = render_file(&emitted(), &config).expect("render");
        assert!(code.contains("pub mod my_model {"));
    }

    #[test]
    fn test_validate_rejects_invalid_code() {
        let tokens = quote! { pub struct { } };
        let result = validate_code(&tokens);
        assert!(matches!(result, Err(CodegenError::Formatting { .. })));
    }

    #[test]
    fn test_write_if_changed_creates_parents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/out/types.rs");
        assert!(write_if_changed(&path, b"// one\n").expect("write"));
        assert_eq!(fs::read(&path).expect("read"), b"// one\n");
        assert!(!dir.path().join("nested/out/types.rs.tmp").exists());
    }

    #[test]
    fn test_write_if_changed_skips_identical_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("types.rs");
        assert!(write_if_changed(&path, b"same").expect("write"));
        let before = fs::metadata(&path).and_then(|m| m.modified()).expect("mtime");

        assert!(!write_if_changed(&path, b"same").expect("write"));
        let after = fs::metadata(&path).and_then(|m| m.modified()).expect("mtime");
        assert_eq!(before, after);

        assert!(write_if_changed(&path, b"different").expect("write"));
        assert_eq!(fs::read(&path).expect("read"), b"different");
    }

    #[test]
    fn test_helpers_follow_declarations() {
        let mut emitted = emitted();
        emitted.imports.insert_helper(Helper::DeserializeSome);
        let code = render_file(&emitted, &GeneratorConfig::default().package("model")).expect("render");
        let declaration = code.find("pub struct Person").expect("declaration");
        let helper = code.find("fn deserialize_some<'de, T, D>").expect("helper");
        assert!(declaration < helper);
        assert!(code.trim_end().ends_with('}'));
    }

    #[test]
    fn test_failed_rename_removes_temporary_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("types.rs");
        fs::create_dir(&path).expect("mkdir");
        fs::write(path.join("occupied"), b"x").expect("write");

        let result = replace_file(&path, b"// code\n");
        assert!(matches!(result, Err(CodegenError::Io { .. })));
        assert!(!dir.path().join("types.rs.tmp").exists());
        assert!(path.join("occupied").exists());
    }
}
