//! End-to-end compilation tests.

use schemaforge::prelude::*;
use schemaforge::schema::SchemaError;
use serde_json::{Value, json};

fn doc(value: Value) -> SchemaDocument {
    SchemaDocument::new("-", value)
}

fn compile(value: Value) -> Result<String, CodegenError> {
    compile_documents(&[doc(value)], &GeneratorConfig::default())
}

fn fixture() -> SchemaDocument {
    let text = include_str!("fixtures/model.json");
    parse_document("fixtures/model.json", text).expect("Failed to parse fixture")
}

#[test]
fn test_person_example() {
    let code = compile(json!({
        "type": "object",
        "properties": {"name": {"type": "string"}, "age": {"type": "integer"}},
        "required": ["name"]
    }))
    .expect("Failed to compile");

    assert!(code.starts_with("// Code generated by schemaforge. DO NOT EDIT.\n\n"));
    assert!(code.contains("use serde::{Deserialize, Serialize};"));
    assert!(code.contains("pub struct Root {"));
    assert!(code.contains("    pub name: String,\n"));
    assert!(code.contains("    #[serde(default, skip_serializing_if = \"Option::is_none\")]\n    pub age: Option<i64>,\n"));
    assert!(code.ends_with('\n'));
}

#[test]
fn test_fixture_matches_checked_in_declarations() {
    let code = compile_documents(&[fixture()], &GeneratorConfig::default()).expect("compile");
    let expected = [
        "pub enum Status {\n    Active,\n    Disabled,\n    V3,\n    Null,\n}",
        "pub const ALL: [Self; 4] = [Self::Active, Self::Disabled, Self::V3, Self::Null];",
        "Self::V3 => serde_json::json!(3),",
        "pub struct Person {\n    pub name: String,",
        "pub status: Option<Status>,",
        "#[serde(untagged)]\npub enum Payload {\n    Integer(i64),\n    Number(f64),\n    String(String),\n}",
        "pub children: Vec<Node>,",
        "pub next: Option<Box<Node>>,",
        "#[serde(deny_unknown_fields)]\npub struct Note {",
        "#[serde(deserialize_with = \"Option::deserialize\")]\n    pub text: Option<String>,",
    ];
    for snippet in expected {
        assert!(code.contains(snippet), "missing:\n{snippet}\n\nin:\n{code}");
    }

    let order: Vec<usize> = ["pub enum Status", "pub struct Person", "pub enum Payload", "pub struct Node", "pub struct Note"]
        .iter()
        .map(|decl| code.find(decl).expect("declared"))
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]), "declaration order: {order:?}");
}

#[test]
fn test_build_output_matches_compiler() {
    let code = compile_documents(&[fixture()], &GeneratorConfig::default()).expect("compile");
    assert_eq!(code, include_str!(concat!(env!("OUT_DIR"), "/model.rs")));
}

#[test]
fn test_optional_field_admitting_null_uses_helper() {
    let code = compile_documents(&[fixture()], &GeneratorConfig::default()).expect("compile");
    let field = code.find("pub status: Option<Status>,").expect("status field");
    let attrs = &code[code[..field].rfind("#[serde(").expect("serde attribute")..field];
    assert!(attrs.contains("deserialize_with = \"deserialize_some\""), "{attrs}");
    assert!(attrs.contains("default"), "{attrs}");
    assert_eq!(code.matches("fn deserialize_some<'de, T, D>").count(), 1);
}

#[test]
fn test_optional_reference_to_named_container() {
    let code = compile(json!({
        "title": "Post",
        "properties": {"tags": {"$ref": "#/definitions/Tags"}},
        "definitions": {"Tags": {"type": "array", "items": {"type": "string"}}}
    }))
    .expect("compile");
    assert!(code.contains("pub struct Tags(pub Vec<String>);"));
    assert!(code.contains("impl Tags {"));
    assert!(code.contains("#[serde(default, skip_serializing_if = \"Tags::is_empty\")]\n    pub tags: Tags,"));
    assert!(!code.contains("Option<Tags>"));
}

#[test]
fn test_compilation_is_deterministic() {
    let config = GeneratorConfig::default();
    let first = compile_documents(&[fixture()], &config).expect("compile");
    let second = compile_documents(&[fixture()], &config).expect("compile");
    assert_eq!(first, second);
}

#[test]
fn test_shared_reference_produces_one_type() {
    let code = compile(json!({
        "title": "Contact",
        "properties": {
            "home": {"$ref": "#/definitions/Address"},
            "work": {"$ref": "#/definitions/Address"}
        },
        "definitions": {
            "Address": {"type": "object", "properties": {"street": {"type": "string"}}}
        }
    }))
    .expect("compile");

    assert_eq!(code.matches("pub struct Address").count(), 1);
    assert!(code.contains("pub home: Option<Address>,"));
    assert!(code.contains("pub work: Option<Address>,"));
    assert!(code.find("pub struct Address") < code.find("pub struct Contact"));
}

#[test]
fn test_mutual_recursion_terminates() {
    let code = compile(json!({
        "definitions": {
            "Parent": {"properties": {"child": {"$ref": "#/definitions/Child"}}},
            "Child": {"properties": {"parent": {"$ref": "#/definitions/Parent"}}}
        }
    }))
    .expect("compile");
    assert_eq!(code.matches("pub struct Parent").count(), 1);
    assert_eq!(code.matches("pub struct Child").count(), 1);
    assert!(code.contains("pub parent: Option<Box<Parent>>,"));
    assert!(code.contains("pub child: Option<Child>,"));
}

#[test]
fn test_names_are_unique_across_documents() {
    let docs = [
        doc(json!({"title": "Item", "properties": {"a": {"type": "string"}}})),
        doc(json!({"title": "Item", "properties": {"b": {"type": "string"}}})),
    ];
    let code = compile_documents(&docs, &GeneratorConfig::default()).expect("compile");
    assert!(code.contains("pub struct Item {"));
    assert!(code.contains("pub struct Item2 {"));
}

#[test]
fn test_cross_document_reference() {
    let main = SchemaDocument::new(
        "schemas/order.json",
        json!({"properties": {"id": {"$ref": "ids.json#/definitions/OrderId"}}}),
    );
    let ids = SchemaDocument::new(
        "schemas/ids.json",
        json!({"definitions": {"OrderId": {"type": "string"}}}),
    );
    let code = compile_documents(&[main, ids], &GeneratorConfig::default()).expect("compile");
    assert!(code.contains("pub type OrderId = String;"));
    assert!(code.contains("pub struct Order {"));
    assert!(code.contains("pub id: Option<OrderId>,"));
}

#[test]
fn test_package_wrapping_and_docs() {
    let schema = json!({
        "title": "Widget",
        "description": "A widget.",
        "properties": {"size": {"type": "number", "description": "Size in cm."}}
    });
    let config = GeneratorConfig::default().package("widgets");
    let code = compile_documents(&[doc(schema.clone())], &config).expect("compile");
    assert!(code.contains("pub mod widgets {"));
    assert!(code.contains("/// A widget."));
    assert!(code.contains("/// Size in cm."));

    let quiet = compile_documents(&[doc(schema)], &GeneratorConfig::default().docs(false)).expect("compile");
    assert!(!quiet.contains("A widget."));
}

#[test]
fn test_unresolved_reference_fails() {
    let result = compile(json!({"properties": {"pet": {"$ref": "#/definitions/Pet"}}}));
    match result {
        Err(CodegenError::Schema(SchemaError::UnresolvedRef { pointer, referrer })) => {
            assert_eq!(pointer, "#/definitions/Pet");
            assert_eq!(referrer, "-#/properties/pet");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_incompatible_all_of_fails() {
    let result = compile(json!({"allOf": [{"type": "string"}, {"type": "integer"}]}));
    assert!(matches!(
        result,
        Err(CodegenError::Schema(SchemaError::IncompatibleAllOf { .. }))
    ));
}

#[test]
fn test_invalid_keyword_combination_fails() {
    let result = compile(json!({"type": "string", "items": {"type": "string"}}));
    assert!(matches!(
        result,
        Err(CodegenError::Schema(SchemaError::InvalidKeywords { .. }))
    ));
}

#[test]
fn test_write_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("model.rs");
    let code = compile_documents(&[fixture()], &GeneratorConfig::default()).expect("compile");

    assert!(write_if_changed(&path, code.as_bytes()).expect("write"));
    let modified = std::fs::metadata(&path).and_then(|m| m.modified()).expect("mtime");

    let again = compile_documents(&[fixture()], &GeneratorConfig::default()).expect("compile");
    assert!(!write_if_changed(&path, again.as_bytes()).expect("write"));
    assert_eq!(std::fs::metadata(&path).and_then(|m| m.modified()).expect("mtime"), modified);
    assert_eq!(std::fs::read_to_string(&path).expect("read"), code);
}
