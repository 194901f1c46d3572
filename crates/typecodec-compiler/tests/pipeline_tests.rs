//! End-to-end pipeline tests: schema JSON → validate → generate, and the
//! JSON result shape consumed by tooling.

use typecodec_codegen::GenerateOptions;
use typecodec_compiler::{
    check, compile, compile_json, compile_to_result, fingerprint, parse_schema, CompileError,
    CompileResult, Stage, VERSION,
};

// ══════════════════════════════════════════════════════════════════════════════
// Schemas
// ══════════════════════════════════════════════════════════════════════════════

const ACCOUNTS: &str = r#"[
  {
    "name": "Account",
    "description": "A customer account.",
    "body": { "product": [
      { "name": "id", "type": { "Id": "AccountId" } },
      { "name": "owner", "type": "String" },
      { "name": "balance", "type": "Int32" },
      { "name": "status", "type": { "Custom": { "name": "Status" } } },
      { "name": "history", "type": { "List": { "Custom": { "name": "Transfer" } } } }
    ] }
  },
  {
    "name": "Status",
    "body": { "sum": [ { "name": "Open" }, { "name": "Frozen" }, { "name": "Closed" } ] }
  },
  {
    "name": "Transfer",
    "body": { "sum": [
      { "name": "Deposit", "parameter": "UInt32" },
      { "name": "Withdrawal", "parameter": "UInt32" },
      { "name": "Reversal", "parameter": { "Result": [ "UInt32", "String" ] } }
    ] }
  }
]"#;

const BAD_ARITY: &str = r#"[
  { "name": "Pair", "typeParameterList": ["a", "b"], "body": { "product": [
      { "name": "first", "type": { "Parameter": "a" } },
      { "name": "second", "type": { "Parameter": "b" } }
  ] } },
  { "name": "Holder", "body": { "product": [
      { "name": "pair", "type": { "Custom": { "name": "Pair", "arguments": ["Int32"] } } }
  ] } }
]"#;

// ══════════════════════════════════════════════════════════════════════════════
// compile
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_compile_rust_output() {
    let out = compile_json(ACCOUNTS, &GenerateOptions::default()).unwrap();
    let source = &out.source;

    assert!(source.starts_with("// Code generated by typecodec"));
    assert!(source.contains(&format!("// schema fingerprint: {}\n", out.fingerprint)));
    assert!(source.contains("use typecodec_runtime::{"));
    assert!(source.contains("pub struct AccountId(String);"));
    assert!(source.contains("pub struct Account {"));
    assert!(source.contains("pub enum Status {"));
    assert!(source.contains("pub enum Transfer {"));
    assert!(source.contains("pub struct TransferCodec;"));
    assert!(source.ends_with('\n'));
}

#[test]
fn test_compile_inline_kernel_is_self_contained() {
    let out = compile_json(ACCOUNTS, &GenerateOptions::inline()).unwrap();
    assert!(!out.source.contains("typecodec_runtime"));
    assert!(out.source.contains("pub mod kernel {"));
}

#[test]
fn test_compile_elm_output() {
    let out = compile_json(ACCOUNTS, &GenerateOptions::elm("Accounts")).unwrap();
    assert!(out.source.starts_with("module Accounts exposing"));
    assert!(out.source.contains("type alias Account ="));
    assert!(!out.source.contains("// Code generated"));
}

#[test]
fn test_unused_parameter_compiles() {
    let json = r#"[{"name":"Tagged","typeParameterList":["unit"],"body":{"product":[{"name":"value","type":"Int32"}]}}]"#;
    let out = compile_json(json, &GenerateOptions::default()).unwrap();
    assert!(out.source.contains("pub _marker: std::marker::PhantomData<Unit>,"));
    assert!(compile_json(json, &GenerateOptions::elm("Units")).is_ok());
}

#[test]
fn test_check_returns_definitions() {
    let defs = check(ACCOUNTS).unwrap();
    let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Account", "Status", "Transfer"]);
}

#[test]
fn test_invalid_schema_fails_before_emission() {
    let err = compile_json(BAD_ARITY, &GenerateOptions::default()).unwrap_err();
    assert_eq!(err.stage(), Stage::Validate);
    match err {
        CompileError::Schema(schema) => assert_eq!(schema.code.to_string(), "E301"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_reserved_name_is_codegen_error() {
    let json = r#"[{ "name": "Codec", "body": { "product": [ { "name": "x", "type": "Int32" } ] } }]"#;
    let err = compile_json(json, &GenerateOptions::default()).unwrap_err();
    assert_eq!(err.stage(), Stage::Generate);
}

#[test]
fn test_malformed_json_is_parse_error() {
    let err = parse_schema(r#"[{ "name": "X" }]"#).unwrap_err();
    assert_eq!(err.stage(), Stage::Parse);
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_compile_determinism_100_iterations() {
    let defs = parse_schema(ACCOUNTS).unwrap();
    let first = compile(&defs, &GenerateOptions::default()).unwrap();
    for i in 0..100 {
        let again = compile(&defs, &GenerateOptions::default()).unwrap();
        assert_eq!(first, again, "Determinism failure at iteration {i}");
    }
}

#[test]
fn test_fingerprint_ignores_whitespace() {
    let compact: String = ACCOUNTS.split_whitespace().collect::<Vec<_>>().join(" ");
    let a = fingerprint(&parse_schema(ACCOUNTS).unwrap()).unwrap();
    let b = fingerprint(&parse_schema(&compact).unwrap()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_fingerprint_tracks_schema_changes() {
    let changed = ACCOUNTS.replace("\"Frozen\"", "\"Suspended\"");
    let a = fingerprint(&parse_schema(ACCOUNTS).unwrap()).unwrap();
    let b = fingerprint(&parse_schema(&changed).unwrap()).unwrap();
    assert_ne!(a, b);
}

// ══════════════════════════════════════════════════════════════════════════════
// CompileResult JSON
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_compile_to_result_success() {
    let result = compile_to_result(ACCOUNTS, &GenerateOptions::default());
    assert!(result.success);
    assert!(result.errors.is_empty());
    assert_eq!(result.compiler_version, VERSION);
    assert!(result.output.as_deref().unwrap().contains("pub struct Account {"));
    assert_eq!(result.fingerprint.as_ref().map(String::len), Some(64));
}

#[test]
fn test_compile_to_result_failure_json() {
    let result = compile_to_result(BAD_ARITY, &GenerateOptions::default());
    assert!(!result.success);
    assert!(result.output.is_none());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], false);
    assert!(json.get("output").is_none());
    let error = &json["errors"][0];
    assert_eq!(error["stage"], "validate");
    assert_eq!(error["code"], "E301");
    assert_eq!(error["category"], "reference");
    assert_eq!(error["path"], "Holder.members.pair");
}

#[test]
fn test_compile_result_json_roundtrip() {
    let result = compile_to_result(BAD_ARITY, &GenerateOptions::default());
    let json = serde_json::to_string(&result).unwrap();
    let back: CompileResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
