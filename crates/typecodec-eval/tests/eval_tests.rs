//! Integration tests for the reference codec.
//!
//! Tests cover:
//! - byte parity with the runtime's typed codecs
//! - generic and recursive custom types
//! - the JSON value shape
//! - rejection of malformed values and bytes

use proptest::prelude::*;
use serde_json::json;
use typecodec_eval::{decode_value, encode_value, EvalError, SchemaCodec, Value};
use typecodec_runtime::{
    Codec, DecodeError, Int32Codec, ListCodec, MaybeCodec, ResultCodec, StringCodec, UInt32Codec,
};
use typecodec_types::{CustomTypeDefinition, Type};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

const SCHEMA: &str = r#"[
  { "name": "Color", "body": { "sum": [ { "name": "Red" }, { "name": "Green" }, { "name": "Blue" } ] } },
  { "name": "Pair", "typeParameterList": ["first", "second"], "body": { "product": [
      { "name": "first", "type": { "Parameter": "first" } },
      { "name": "second", "type": { "Parameter": "second" } }
  ] } },
  { "name": "Tree", "typeParameterList": ["value"], "body": { "product": [
      { "name": "value", "type": { "Parameter": "value" } },
      { "name": "children", "type": { "List": { "Custom": { "name": "Tree", "arguments": [ { "Parameter": "value" } ] } } } }
  ] } },
  { "name": "Expr", "body": { "sum": [
      { "name": "Literal", "parameter": "Int32" },
      { "name": "Negate", "parameter": { "Custom": { "name": "Expr" } } },
      { "name": "Hole" }
  ] } },
  { "name": "User", "body": { "product": [
      { "name": "id", "type": { "Id": "UserId" } },
      { "name": "name", "type": "String" },
      { "name": "favorite", "type": { "Maybe": { "Custom": { "name": "Color" } } } },
      { "name": "avatar", "type": "Binary" }
  ] } }
]"#;

fn schema() -> Vec<CustomTypeDefinition> {
    serde_json::from_str(SCHEMA).unwrap()
}

fn round_trip(defs: &[CustomTypeDefinition], ty: &Type, value: &Value) -> Vec<u8> {
    let bytes = encode_value(defs, ty, value).unwrap();
    let back = decode_value(defs, ty, &bytes).unwrap();
    assert_eq!(&back, value);
    bytes
}

fn user_id() -> String {
    "0123456789abcdef0123456789abcdef".to_string()
}

// ══════════════════════════════════════════════════════════════════════════════
// Parity with the runtime codecs
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_list_of_maybe_matches_runtime() {
    let ty = Type::list(Type::maybe(Type::Int32));
    let value = Value::List(vec![
        Value::just(Value::Int32(1)),
        Value::nothing(),
        Value::just(Value::Int32(-5)),
    ]);
    let bytes = round_trip(&[], &ty, &value);
    assert_eq!(bytes, vec![3, 0, 1, 1, 0, 0x7b]);

    let typed = ListCodec::new(MaybeCodec::new(Int32Codec)).to_bytes(&vec![Some(1), None, Some(-5)]);
    assert_eq!(bytes, typed);
}

#[test]
fn test_result_matches_runtime() {
    let ty = Type::result(Type::UInt32, Type::String);
    let codec = ResultCodec::new(UInt32Codec, StringCodec);

    let ok = round_trip(&[], &ty, &Value::ok(Value::UInt32(300)));
    assert_eq!(ok, codec.to_bytes(&Ok(300)));

    let err = round_trip(&[], &ty, &Value::error(Value::String("no".into())));
    assert_eq!(err, codec.to_bytes(&Err("no".to_string())));
}

// ══════════════════════════════════════════════════════════════════════════════
// Custom types
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_tag_only_sum_indices() {
    let defs = schema();
    let ty = Type::named("Color");
    assert_eq!(round_trip(&defs, &ty, &Value::tag("Red")), vec![0]);
    assert_eq!(round_trip(&defs, &ty, &Value::tag("Green")), vec![1]);
    assert_eq!(round_trip(&defs, &ty, &Value::tag("Blue")), vec![2]);
}

#[test]
fn test_generic_pair() {
    let defs = schema();
    let ty = Type::custom("Pair", vec![Type::String, Type::Int32]);
    let value = Value::record([
        ("first", Value::String("hi".into())),
        ("second", Value::Int32(-1)),
    ]);
    assert_eq!(round_trip(&defs, &ty, &value), vec![2, b'h', b'i', 0x7f]);
}

#[test]
fn test_recursive_generic_tree() {
    let defs = schema();
    let ty = Type::custom("Tree", vec![Type::UInt32]);
    let leaf = |n: u32| {
        Value::record([("value", Value::UInt32(n)), ("children", Value::List(vec![]))])
    };
    let value = Value::record([
        ("value", Value::UInt32(1)),
        ("children", Value::List(vec![leaf(3), leaf(4)])),
    ]);
    assert_eq!(round_trip(&defs, &ty, &value), vec![1, 2, 3, 0, 4, 0]);
}

#[test]
fn test_recursive_sum() {
    let defs = schema();
    let ty = Type::named("Expr");
    let value = Value::variant(
        "Negate",
        Value::variant("Negate", Value::variant("Literal", Value::Int32(5))),
    );
    assert_eq!(round_trip(&defs, &ty, &value), vec![1, 1, 0, 5]);
    assert_eq!(round_trip(&defs, &ty, &Value::tag("Hole")), vec![2]);
}

#[test]
fn test_product_with_hex_and_binary() {
    let defs = schema();
    let ty = Type::named("User");
    let value = Value::record([
        ("id", Value::Hex(user_id())),
        ("name", Value::String("ada".into())),
        ("favorite", Value::just(Value::tag("Blue"))),
        ("avatar", Value::Binary(vec![0, 255])),
    ]);
    let bytes = round_trip(&defs, &ty, &value);
    assert_eq!(bytes.len(), 16 + 4 + 2 + 3);
    assert_eq!(&bytes[..2], &[0x01, 0x23]);
}

// ══════════════════════════════════════════════════════════════════════════════
// JSON shape
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_json_shape_of_product() {
    let defs = schema();
    let codec = SchemaCodec::new(&defs);
    let ty = Type::named("User");
    let value = Value::record([
        ("id", Value::Hex(user_id())),
        ("name", Value::String("ada".into())),
        ("favorite", Value::nothing()),
        ("avatar", Value::Binary(vec![1, 2])),
    ]);
    let json = codec.value_to_json(&ty, &value).unwrap();
    assert_eq!(
        json,
        json!({
            "id": user_id(),
            "name": "ada",
            "favorite": { "_": "Nothing" },
            "avatar": [1, 2]
        })
    );
    assert_eq!(codec.value_from_json(&ty, &json).unwrap(), value);
}

#[test]
fn test_json_shape_of_sums() {
    let defs = schema();
    let codec = SchemaCodec::new(&defs);
    assert_eq!(
        codec.value_to_json(&Type::named("Color"), &Value::tag("Green")).unwrap(),
        json!("Green")
    );
    let expr = Value::variant("Literal", Value::Int32(7));
    let json = codec.value_to_json(&Type::named("Expr"), &expr).unwrap();
    assert_eq!(json, json!({ "_": "Literal", "value": 7 }));
    assert_eq!(
        codec.value_to_json(&Type::named("Expr"), &Value::tag("Hole")).unwrap(),
        json!({ "_": "Hole" })
    );
}

#[test]
fn test_json_unknown_pattern() {
    let defs = schema();
    let codec = SchemaCodec::new(&defs);
    let err = codec.value_from_json(&Type::named("Color"), &json!("Purple")).unwrap_err();
    assert_eq!(
        err,
        EvalError::UnknownPattern {
            type_name: "Color".into(),
            pattern: "Purple".into()
        }
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Rejections
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_type_mismatch_reports_path() {
    let defs = schema();
    let ty = Type::custom("Pair", vec![Type::String, Type::Int32]);
    let value = Value::record([
        ("first", Value::String("x".into())),
        ("second", Value::Bool(true)),
    ]);
    let err = encode_value(&defs, &ty, &value).unwrap_err();
    assert_eq!(
        err,
        EvalError::TypeMismatch {
            path: "value.second".into(),
            expected: "Int32".into(),
            found: "Bool".into()
        }
    );
}

#[test]
fn test_unknown_discriminant() {
    let defs = schema();
    let err = decode_value(&defs, &Type::named("Color"), &[3]).unwrap_err();
    assert_eq!(
        err,
        EvalError::UnknownPatternIndex {
            type_name: "Color".into(),
            index: 3
        }
    );
}

#[test]
fn test_trailing_bytes() {
    let err = decode_value(&[], &Type::Bool, &[1, 0]).unwrap_err();
    assert_eq!(err, EvalError::Decode(DecodeError::TrailingBytes { offset: 1, len: 2 }));
}

#[test]
fn test_truncated_input() {
    let defs = schema();
    let err = decode_value(&defs, &Type::named("User"), &[0x01, 0x23]).unwrap_err();
    assert!(matches!(err, EvalError::Decode(DecodeError::UnexpectedEnd { .. })));
}

#[test]
fn test_invalid_hex_value() {
    let defs = schema();
    let err = encode_value(&defs, &Type::id("UserId"), &Value::Hex("xyz".into())).unwrap_err();
    assert!(matches!(err, EvalError::InvalidHex { kind: "Id", digits: 32, .. }));
}

// ══════════════════════════════════════════════════════════════════════════════
// Properties
// ══════════════════════════════════════════════════════════════════════════════

proptest! {
    /// Dynamic and typed encodings agree on arbitrary lists of strings.
    #[test]
    fn string_list_parity(items in proptest::collection::vec(".{0,12}", 0..8)) {
        let ty = Type::list(Type::String);
        let value = Value::List(items.iter().cloned().map(Value::String).collect());
        let dynamic = encode_value(&[], &ty, &value).unwrap();
        let typed = ListCodec::new(StringCodec).to_bytes(&items);
        prop_assert_eq!(&dynamic, &typed);
        prop_assert_eq!(decode_value(&[], &ty, &dynamic).unwrap(), value);
    }

    /// Decoding arbitrary bytes against a recursive schema never panics.
    #[test]
    fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let defs = schema();
        let _ = decode_value(&defs, &Type::custom("Tree", vec![Type::named("Expr")]), &bytes);
    }
}
