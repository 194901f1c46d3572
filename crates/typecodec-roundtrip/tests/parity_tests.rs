//! Parity tests: the inline and imported modules agree byte for byte, and
//! both agree with the reference codec driven by the same fixture schema.

use std::marker::PhantomData;

use serde_json::json;
use typecodec_eval::SchemaCodec;
use typecodec_roundtrip::inline::kernel::Codec as InlineCodec;
use typecodec_roundtrip::{imported, inline, FIXTURE_SCHEMA};
use typecodec_runtime::Codec;
use typecodec_types::{CustomTypeDefinition, Type};

fn schema() -> Vec<CustomTypeDefinition> {
    typecodec_compiler::check(FIXTURE_SCHEMA).unwrap()
}

/// Encode `json` as `type_name` with the reference codec, and check that
/// decoding the same bytes gives the JSON back.
fn reference_bytes(type_name: &str, json: serde_json::Value) -> Vec<u8> {
    let defs = schema();
    let codec = SchemaCodec::new(&defs);
    let ty = Type::named(type_name);
    let value = codec.value_from_json(&ty, &json).unwrap();
    let bytes = codec.to_bytes(&ty, &value).unwrap();
    let back = codec.from_bytes(&ty, &bytes).unwrap();
    assert_eq!(codec.value_to_json(&ty, &back).unwrap(), json);
    bytes
}

#[test]
fn test_fixture_schema_is_valid() {
    let defs = schema();
    assert_eq!(defs.len(), 11);
    let fingerprint = typecodec_compiler::fingerprint(&defs).unwrap();
    assert_eq!(fingerprint.len(), 64);
}

#[test]
fn test_account_parity() {
    let imported_value = imported::Account {
        id: imported::UserId::from_hex("756200c85a0ff28f08daa2d201d616a9").unwrap(),
        session: imported::SessionToken::from_hex(&"ab".repeat(32)).unwrap(),
        favorite: imported::Color::Blue,
        scores: imported::Pair {
            left: "best".to_string(),
            right: Err("none yet".to_string()),
        },
        history: imported::Tree {
            value: 10,
            children: vec![imported::Tree {
                value: 20,
                children: Vec::new(),
            }],
        },
        nickname: Some("ana".to_string()),
        avatar: vec![1, 2, 255],
        flags: vec![true, false],
        visits: 300,
    };
    let inline_value = inline::Account {
        id: inline::UserId::from_hex("756200c85a0ff28f08daa2d201d616a9").unwrap(),
        session: inline::SessionToken::from_hex(&"ab".repeat(32)).unwrap(),
        favorite: inline::Color::Blue,
        scores: inline::Pair {
            left: "best".to_string(),
            right: Err("none yet".to_string()),
        },
        history: inline::Tree {
            value: 10,
            children: vec![inline::Tree {
                value: 20,
                children: Vec::new(),
            }],
        },
        nickname: Some("ana".to_string()),
        avatar: vec![1, 2, 255],
        flags: vec![true, false],
        visits: 300,
    };

    let from_import = imported::AccountCodec.to_bytes(&imported_value);
    let from_inline = InlineCodec::to_bytes(&inline::AccountCodec, &inline_value);
    assert_eq!(from_import, from_inline);

    let reference = reference_bytes(
        "Account",
        json!({
            "id": "756200c85a0ff28f08daa2d201d616a9",
            "session": "ab".repeat(32),
            "favorite": "Blue",
            "scores": { "left": "best", "right": { "_": "Error", "error": "none yet" } },
            "history": { "value": 10, "children": [ { "value": 20, "children": [] } ] },
            "nickname": { "_": "Just", "value": "ana" },
            "avatar": [1, 2, 255],
            "flags": [true, false],
            "visits": 300
        }),
    );
    assert_eq!(from_import, reference);
}

#[test]
fn test_expr_parity() {
    let value = imported::Expr::sum(vec![
        imported::Expr::literal(5),
        imported::Expr::negate(Box::new(imported::Expr::ZERO)),
    ]);
    let inline_value = inline::Expr::sum(vec![
        inline::Expr::literal(5),
        inline::Expr::negate(Box::new(inline::Expr::ZERO)),
    ]);
    let bytes = imported::ExprCodec.to_bytes(&value);
    assert_eq!(bytes, InlineCodec::to_bytes(&inline::ExprCodec, &inline_value));

    let reference = reference_bytes(
        "Expr",
        json!({
            "_": "Sum",
            "value": [
                { "_": "Literal", "value": 5 },
                { "_": "Negate", "value": { "_": "Zero" } }
            ]
        }),
    );
    assert_eq!(bytes, reference);
}

#[test]
fn test_unused_parameter_parity() {
    let value = imported::Session {
        owner: imported::UserId::from_hex("00000000000000000000000000000001").unwrap(),
        tagged: imported::Tagged {
            value: 300,
            _marker: PhantomData,
        },
        signal: imported::Signal::OFF,
    };
    let bytes = imported::SessionCodec.to_bytes(&value);

    let reference = reference_bytes(
        "Session",
        json!({
            "owner": "00000000000000000000000000000001",
            "tagged": { "value": 300 },
            "signal": { "_": "Off" }
        }),
    );
    assert_eq!(bytes, reference);
}

#[test]
fn test_reference_bytes_decode_with_generated_codec() {
    let bytes = reference_bytes(
        "Keywords",
        json!({ "type": "kind", "self": false, "match": -64 }),
    );
    let decoded = imported::KeywordsCodec.from_bytes(&bytes).unwrap();
    assert_eq!(decoded.r#type, "kind");
    assert!(!decoded.self_);
    assert_eq!(decoded.r#match, -64);
}
