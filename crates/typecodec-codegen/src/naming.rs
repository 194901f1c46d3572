//! Schema names → Rust identifiers.
//!
//! Type, pattern and Id/Token names are already UpperCamel and pass
//! through untouched. Member and parameter names are lowerCamel and are
//! converted with `heck`.

use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};

/// Names the generated module brings into scope or relies on from the
/// prelude. A schema type, Id or Token named like one of these would
/// shadow it.
pub const RESERVED_TYPE_NAMES: &[(&str, &str)] = &[
    ("Self", "Rust keyword"),
    ("String", "prelude type"),
    ("Vec", "prelude type"),
    ("Box", "prelude type"),
    ("Option", "prelude type"),
    ("Some", "prelude variant"),
    ("None", "prelude variant"),
    ("Result", "prelude type"),
    ("Ok", "prelude variant"),
    ("Err", "prelude variant"),
    ("Codec", "kernel trait"),
    ("Decoded", "kernel type"),
    ("DecodeError", "kernel type"),
    ("UInt32Codec", "kernel codec"),
    ("Int32Codec", "kernel codec"),
    ("BoolCodec", "kernel codec"),
    ("StringCodec", "kernel codec"),
    ("BinaryCodec", "kernel codec"),
    ("HexStringCodec", "kernel codec"),
    ("ListCodec", "kernel codec"),
    ("BoxCodec", "kernel codec"),
    ("MaybeCodec", "wrapper codec"),
    ("ResultCodec", "wrapper codec"),
];

/// Kernel symbols every generated module imports.
pub const KERNEL_IMPORTS: &[&str] = &[
    "BinaryCodec",
    "BoolCodec",
    "BoxCodec",
    "Codec",
    "DecodeError",
    "Decoded",
    "Int32Codec",
    "ListCodec",
    "StringCodec",
    "UInt32Codec",
    "decode_hex_string",
    "encode_hex_string",
    "is_hex_string",
];

/// Wrapper codecs, imported separately from the kernel.
pub const WRAPPER_IMPORTS: &[&str] = &["MaybeCodec", "ResultCodec"];

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "gen", "macro", "override", "priv", "try",
    "typeof", "unsized", "virtual", "yield",
];

// Keywords that cannot be written as raw identifiers.
const PATH_KEYWORDS: &[&str] = &["crate", "self", "super"];

/// Why `name` may not name a schema type, Id or Token, if it may not.
pub fn reserved_reason(name: &str) -> Option<&'static str> {
    RESERVED_TYPE_NAMES
        .iter()
        .find(|(reserved, _)| *reserved == name)
        .map(|(_, reason)| *reason)
}

/// Codec struct name for a type, Id or Token.
pub fn codec_name(type_name: &str) -> String {
    format!("{type_name}Codec")
}

/// Make a snake_case word usable as an identifier.
pub fn escape_identifier(word: String) -> String {
    if PATH_KEYWORDS.contains(&word.as_str()) {
        format!("{word}_")
    } else if KEYWORDS.contains(&word.as_str()) {
        format!("r#{word}")
    } else {
        word
    }
}

/// Struct field (or codec field) for a member or type parameter.
pub fn field_name(member: &str) -> String {
    escape_identifier(member.to_snake_case())
}

/// Local binding holding a decoded member.
pub fn decoded_binding(member: &str) -> String {
    format!("decoded_{}", member.to_snake_case())
}

/// Constructor function for a sum pattern with a payload.
pub fn constructor_name(pattern: &str) -> String {
    escape_identifier(pattern.to_snake_case())
}

/// Associated constant for a unit pattern of a sum with payloads.
pub fn constant_name(pattern: &str) -> String {
    pattern.to_shouty_snake_case()
}

/// Generic type parameter name. `taken` holds every type-level symbol in
/// scope; a clash gets a `Param` suffix.
pub fn generic_name(parameter: &str, taken: &dyn Fn(&str) -> bool) -> String {
    let base = parameter.to_upper_camel_case();
    if taken(&base) || reserved_reason(&base).is_some() {
        format!("{base}Param")
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(field_name("userName"), "user_name");
        assert_eq!(field_name("id"), "id");
        assert_eq!(field_name("type"), "r#type");
        assert_eq!(field_name("self"), "self_");
        assert_eq!(field_name("httpURL"), "http_url");
    }

    #[test]
    fn test_decoded_binding_strips_raw_prefix() {
        assert_eq!(decoded_binding("type"), "decoded_type");
        assert_eq!(decoded_binding("createdAt"), "decoded_created_at");
    }

    #[test]
    fn test_pattern_helpers() {
        assert_eq!(constructor_name("HttpError"), "http_error");
        assert_eq!(constructor_name("Loop"), "r#loop");
        assert_eq!(constant_name("NotFound"), "NOT_FOUND");
    }

    #[test]
    fn test_generic_name_avoids_taken_symbols() {
        let taken = |name: &str| name == "Element";
        assert_eq!(generic_name("value", &taken), "Value");
        assert_eq!(generic_name("element", &taken), "ElementParam");
        assert_eq!(generic_name("ok", &taken), "OkParam");
    }

    #[test]
    fn test_reserved_names() {
        assert_eq!(reserved_reason("Option"), Some("prelude type"));
        assert_eq!(reserved_reason("Codec"), Some("kernel trait"));
        assert_eq!(reserved_reason("User"), None);
    }
}
