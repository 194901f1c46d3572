//! Dynamic values for the reference codec.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A value of some schema type, untyped until paired with a [`Type`].
///
/// [`Type`]: typecodec_types::Type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Int32(i32),
    UInt32(u32),
    String(String),
    Bool(bool),
    Binary(Vec<u8>),
    /// `Id` or `Token` text; lowercase hex once normalized.
    Hex(String),
    List(Vec<Value>),
    Maybe(Option<Box<Value>>),
    Result(Result<Box<Value>, Box<Value>>),
    /// Product value, keyed by member name.
    Record(BTreeMap<String, Value>),
    /// Sum value: the chosen pattern and its payload, if any.
    Variant {
        pattern: String,
        payload: Option<Box<Value>>,
    },
}

impl Value {
    pub fn just(value: Value) -> Self {
        Value::Maybe(Some(Box::new(value)))
    }

    pub fn nothing() -> Self {
        Value::Maybe(None)
    }

    pub fn ok(value: Value) -> Self {
        Value::Result(Ok(Box::new(value)))
    }

    pub fn error(value: Value) -> Self {
        Value::Result(Err(Box::new(value)))
    }

    pub fn tag(pattern: impl Into<String>) -> Self {
        Value::Variant {
            pattern: pattern.into(),
            payload: None,
        }
    }

    pub fn variant(pattern: impl Into<String>, payload: Value) -> Self {
        Value::Variant {
            pattern: pattern.into(),
            payload: Some(Box::new(payload)),
        }
    }

    /// Build a record from `(member, value)` pairs.
    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int32(_) => "Int32",
            Value::UInt32(_) => "UInt32",
            Value::String(_) => "String",
            Value::Bool(_) => "Bool",
            Value::Binary(_) => "Binary",
            Value::Hex(_) => "hex string",
            Value::List(_) => "List",
            Value::Maybe(_) => "Maybe",
            Value::Result(_) => "Result",
            Value::Record(_) => "record",
            Value::Variant { .. } => "variant",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int32(n) => write!(f, "{n}"),
            Value::UInt32(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Binary(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Value::Hex(text) => write!(f, "{text}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Maybe(Some(inner)) => write!(f, "Just({inner})"),
            Value::Maybe(None) => write!(f, "Nothing"),
            Value::Result(Ok(inner)) => write!(f, "Ok({inner})"),
            Value::Result(Err(inner)) => write!(f, "Error({inner})"),
            Value::Record(fields) => {
                write!(f, "{{ ")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, " }}")
            }
            Value::Variant {
                pattern,
                payload: Some(payload),
            } => write!(f, "{pattern}({payload})"),
            Value::Variant {
                pattern,
                payload: None,
            } => write!(f, "{pattern}"),
        }
    }
}
