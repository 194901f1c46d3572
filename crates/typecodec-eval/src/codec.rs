//! Schema-driven binary codec over [`Value`]s.
//!
//! Walks a [`Type`] and the definitions it references at run time, producing
//! the same bytes as the generated codecs. Primitive layouts come from the
//! runtime kernel; this module only composes them.

use typecodec_runtime::{
    decode_hex_string, encode_hex_string, is_hex_string, BinaryCodec, BoolCodec, Codec,
    DecodeError, Decoded, Int32Codec, StringCodec, UInt32Codec,
};
use typecodec_types::{
    CustomTypeDefinition, CustomTypeDefinitionBody, DefinitionIndex, HexKind, Type,
};

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

/// Nesting limit applied unless overridden with [`SchemaCodec::with_max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Reference codec for one schema.
#[derive(Debug, Clone)]
pub struct SchemaCodec<'a> {
    index: DefinitionIndex<'a>,
    max_depth: usize,
}

impl<'a> SchemaCodec<'a> {
    /// `definitions` must already be validated.
    pub fn new(definitions: &'a [CustomTypeDefinition]) -> Self {
        Self {
            index: DefinitionIndex::new(definitions),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Append the encoding of `value` as `ty` to `out`.
    pub fn encode(&self, ty: &Type, value: &Value, out: &mut Vec<u8>) -> EvalResult<()> {
        self.encode_at(ty, value, out, "value", 0)
    }

    /// Decode one `ty` starting at `offset`.
    pub fn decode(&self, ty: &Type, offset: usize, bytes: &[u8]) -> EvalResult<Decoded<Value>> {
        self.decode_at(ty, offset, bytes, 0)
    }

    pub fn to_bytes(&self, ty: &Type, value: &Value) -> EvalResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode(ty, value, &mut out)?;
        tracing::trace!(ty = %ty, bytes = out.len(), "encoded value");
        Ok(out)
    }

    /// Decode exactly one `ty` spanning all of `bytes`.
    pub fn from_bytes(&self, ty: &Type, bytes: &[u8]) -> EvalResult<Value> {
        let decoded = self.decode(ty, 0, bytes)?;
        if decoded.next_offset != bytes.len() {
            return Err(DecodeError::TrailingBytes {
                offset: decoded.next_offset,
                len: bytes.len(),
            }
            .into());
        }
        tracing::trace!(ty = %ty, bytes = bytes.len(), "decoded value");
        Ok(decoded.result)
    }

    pub(crate) fn definition(&self, name: &str) -> EvalResult<&'a CustomTypeDefinition> {
        self.index
            .get(name)
            .ok_or_else(|| EvalError::UnknownType(name.to_string()))
    }

    pub(crate) fn check_depth(&self, depth: usize) -> EvalResult<()> {
        if depth > self.max_depth {
            return Err(EvalError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }

    // ── Encoding ────────────────────────────────────────────────────────────

    fn encode_at(
        &self,
        ty: &Type,
        value: &Value,
        out: &mut Vec<u8>,
        path: &str,
        depth: usize,
    ) -> EvalResult<()> {
        self.check_depth(depth)?;
        match (ty, value) {
            (Type::Int32, Value::Int32(n)) => Int32Codec.encode(n, out),
            (Type::UInt32, Value::UInt32(n)) => UInt32Codec.encode(n, out),
            (Type::String, Value::String(s)) => StringCodec.encode(s, out),
            (Type::Bool, Value::Bool(b)) => BoolCodec.encode(b, out),
            (Type::Binary, Value::Binary(b)) => BinaryCodec.encode(b, out),
            (Type::Id(_) | Type::Token(_), Value::Hex(text)) => {
                let kind = hex_kind(ty);
                if !is_hex_string(kind.byte_size(), text) {
                    return Err(invalid_hex(path, kind));
                }
                encode_hex_string(kind.byte_size(), text, out);
            }
            (Type::List(element), Value::List(items)) => {
                UInt32Codec.encode(&count(items.len()), out);
                for (i, item) in items.iter().enumerate() {
                    self.encode_at(element, item, out, &format!("{path}[{i}]"), depth + 1)?;
                }
            }
            (Type::Maybe(inner), Value::Maybe(slot)) => match slot {
                Some(present) => {
                    UInt32Codec.encode(&0, out);
                    self.encode_at(inner, present, out, path, depth + 1)?;
                }
                None => UInt32Codec.encode(&1, out),
            },
            (Type::Result(ok, error), Value::Result(outcome)) => match outcome {
                Ok(v) => {
                    UInt32Codec.encode(&0, out);
                    self.encode_at(ok, v, out, path, depth + 1)?;
                }
                Err(e) => {
                    UInt32Codec.encode(&1, out);
                    self.encode_at(error, e, out, path, depth + 1)?;
                }
            },
            (Type::Custom { name, arguments }, _) => {
                return self.encode_custom(name, arguments, value, out, path, depth);
            }
            (Type::Parameter(name), _) => return Err(EvalError::FreeParameter(name.clone())),
            _ => return Err(mismatch(path, ty, value)),
        }
        Ok(())
    }

    fn encode_custom(
        &self,
        name: &str,
        arguments: &[Type],
        value: &Value,
        out: &mut Vec<u8>,
        path: &str,
        depth: usize,
    ) -> EvalResult<()> {
        let def = self.definition(name)?;
        match (&def.body, value) {
            (CustomTypeDefinitionBody::Product(members), Value::Record(fields)) => {
                for member in members {
                    let field = fields.get(&member.name).ok_or_else(|| EvalError::MissingMember {
                        path: path.to_string(),
                        member: member.name.clone(),
                    })?;
                    let ty = member.ty.substitute(&def.type_parameter_list, arguments);
                    let child = format!("{path}.{}", member.name);
                    self.encode_at(&ty, field, out, &child, depth + 1)?;
                }
                Ok(())
            }
            (CustomTypeDefinitionBody::Sum(patterns), Value::Variant { pattern, payload }) => {
                let (index, declared) = patterns
                    .iter()
                    .enumerate()
                    .find(|(_, p)| &p.name == pattern)
                    .ok_or_else(|| EvalError::UnknownPattern {
                        type_name: name.to_string(),
                        pattern: pattern.clone(),
                    })?;
                UInt32Codec.encode(&count(index), out);
                match (&declared.parameter, payload) {
                    (Some(ty), Some(payload)) => {
                        let ty = ty.substitute(&def.type_parameter_list, arguments);
                        let child = format!("{path}.{pattern}");
                        self.encode_at(&ty, payload, out, &child, depth + 1)
                    }
                    (None, None) => Ok(()),
                    (Some(_), None) => Err(payload_mismatch(name, pattern, "requires a payload")),
                    (None, Some(_)) => Err(payload_mismatch(name, pattern, "takes no payload")),
                }
            }
            _ => Err(EvalError::TypeMismatch {
                path: path.to_string(),
                expected: name.to_string(),
                found: value.kind().to_string(),
            }),
        }
    }

    // ── Decoding ────────────────────────────────────────────────────────────

    fn decode_at(
        &self,
        ty: &Type,
        offset: usize,
        bytes: &[u8],
        depth: usize,
    ) -> EvalResult<Decoded<Value>> {
        self.check_depth(depth)?;
        let decoded = match ty {
            Type::Int32 => Int32Codec.decode(offset, bytes)?.map(Value::Int32),
            Type::UInt32 => UInt32Codec.decode(offset, bytes)?.map(Value::UInt32),
            Type::String => StringCodec.decode(offset, bytes)?.map(Value::String),
            Type::Bool => BoolCodec.decode(offset, bytes)?.map(Value::Bool),
            Type::Binary => BinaryCodec.decode(offset, bytes)?.map(Value::Binary),
            Type::Id(_) | Type::Token(_) => {
                decode_hex_string(hex_kind(ty).byte_size(), offset, bytes)?.map(Value::Hex)
            }
            Type::List(element) => {
                let length = UInt32Codec.decode(offset, bytes)?;
                let mut items = Vec::new();
                let mut next = length.next_offset;
                for _ in 0..length.result {
                    let item = self.decode_at(element, next, bytes, depth + 1)?;
                    next = item.next_offset;
                    items.push(item.result);
                }
                Decoded {
                    result: Value::List(items),
                    next_offset: next,
                }
            }
            Type::Maybe(inner) => {
                let tag = UInt32Codec.decode(offset, bytes)?;
                match tag.result {
                    0 => self.decode_at(inner, tag.next_offset, bytes, depth + 1)?.map(Value::just),
                    1 => Decoded {
                        result: Value::nothing(),
                        next_offset: tag.next_offset,
                    },
                    index => {
                        return Err(DecodeError::UnknownPattern {
                            type_name: "Maybe",
                            index,
                        }
                        .into())
                    }
                }
            }
            Type::Result(ok, error) => {
                let tag = UInt32Codec.decode(offset, bytes)?;
                match tag.result {
                    0 => self.decode_at(ok, tag.next_offset, bytes, depth + 1)?.map(Value::ok),
                    1 => self.decode_at(error, tag.next_offset, bytes, depth + 1)?.map(Value::error),
                    index => {
                        return Err(DecodeError::UnknownPattern {
                            type_name: "Result",
                            index,
                        }
                        .into())
                    }
                }
            }
            Type::Custom { name, arguments } => {
                return self.decode_custom(name, arguments, offset, bytes, depth)
            }
            Type::Parameter(name) => return Err(EvalError::FreeParameter(name.clone())),
        };
        Ok(decoded)
    }

    fn decode_custom(
        &self,
        name: &str,
        arguments: &[Type],
        offset: usize,
        bytes: &[u8],
        depth: usize,
    ) -> EvalResult<Decoded<Value>> {
        let def = self.definition(name)?;
        match &def.body {
            CustomTypeDefinitionBody::Product(members) => {
                let mut fields = std::collections::BTreeMap::new();
                let mut next = offset;
                for member in members {
                    let ty = member.ty.substitute(&def.type_parameter_list, arguments);
                    let field = self.decode_at(&ty, next, bytes, depth + 1)?;
                    next = field.next_offset;
                    fields.insert(member.name.clone(), field.result);
                }
                Ok(Decoded {
                    result: Value::Record(fields),
                    next_offset: next,
                })
            }
            CustomTypeDefinitionBody::Sum(patterns) => {
                let tag = UInt32Codec.decode(offset, bytes)?;
                let pattern = usize::try_from(tag.result)
                    .ok()
                    .and_then(|i| patterns.get(i))
                    .ok_or_else(|| EvalError::UnknownPatternIndex {
                        type_name: name.to_string(),
                        index: tag.result,
                    })?;
                match &pattern.parameter {
                    Some(ty) => {
                        let ty = ty.substitute(&def.type_parameter_list, arguments);
                        let payload = self.decode_at(&ty, tag.next_offset, bytes, depth + 1)?;
                        Ok(payload.map(|p| Value::variant(pattern.name.clone(), p)))
                    }
                    None => Ok(Decoded {
                        result: Value::tag(pattern.name.clone()),
                        next_offset: tag.next_offset,
                    }),
                }
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Convenience
// ══════════════════════════════════════════════════════════════════════════════

/// Encode `value` as `ty` under `definitions`.
pub fn encode_value(
    definitions: &[CustomTypeDefinition],
    ty: &Type,
    value: &Value,
) -> EvalResult<Vec<u8>> {
    SchemaCodec::new(definitions).to_bytes(ty, value)
}

/// Decode `bytes` as exactly one `ty` under `definitions`.
pub fn decode_value(
    definitions: &[CustomTypeDefinition],
    ty: &Type,
    bytes: &[u8],
) -> EvalResult<Value> {
    SchemaCodec::new(definitions).from_bytes(ty, bytes)
}

pub(crate) fn hex_kind(ty: &Type) -> HexKind {
    match ty {
        Type::Token(_) => HexKind::Token,
        _ => HexKind::Id,
    }
}

pub(crate) fn invalid_hex(path: &str, kind: HexKind) -> EvalError {
    EvalError::InvalidHex {
        path: path.to_string(),
        kind: kind.label(),
        digits: kind.byte_size() * 2,
    }
}

fn mismatch(path: &str, ty: &Type, value: &Value) -> EvalError {
    EvalError::TypeMismatch {
        path: path.to_string(),
        expected: ty.to_string(),
        found: value.kind().to_string(),
    }
}

fn payload_mismatch(type_name: &str, pattern: &str, problem: &'static str) -> EvalError {
    EvalError::PayloadMismatch {
        type_name: type_name.to_string(),
        pattern: pattern.to_string(),
        problem,
    }
}

/// Lengths and indices beyond `u32::MAX` are clamped, as in the kernel.
fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
