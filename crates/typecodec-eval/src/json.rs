//! JSON form of schema values.
//!
//! | Type          | JSON                                             |
//! |---------------|--------------------------------------------------|
//! | Int32, UInt32 | number (floored, clamped into range on input)    |
//! | String, Bool  | string, bool                                     |
//! | Binary        | array of byte numbers                            |
//! | Id, Token     | hex string                                       |
//! | List          | array                                            |
//! | Maybe         | `{"_":"Just","value":v}` / `{"_":"Nothing"}`     |
//! | Result        | `{"_":"Ok","ok":v}` / `{"_":"Error","error":e}`  |
//! | product       | object keyed by member name                      |
//! | tag-only sum  | pattern name as a string                         |
//! | other sum     | `{"_":"Pattern","value":v}` / `{"_":"Pattern"}`  |

use serde_json::{json, Map, Value as Json};
use typecodec_runtime::is_hex_string;
use typecodec_types::{CustomTypeDefinitionBody, Type};

use crate::codec::{hex_kind, invalid_hex, SchemaCodec};
use crate::error::{EvalError, EvalResult};
use crate::value::Value;

/// Field holding the constructor name of Maybe, Result and sum objects.
pub const TAG_FIELD: &str = "_";

impl SchemaCodec<'_> {
    /// Read a JSON document as a value of `ty`.
    pub fn value_from_json(&self, ty: &Type, json: &Json) -> EvalResult<Value> {
        self.from_json_at(ty, json, "value", 0)
    }

    /// Render `value` (of type `ty`) as JSON.
    pub fn value_to_json(&self, ty: &Type, value: &Value) -> EvalResult<Json> {
        self.to_json_at(ty, value, "value", 0)
    }

    fn from_json_at(&self, ty: &Type, json: &Json, path: &str, depth: usize) -> EvalResult<Value> {
        self.check_depth(depth)?;
        let value = match ty {
            Type::Int32 => Value::Int32(clamp_number(json, path, f64::from(i32::MIN), f64::from(i32::MAX))? as i32),
            Type::UInt32 => Value::UInt32(clamp_number(json, path, 0.0, f64::from(u32::MAX))? as u32),
            Type::String => match json {
                Json::String(s) => Value::String(s.clone()),
                other => return Err(expected(path, "string", other)),
            },
            Type::Bool => match json {
                Json::Bool(b) => Value::Bool(*b),
                other => return Err(expected(path, "bool", other)),
            },
            Type::Binary => {
                let items = as_array(json, path)?;
                let mut bytes = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let byte = clamp_number(item, &format!("{path}[{i}]"), 0.0, 255.0)?;
                    bytes.push(byte as u8);
                }
                Value::Binary(bytes)
            }
            Type::Id(_) | Type::Token(_) => {
                let kind = hex_kind(ty);
                match json {
                    Json::String(text) if is_hex_string(kind.byte_size(), text) => {
                        Value::Hex(text.to_ascii_lowercase())
                    }
                    _ => return Err(invalid_hex(path, kind)),
                }
            }
            Type::List(element) => {
                let items = as_array(json, path)?;
                let mut values = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    values.push(self.from_json_at(element, item, &format!("{path}[{i}]"), depth + 1)?);
                }
                Value::List(values)
            }
            Type::Maybe(inner) => {
                let (tag, object) = tagged(json, path)?;
                match tag {
                    "Just" => {
                        let field = member(object, "value", path)?;
                        Value::just(self.from_json_at(inner, field, path, depth + 1)?)
                    }
                    "Nothing" => Value::nothing(),
                    other => return Err(unknown_tag("Maybe", other)),
                }
            }
            Type::Result(ok, error) => {
                let (tag, object) = tagged(json, path)?;
                match tag {
                    "Ok" => {
                        let field = member(object, "ok", path)?;
                        Value::ok(self.from_json_at(ok, field, path, depth + 1)?)
                    }
                    "Error" => {
                        let field = member(object, "error", path)?;
                        Value::error(self.from_json_at(error, field, path, depth + 1)?)
                    }
                    other => return Err(unknown_tag("Result", other)),
                }
            }
            Type::Custom { name, arguments } => {
                let def = self.definition(name)?;
                match &def.body {
                    CustomTypeDefinitionBody::Product(members) => {
                        let Json::Object(object) = json else {
                            return Err(expected(path, "object", json));
                        };
                        let mut fields = std::collections::BTreeMap::new();
                        for m in members {
                            let field = member(object, &m.name, path)?;
                            let ty = m.ty.substitute(&def.type_parameter_list, arguments);
                            let child = format!("{path}.{}", m.name);
                            fields.insert(m.name.clone(), self.from_json_at(&ty, field, &child, depth + 1)?);
                        }
                        Value::Record(fields)
                    }
                    CustomTypeDefinitionBody::Sum(patterns) => {
                        let (tag, object) = match json {
                            Json::String(tag) if def.body.is_tag_only_sum() => (tag.as_str(), None),
                            _ => {
                                let (tag, object) = tagged(json, path)?;
                                (tag, Some(object))
                            }
                        };
                        let pattern = patterns.iter().find(|p| p.name == tag).ok_or_else(|| {
                            EvalError::UnknownPattern {
                                type_name: name.clone(),
                                pattern: tag.to_string(),
                            }
                        })?;
                        match (&pattern.parameter, object) {
                            (Some(ty), Some(object)) => {
                                let field = member(object, "value", path)?;
                                let ty = ty.substitute(&def.type_parameter_list, arguments);
                                let child = format!("{path}.{tag}");
                                Value::variant(tag, self.from_json_at(&ty, field, &child, depth + 1)?)
                            }
                            (Some(_), None) => {
                                return Err(EvalError::PayloadMismatch {
                                    type_name: name.clone(),
                                    pattern: tag.to_string(),
                                    problem: "requires a payload",
                                })
                            }
                            (None, _) => Value::tag(tag),
                        }
                    }
                }
            }
            Type::Parameter(name) => return Err(EvalError::FreeParameter(name.clone())),
        };
        Ok(value)
    }

    fn to_json_at(&self, ty: &Type, value: &Value, path: &str, depth: usize) -> EvalResult<Json> {
        self.check_depth(depth)?;
        let json = match (ty, value) {
            (Type::Int32, Value::Int32(n)) => json!(n),
            (Type::UInt32, Value::UInt32(n)) => json!(n),
            (Type::String, Value::String(s)) => json!(s),
            (Type::Bool, Value::Bool(b)) => json!(b),
            (Type::Binary, Value::Binary(bytes)) => json!(bytes),
            (Type::Id(_) | Type::Token(_), Value::Hex(text)) => json!(text),
            (Type::List(element), Value::List(items)) => Json::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.to_json_at(element, item, &format!("{path}[{i}]"), depth + 1))
                    .collect::<EvalResult<Vec<_>>>()?,
            ),
            (Type::Maybe(inner), Value::Maybe(slot)) => match slot {
                Some(v) => json!({ TAG_FIELD: "Just", "value": self.to_json_at(inner, v, path, depth + 1)? }),
                None => json!({ TAG_FIELD: "Nothing" }),
            },
            (Type::Result(ok, error), Value::Result(outcome)) => match outcome {
                Ok(v) => json!({ TAG_FIELD: "Ok", "ok": self.to_json_at(ok, v, path, depth + 1)? }),
                Err(e) => json!({ TAG_FIELD: "Error", "error": self.to_json_at(error, e, path, depth + 1)? }),
            },
            (Type::Custom { name, arguments }, _) => {
                let def = self.definition(name)?;
                match (&def.body, value) {
                    (CustomTypeDefinitionBody::Product(members), Value::Record(fields)) => {
                        let mut object = Map::new();
                        for m in members {
                            let field = fields.get(&m.name).ok_or_else(|| EvalError::MissingMember {
                                path: path.to_string(),
                                member: m.name.clone(),
                            })?;
                            let ty = m.ty.substitute(&def.type_parameter_list, arguments);
                            let child = format!("{path}.{}", m.name);
                            object.insert(m.name.clone(), self.to_json_at(&ty, field, &child, depth + 1)?);
                        }
                        Json::Object(object)
                    }
                    (CustomTypeDefinitionBody::Sum(patterns), Value::Variant { pattern, payload }) => {
                        let declared = patterns.iter().find(|p| &p.name == pattern).ok_or_else(|| {
                            EvalError::UnknownPattern {
                                type_name: name.clone(),
                                pattern: pattern.clone(),
                            }
                        })?;
                        match (&declared.parameter, payload) {
                            (None, None) if def.body.is_tag_only_sum() => json!(pattern),
                            (None, None) => json!({ TAG_FIELD: pattern }),
                            (Some(ty), Some(payload)) => {
                                let ty = ty.substitute(&def.type_parameter_list, arguments);
                                let child = format!("{path}.{pattern}");
                                json!({ TAG_FIELD: pattern, "value": self.to_json_at(&ty, payload, &child, depth + 1)? })
                            }
                            (Some(_), None) | (None, Some(_)) => {
                                return Err(EvalError::PayloadMismatch {
                                    type_name: name.clone(),
                                    pattern: pattern.clone(),
                                    problem: if declared.parameter.is_some() {
                                        "requires a payload"
                                    } else {
                                        "takes no payload"
                                    },
                                })
                            }
                        }
                    }
                    _ => {
                        return Err(EvalError::TypeMismatch {
                            path: path.to_string(),
                            expected: name.clone(),
                            found: value.kind().to_string(),
                        })
                    }
                }
            }
            (Type::Parameter(name), _) => return Err(EvalError::FreeParameter(name.clone())),
            _ => {
                return Err(EvalError::TypeMismatch {
                    path: path.to_string(),
                    expected: ty.to_string(),
                    found: value.kind().to_string(),
                })
            }
        };
        Ok(json)
    }
}

/// Floor `json` and clamp it into `[min, max]`.
fn clamp_number(json: &Json, path: &str, min: f64, max: f64) -> EvalResult<f64> {
    match json.as_f64() {
        Some(n) => Ok(n.floor().clamp(min, max)),
        None => Err(expected(path, "number", json)),
    }
}

fn as_array<'j>(json: &'j Json, path: &str) -> EvalResult<&'j Vec<Json>> {
    json.as_array().ok_or_else(|| expected(path, "array", json))
}

/// Split `{"_": tag, ...}` into the tag and the whole object.
fn tagged<'j>(json: &'j Json, path: &str) -> EvalResult<(&'j str, &'j Map<String, Json>)> {
    let Json::Object(object) = json else {
        return Err(expected(path, "tagged object", json));
    };
    match object.get(TAG_FIELD) {
        Some(Json::String(tag)) => Ok((tag.as_str(), object)),
        _ => Err(EvalError::MissingMember {
            path: path.to_string(),
            member: TAG_FIELD.to_string(),
        }),
    }
}

fn member<'j>(object: &'j Map<String, Json>, name: &str, path: &str) -> EvalResult<&'j Json> {
    object.get(name).ok_or_else(|| EvalError::MissingMember {
        path: path.to_string(),
        member: name.to_string(),
    })
}

fn unknown_tag(type_name: &str, tag: &str) -> EvalError {
    EvalError::UnknownPattern {
        type_name: type_name.to_string(),
        pattern: tag.to_string(),
    }
}

fn expected(path: &str, what: &str, found: &Json) -> EvalError {
    let found = match found {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    };
    EvalError::TypeMismatch {
        path: path.to_string(),
        expected: what.to_string(),
        found: found.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_floor_and_clamp() {
        let codec = SchemaCodec::new(&[]);
        let read = |ty: &Type, j: Json| codec.value_from_json(ty, &j).unwrap();
        assert_eq!(read(&Type::Int32, json!(2.7)), Value::Int32(2));
        assert_eq!(read(&Type::Int32, json!(-2.5)), Value::Int32(-3));
        assert_eq!(read(&Type::Int32, json!(1e12)), Value::Int32(i32::MAX));
        assert_eq!(read(&Type::UInt32, json!(-4)), Value::UInt32(0));
        assert_eq!(read(&Type::UInt32, json!(5_000_000_000u64)), Value::UInt32(u32::MAX));
    }

    #[test]
    fn test_maybe_and_result_shapes() {
        let codec = SchemaCodec::new(&[]);
        let ty = Type::maybe(Type::result(Type::Int32, Type::String));
        let value = Value::just(Value::error(Value::String("boom".into())));
        let json = codec.value_to_json(&ty, &value).unwrap();
        assert_eq!(json, json!({"_": "Just", "value": {"_": "Error", "error": "boom"}}));
        assert_eq!(codec.value_from_json(&ty, &json).unwrap(), value);
    }

    #[test]
    fn test_hex_lowercased_on_input() {
        let codec = SchemaCodec::new(&[]);
        let text = "00FF".repeat(8);
        let value = codec.value_from_json(&Type::id("UserId"), &json!(text)).unwrap();
        assert_eq!(value, Value::Hex("00ff".repeat(8)));
        let err = codec.value_from_json(&Type::id("UserId"), &json!("00ff")).unwrap_err();
        assert!(matches!(err, EvalError::InvalidHex { digits: 32, .. }));
    }
}
