//! The schema type model.
//!
//! A schema is an ordered list of [`CustomTypeDefinition`]s. Every field and
//! pattern refers to a [`Type`], which is a closed recursive variant over the
//! built-in primitives, the generic wrappers, fixed-size hex identifiers,
//! references to other definitions, and type parameters.
//!
//! Declaration order is significant everywhere: it fixes generated field
//! order and the wire discriminant of sum patterns. `Vec` is used instead of
//! any map type for that reason.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw byte length of an `Id` value on the wire.
pub const ID_BYTE_SIZE: usize = 16;

/// Raw byte length of a `Token` value on the wire.
pub const TOKEN_BYTE_SIZE: usize = 32;

// ══════════════════════════════════════════════════════════════════════════════
// Type
// ══════════════════════════════════════════════════════════════════════════════

/// A type appearing in a member or pattern of a custom type definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    // ── Primitives ──
    Int32,
    UInt32,
    String,
    Bool,
    Binary,

    // ── Generic wrappers ──
    List(Box<Type>),
    Maybe(Box<Type>),
    /// `Result<ok, error>`
    Result(Box<Type>, Box<Type>),

    // ── Fixed-size hex identifiers ──
    /// 16-byte identifier, carried as 32 lowercase hex characters.
    Id(std::string::String),
    /// 32-byte credential, carried as 64 lowercase hex characters.
    Token(std::string::String),

    // ── References ──
    /// A (possibly instantiated) reference to a custom type definition.
    Custom {
        name: std::string::String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        arguments: Vec<Type>,
    },
    /// A type variable bound by the enclosing definition.
    Parameter(std::string::String),
}

impl Type {
    pub fn list(element: Type) -> Self {
        Type::List(Box::new(element))
    }

    pub fn maybe(inner: Type) -> Self {
        Type::Maybe(Box::new(inner))
    }

    pub fn result(ok: Type, error: Type) -> Self {
        Type::Result(Box::new(ok), Box::new(error))
    }

    pub fn id(name: impl Into<std::string::String>) -> Self {
        Type::Id(name.into())
    }

    pub fn token(name: impl Into<std::string::String>) -> Self {
        Type::Token(name.into())
    }

    /// Reference a non-generic custom type.
    pub fn named(name: impl Into<std::string::String>) -> Self {
        Type::Custom {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Reference a generic custom type instantiated with `arguments`.
    pub fn custom(name: impl Into<std::string::String>, arguments: Vec<Type>) -> Self {
        Type::Custom {
            name: name.into(),
            arguments,
        }
    }

    pub fn parameter(name: impl Into<std::string::String>) -> Self {
        Type::Parameter(name.into())
    }

    /// Visit this type and every type nested inside it, pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Type)) {
        f(self);
        match self {
            Type::List(inner) | Type::Maybe(inner) => inner.walk(f),
            Type::Result(ok, error) => {
                ok.walk(f);
                error.walk(f);
            }
            Type::Custom { arguments, .. } => {
                for argument in arguments {
                    argument.walk(f);
                }
            }
            Type::Int32
            | Type::UInt32
            | Type::String
            | Type::Bool
            | Type::Binary
            | Type::Id(_)
            | Type::Token(_)
            | Type::Parameter(_) => {}
        }
    }

    /// Replace every `Parameter(p)` whose name appears in `parameters` with
    /// the argument at the same position.
    ///
    /// Parameters without a matching argument are left untouched; the
    /// validator guarantees arity, so that only happens for free variables.
    pub fn substitute(&self, parameters: &[std::string::String], arguments: &[Type]) -> Type {
        match self {
            Type::Parameter(name) => parameters
                .iter()
                .position(|p| p == name)
                .and_then(|index| arguments.get(index))
                .cloned()
                .unwrap_or_else(|| self.clone()),
            Type::List(inner) => Type::list(inner.substitute(parameters, arguments)),
            Type::Maybe(inner) => Type::maybe(inner.substitute(parameters, arguments)),
            Type::Result(ok, error) => Type::result(
                ok.substitute(parameters, arguments),
                error.substitute(parameters, arguments),
            ),
            Type::Custom {
                name,
                arguments: inner,
            } => Type::Custom {
                name: name.clone(),
                arguments: inner
                    .iter()
                    .map(|a| a.substitute(parameters, arguments))
                    .collect(),
            },
            other => other.clone(),
        }
    }

    /// True if a `Parameter` occurs anywhere inside this type.
    pub fn has_parameter(&self) -> bool {
        let mut found = false;
        self.walk(&mut |t| {
            if matches!(t, Type::Parameter(_)) {
                found = true;
            }
        });
        found
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int32 => write!(f, "Int32"),
            Type::UInt32 => write!(f, "UInt32"),
            Type::String => write!(f, "String"),
            Type::Bool => write!(f, "Bool"),
            Type::Binary => write!(f, "Binary"),
            Type::List(inner) => write!(f, "List<{inner}>"),
            Type::Maybe(inner) => write!(f, "Maybe<{inner}>"),
            Type::Result(ok, error) => write!(f, "Result<{ok}, {error}>"),
            Type::Id(name) => write!(f, "Id({name})"),
            Type::Token(name) => write!(f, "Token({name})"),
            Type::Custom { name, arguments } => {
                write!(f, "{name}")?;
                if !arguments.is_empty() {
                    write!(f, "<")?;
                    for (i, argument) in arguments.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{argument}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Type::Parameter(name) => write!(f, "{name}"),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Custom type definitions
// ══════════════════════════════════════════════════════════════════════════════

/// A user-defined product or sum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub type_parameter_list: Vec<String>,
    pub body: CustomTypeDefinitionBody,
}

impl CustomTypeDefinition {
    /// Create a non-generic definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        body: CustomTypeDefinitionBody,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            type_parameter_list: Vec::new(),
            body,
        }
    }

    /// Attach type parameters.
    pub fn with_parameters<S: Into<String>>(mut self, parameters: impl IntoIterator<Item = S>) -> Self {
        self.type_parameter_list = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameter_list.is_empty()
    }

    /// Every type mentioned in the body, in declaration order.
    pub fn body_types(&self) -> Vec<&Type> {
        match &self.body {
            CustomTypeDefinitionBody::Product(members) => members.iter().map(|m| &m.ty).collect(),
            CustomTypeDefinitionBody::Sum(patterns) => {
                patterns.iter().filter_map(|p| p.parameter.as_ref()).collect()
            }
        }
    }

    /// Type parameters that no member or pattern payload mentions.
    pub fn unused_parameters(&self) -> Vec<&str> {
        let mut used = std::collections::HashSet::new();
        for ty in self.body_types() {
            ty.walk(&mut |t| {
                if let Type::Parameter(name) = t {
                    used.insert(name.as_str());
                }
            });
        }
        self.type_parameter_list
            .iter()
            .map(String::as_str)
            .filter(|p| !used.contains(p))
            .collect()
    }
}

/// The body of a definition: a record of members or a union of patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomTypeDefinitionBody {
    Product(Vec<Member>),
    Sum(Vec<Pattern>),
}

impl CustomTypeDefinitionBody {
    /// True for a sum whose patterns all lack a payload.
    pub fn is_tag_only_sum(&self) -> bool {
        matches!(self, CustomTypeDefinitionBody::Sum(patterns)
            if patterns.iter().all(|p| p.parameter.is_none()))
    }
}

/// A named field of a product type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Member {
    pub fn new(name: impl Into<String>, description: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ty,
        }
    }
}

/// A named alternative of a sum type, with an optional payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<Type>,
}

impl Pattern {
    /// A payload-free pattern.
    pub fn unit(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter: None,
        }
    }

    /// A pattern carrying a payload of type `parameter`.
    pub fn with_payload(name: impl Into<String>, description: impl Into<String>, parameter: Type) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter: Some(parameter),
        }
    }
}
