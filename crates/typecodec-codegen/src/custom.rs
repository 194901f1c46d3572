//! Rust declarations for one custom type definition: the type itself, its
//! tag helpers (sums only) and its codec.
//!
//! Non-generic codecs are unit structs. A generic definition's codec holds
//! one `&dyn Codec` per type parameter, so a recursive generic type reuses
//! its own codec type at every depth instead of nesting ever larger ones.
//!
//! Type parameters that no member or payload mentions are carried by a
//! marker: a `_marker: PhantomData<..>` field on structs, and on enums a
//! hidden `_Phantom` variant that can never be constructed. Neither reaches
//! the wire.

use std::collections::HashSet;

use typecodec_types::{CustomTypeDefinition, CustomTypeDefinitionBody, Member, Pattern, Type};

use crate::context::GenerationContext;
use crate::definition::{Definition, DefinitionKind};
use crate::error::{CodegenError, CodegenResult};
use crate::naming::{
    codec_name, constant_name, constructor_name, decoded_binding, field_name, generic_name,
};
use crate::writer::SourceWriter;

/// Declarations produced for one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomTypeOutput {
    pub type_decl: Definition,
    /// Tag helpers; `None` for products.
    pub tag_decl: Option<Definition>,
    pub codec_decl: Definition,
}

impl CustomTypeOutput {
    /// The declarations in emission order.
    pub fn into_definitions(self) -> Vec<Definition> {
        let mut out = vec![self.type_decl];
        out.extend(self.tag_decl);
        out.push(self.codec_decl);
        out
    }
}

/// Field holding unused type parameters of a product.
pub const MARKER_FIELD: &str = "_marker";

/// Uninhabited variant holding unused type parameters of a sum.
pub const PHANTOM_VARIANT: &str = "_Phantom";

/// Generate the declarations for `definition`.
pub fn generate(
    definition: &CustomTypeDefinition,
    context: &GenerationContext<'_>,
) -> CodegenResult<CustomTypeOutput> {
    tracing::debug!(definition = %definition.name, "generating custom type");
    let scope = Scope::new(definition, context)?;
    match &definition.body {
        CustomTypeDefinitionBody::Product(members) => scope.product(members),
        CustomTypeDefinitionBody::Sum(patterns) if !definition.is_generic()
            && definition.body.is_tag_only_sum() =>
        {
            scope.tag_only_sum(patterns)
        }
        CustomTypeDefinitionBody::Sum(patterns) => scope.sum(patterns),
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Scope
// ══════════════════════════════════════════════════════════════════════════════

struct GenericParameter {
    schema: String,
    generic: String,
    field: String,
}

struct Scope<'d, 'c> {
    definition: &'d CustomTypeDefinition,
    context: &'c GenerationContext<'c>,
    parameters: Vec<GenericParameter>,
    /// `PhantomData<..>` over the unused parameters, if any.
    marker: Option<String>,
}

impl<'d, 'c> Scope<'d, 'c> {
    fn new(
        definition: &'d CustomTypeDefinition,
        context: &'c GenerationContext<'c>,
    ) -> CodegenResult<Self> {
        let mut parameters: Vec<GenericParameter> = Vec::new();
        for schema in &definition.type_parameter_list {
            let generic = generic_name(schema, &|name: &str| context.is_symbol(name));
            let field = field_name(schema);
            if let Some(clash) = parameters
                .iter()
                .find(|p| p.generic == generic || p.field == field)
            {
                return Err(CodegenError::NameCollision {
                    symbol: generic,
                    first: format!("parameter '{}' of {}", clash.schema, definition.name),
                    second: format!("parameter '{schema}' of {}", definition.name),
                });
            }
            parameters.push(GenericParameter {
                schema: schema.clone(),
                generic,
                field,
            });
        }
        let unused: Vec<&str> = definition
            .unused_parameters()
            .into_iter()
            .filter_map(|schema| parameters.iter().find(|p| p.schema == schema))
            .map(|p| p.generic.as_str())
            .collect();
        let marker = match unused.as_slice() {
            [] => None,
            [single] => Some(format!("std::marker::PhantomData<{single}>")),
            many => Some(format!("std::marker::PhantomData<({})>", many.join(", "))),
        };
        Ok(Self {
            definition,
            context,
            parameters,
            marker,
        })
    }

    fn name(&self) -> &str {
        &self.definition.name
    }

    fn is_generic(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// `<A, B>` or the empty string.
    fn generics(&self) -> String {
        if self.parameters.is_empty() {
            return String::new();
        }
        let names: Vec<&str> = self.parameters.iter().map(|p| p.generic.as_str()).collect();
        format!("<{}>", names.join(", "))
    }

    /// The Rust type of the definition itself, e.g. `Pair<A, B>`.
    fn self_type(&self) -> String {
        format!("{}{}", self.name(), self.generics())
    }

    fn codec_type(&self) -> String {
        let codec = codec_name(self.name());
        if self.parameters.is_empty() {
            return codec;
        }
        let names: Vec<&str> = self.parameters.iter().map(|p| p.generic.as_str()).collect();
        format!("{codec}<'a, {}>", names.join(", "))
    }

    fn parameter(&self, schema: &str) -> CodegenResult<&GenericParameter> {
        self.parameters
            .iter()
            .find(|p| p.schema == schema)
            .ok_or_else(|| {
                CodegenError::Internal(format!(
                    "type parameter '{schema}' is not bound by {}",
                    self.name()
                ))
            })
    }

    /// The Rust type for a schema type.
    fn rust_type(&self, ty: &Type) -> CodegenResult<String> {
        Ok(match ty {
            Type::Int32 => "i32".to_string(),
            Type::UInt32 => "u32".to_string(),
            Type::String => "String".to_string(),
            Type::Bool => "bool".to_string(),
            Type::Binary => "Vec<u8>".to_string(),
            Type::List(element) => format!("Vec<{}>", self.rust_type(element)?),
            Type::Maybe(inner) => format!("Option<{}>", self.rust_type(inner)?),
            Type::Result(ok, error) => {
                format!("Result<{}, {}>", self.rust_type(ok)?, self.rust_type(error)?)
            }
            Type::Id(name) | Type::Token(name) => name.clone(),
            Type::Custom { name, arguments } if arguments.is_empty() => name.clone(),
            Type::Custom { name, arguments } => {
                let args = arguments
                    .iter()
                    .map(|a| self.rust_type(a))
                    .collect::<CodegenResult<Vec<_>>>()?;
                format!("{name}<{}>", args.join(", "))
            }
            Type::Parameter(p) => self.parameter(p)?.generic.clone(),
        })
    }

    /// An expression evaluating to a codec for a schema type.
    fn codec_expr(&self, ty: &Type) -> CodegenResult<String> {
        Ok(match ty {
            Type::Int32 => "Int32Codec".to_string(),
            Type::UInt32 => "UInt32Codec".to_string(),
            Type::String => "StringCodec".to_string(),
            Type::Bool => "BoolCodec".to_string(),
            Type::Binary => "BinaryCodec".to_string(),
            Type::List(element) => format!("ListCodec::new({})", self.codec_expr(element)?),
            Type::Maybe(inner) => format!("MaybeCodec::new({})", self.codec_expr(inner)?),
            Type::Result(ok, error) => format!(
                "ResultCodec::new({}, {})",
                self.codec_expr(ok)?,
                self.codec_expr(error)?
            ),
            Type::Id(name) | Type::Token(name) => codec_name(name),
            Type::Custom { name, arguments } if arguments.is_empty() => codec_name(name),
            Type::Custom { name, arguments } => {
                let args = arguments
                    .iter()
                    .map(|a| self.codec_argument(a))
                    .collect::<CodegenResult<Vec<_>>>()?;
                format!("{}::new({})", codec_name(name), args.join(", "))
            }
            Type::Parameter(p) => format!("self.{}", self.parameter(p)?.field),
        })
    }

    /// A codec passed to a generic codec constructor, as a reference.
    fn codec_argument(&self, ty: &Type) -> CodegenResult<String> {
        let expr = self.codec_expr(ty)?;
        Ok(match ty {
            Type::Parameter(_) => expr,
            _ => format!("&{expr}"),
        })
    }

    /// Type and codec of member (or pattern) `slot`, boxed if cyclic.
    fn slot(&self, slot: usize, ty: &Type) -> CodegenResult<(String, String)> {
        let rust = self.rust_type(ty)?;
        let codec = self.codec_expr(ty)?;
        if self.context.is_boxed(self.name(), slot) {
            Ok((format!("Box<{rust}>"), format!("BoxCodec::new({codec})")))
        } else {
            Ok((rust, codec))
        }
    }

    // ── Products ────────────────────────────────────────────────────────────

    fn product(&self, members: &[Member]) -> CodegenResult<CustomTypeOutput> {
        let mut fields = Vec::with_capacity(members.len());
        let mut seen = HashSet::new();
        for (slot, member) in members.iter().enumerate() {
            let field = field_name(&member.name);
            if !seen.insert(field.clone()) {
                return Err(self.member_collision(&field, members, &member.name));
            }
            let (rust, codec) = self.slot(slot, &member.ty)?;
            fields.push((member, field, rust, codec));
        }

        let mut w = SourceWriter::new();
        w.line("#[derive(Debug, Clone, PartialEq, Eq, Hash)]");
        w.open(&format!("pub struct {} {{", self.self_type()));
        for (member, field, rust, _) in &fields {
            doc_lines(&mut w, &member.description);
            w.line(&format!("pub {field}: {rust},"));
        }
        if let Some(marker) = &self.marker {
            w.line(&format!("pub {MARKER_FIELD}: {marker},"));
        }
        w.close("}");
        let type_decl = Definition::new(
            self.name(),
            &self.definition.description,
            DefinitionKind::Type,
            w.finish(),
        );

        let mut encode = SourceWriter::new();
        for (_, field, _, codec) in &fields {
            encode.line(&format!("{codec}.encode(&value.{field}, out);"));
        }

        let mut decode = SourceWriter::new();
        let mut cursor = "offset".to_string();
        for (member, _, _, codec) in &fields {
            let binding = decoded_binding(&member.name);
            decode.line(&format!("let {binding} = {codec}.decode({cursor}, bytes)?;"));
            cursor = format!("{binding}.next_offset");
        }
        decode.open("Ok(Decoded {");
        decode.line(&format!("next_offset: {cursor},"));
        decode.open(&format!("result: {} {{", self.name()));
        for (member, field, _, _) in &fields {
            decode.line(&format!("{field}: {}.result,", decoded_binding(&member.name)));
        }
        if self.marker.is_some() {
            decode.line(&format!("{MARKER_FIELD}: std::marker::PhantomData,"));
        }
        decode.close("},");
        decode.close("})");

        Ok(CustomTypeOutput {
            type_decl,
            tag_decl: None,
            codec_decl: self.codec_decl(&encode.finish(), &decode.finish()),
        })
    }

    fn member_collision(&self, field: &str, members: &[Member], second: &str) -> CodegenError {
        let first = members
            .iter()
            .find(|m| field_name(&m.name) == field)
            .map(|m| m.name.as_str())
            .unwrap_or(second);
        CodegenError::NameCollision {
            symbol: format!("{}.{field}", self.name()),
            first: format!("member '{first}'"),
            second: format!("member '{second}'"),
        }
    }

    // ── Sums ────────────────────────────────────────────────────────────────

    /// A sum without payloads: a fieldless enum with explicit wire indices.
    fn tag_only_sum(&self, patterns: &[Pattern]) -> CodegenResult<CustomTypeOutput> {
        let name = self.name();

        let mut w = SourceWriter::new();
        w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]");
        w.open(&format!("pub enum {name} {{"));
        for (index, pattern) in patterns.iter().enumerate() {
            doc_lines(&mut w, &pattern.description);
            w.line(&format!("{} = {index},", pattern.name));
        }
        w.close("}");
        let type_decl = Definition::new(
            name,
            &self.definition.description,
            DefinitionKind::Type,
            w.finish(),
        );

        let mut t = SourceWriter::new();
        t.open(&format!("impl {name} {{"));
        t.line("/// Every pattern, in wire order.");
        let all: Vec<String> = patterns.iter().map(|p| format!("{name}::{}", p.name)).collect();
        t.line(&format!(
            "pub const ALL: [{name}; {}] = [{}];",
            patterns.len(),
            all.join(", ")
        ));
        t.blank();
        t.open("pub fn as_str(self) -> &'static str {");
        t.open("match self {");
        for pattern in patterns {
            t.line(&format!("{name}::{0} => \"{0}\",", pattern.name));
        }
        t.close("}");
        t.close("}");
        t.close("}");
        let tag_decl = Definition::new(
            name,
            format!("Pattern names of [`{name}`]."),
            DefinitionKind::Tags,
            t.finish(),
        );

        let encode = "UInt32Codec.encode(&(*value as u32), out);".to_string();

        let mut d = SourceWriter::new();
        d.line("let index = UInt32Codec.decode(offset, bytes)?;");
        d.open("let result = match index.result {");
        for (index, pattern) in patterns.iter().enumerate() {
            d.line(&format!("{index} => {name}::{},", pattern.name));
        }
        d.open("other => {");
        d.open("return Err(DecodeError::UnknownPattern {");
        d.line(&format!("type_name: \"{name}\","));
        d.line("index: other,");
        d.close("})");
        d.close("}");
        d.close("};");
        d.open("Ok(Decoded {");
        d.line("result,");
        d.line("next_offset: index.next_offset,");
        d.close("})");

        Ok(CustomTypeOutput {
            type_decl,
            tag_decl: Some(tag_decl),
            codec_decl: self.codec_decl(&encode, &d.finish()),
        })
    }

    /// A sum with at least one payload.
    fn sum(&self, patterns: &[Pattern]) -> CodegenResult<CustomTypeOutput> {
        let name = self.name();
        let mut variants = Vec::with_capacity(patterns.len());
        for (slot, pattern) in patterns.iter().enumerate() {
            let payload = match &pattern.parameter {
                Some(ty) => Some(self.slot(slot, ty)?),
                None => None,
            };
            variants.push((pattern, payload));
        }

        let mut w = SourceWriter::new();
        w.line("#[derive(Debug, Clone, PartialEq, Eq, Hash)]");
        w.open(&format!("pub enum {} {{", self.self_type()));
        for (pattern, payload) in &variants {
            doc_lines(&mut w, &pattern.description);
            match payload {
                Some((rust, _)) => w.line(&format!("{}({rust}),", pattern.name)),
                None => w.line(&format!("{},", pattern.name)),
            }
        }
        if let Some(marker) = &self.marker {
            w.line("#[doc(hidden)]");
            w.line(&format!("{PHANTOM_VARIANT}(std::convert::Infallible, {marker}),"));
        }
        w.close("}");
        let type_decl = Definition::new(
            name,
            &self.definition.description,
            DefinitionKind::Type,
            w.finish(),
        );

        let mut seen = HashSet::new();
        let mut t = SourceWriter::new();
        t.open(&format!("impl{} {} {{", self.generics(), self.self_type()));
        for (i, (pattern, payload)) in variants.iter().enumerate() {
            if i > 0 {
                t.blank();
            }
            match payload {
                Some((rust, _)) => {
                    let ctor = constructor_name(&pattern.name);
                    self.check_helper(&mut seen, &ctor, &pattern.name)?;
                    t.open(&format!("pub fn {ctor}(payload: {rust}) -> Self {{"));
                    t.line(&format!("Self::{}(payload)", pattern.name));
                    t.close("}");
                }
                None => {
                    let constant = constant_name(&pattern.name);
                    self.check_helper(&mut seen, &constant, &pattern.name)?;
                    t.line(&format!("pub const {constant}: Self = Self::{};", pattern.name));
                }
            }
        }
        t.close("}");
        let tag_decl = Definition::new(
            name,
            format!("Constructors for each pattern of [`{name}`]."),
            DefinitionKind::Tags,
            t.finish(),
        );

        let mut e = SourceWriter::new();
        e.open("match value {");
        for (index, (pattern, payload)) in variants.iter().enumerate() {
            match payload {
                Some((_, codec)) => {
                    e.open(&format!("{name}::{}(payload) => {{", pattern.name));
                    e.line(&format!("UInt32Codec.encode(&{index}, out);"));
                    e.line(&format!("{codec}.encode(payload, out);"));
                    e.close("}");
                }
                None => e.line(&format!(
                    "{name}::{} => UInt32Codec.encode(&{index}, out),",
                    pattern.name
                )),
            }
        }
        if self.marker.is_some() {
            e.line(&format!("{name}::{PHANTOM_VARIANT}(never, _) => match *never {{}},"));
        }
        e.close("}");

        let mut d = SourceWriter::new();
        d.line("let index = UInt32Codec.decode(offset, bytes)?;");
        d.open("match index.result {");
        for (index, (pattern, payload)) in variants.iter().enumerate() {
            match payload {
                Some((_, codec)) => d.line(&format!(
                    "{index} => Ok({codec}.decode(index.next_offset, bytes)?.map({name}::{})),",
                    pattern.name
                )),
                None => {
                    d.open(&format!("{index} => Ok(Decoded {{"));
                    d.line(&format!("result: {name}::{},", pattern.name));
                    d.line("next_offset: index.next_offset,");
                    d.close("}),");
                }
            }
        }
        d.open("other => Err(DecodeError::UnknownPattern {");
        d.line(&format!("type_name: \"{name}\","));
        d.line("index: other,");
        d.close("}),");
        d.close("}");

        Ok(CustomTypeOutput {
            type_decl,
            tag_decl: Some(tag_decl),
            codec_decl: self.codec_decl(&e.finish(), &d.finish()),
        })
    }

    fn check_helper(
        &self,
        seen: &mut HashSet<String>,
        helper: &str,
        pattern: &str,
    ) -> CodegenResult<()> {
        if seen.insert(helper.to_string()) {
            return Ok(());
        }
        Err(CodegenError::NameCollision {
            symbol: format!("{}::{helper}", self.name()),
            first: format!("an earlier pattern of {}", self.name()),
            second: format!("pattern '{pattern}'"),
        })
    }

    // ── Codec ───────────────────────────────────────────────────────────────

    fn codec_decl(&self, encode_body: &str, decode_body: &str) -> Definition {
        let codec = codec_name(self.name());
        let self_type = self.self_type();
        let mut w = SourceWriter::new();

        if self.is_generic() {
            let generics: Vec<&str> = self.parameters.iter().map(|p| p.generic.as_str()).collect();
            let impl_generics = format!("<'a, {}>", generics.join(", "));
            let codec_type = self.codec_type();

            w.open(&format!("pub struct {codec_type} {{"));
            for p in &self.parameters {
                w.line(&format!("pub {}: &'a dyn Codec<Value = {}>,", p.field, p.generic));
            }
            w.close("}");
            w.blank();

            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|p| format!("{}: &'a dyn Codec<Value = {}>", p.field, p.generic))
                .collect();
            let fields: Vec<&str> = self.parameters.iter().map(|p| p.field.as_str()).collect();
            w.open(&format!("impl{impl_generics} {codec_type} {{"));
            w.open(&format!("pub fn new({}) -> Self {{", params.join(", ")));
            w.line(&format!("Self {{ {} }}", fields.join(", ")));
            w.close("}");
            w.close("}");
            w.blank();
            w.open(&format!("impl{impl_generics} Codec for {codec_type} {{"));
        } else {
            w.line("#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]");
            w.line(&format!("pub struct {codec};"));
            w.blank();
            w.open(&format!("impl Codec for {codec} {{"));
        }

        w.line(&format!("type Value = {self_type};"));
        w.blank();
        w.open(&format!(
            "fn encode(&self, value: &{self_type}, out: &mut Vec<u8>) {{"
        ));
        w.block(encode_body);
        w.close("}");
        w.blank();
        w.open(&format!(
            "fn decode(&self, offset: usize, bytes: &[u8]) -> Result<Decoded<{self_type}>, DecodeError> {{"
        ));
        w.block(decode_body);
        w.close("}");
        w.close("}");

        let document = if self.is_generic() {
            format!(
                "Binary codec for [`{}`], built from one codec per type parameter.",
                self.name()
            )
        } else {
            format!("Binary codec for [`{}`].", self.name())
        };
        Definition::new(codec, document, DefinitionKind::Codec, w.finish())
    }
}

fn doc_lines(w: &mut SourceWriter, description: &str) {
    for line in description.lines() {
        if line.trim().is_empty() {
            w.line("///");
        } else {
            w.line(&format!("/// {}", line.trim_end()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerateOptions;

    fn generate_one(defs: &[CustomTypeDefinition]) -> CustomTypeOutput {
        let ctx = GenerationContext::new(defs, GenerateOptions::default());
        generate(&defs[0], &ctx).unwrap()
    }

    #[test]
    fn test_product_fields_and_codec() {
        let defs = vec![CustomTypeDefinition::new(
            "User",
            "A registered user.",
            CustomTypeDefinitionBody::Product(vec![
                Member::new("userName", "Display name.", Type::String),
                Member::new("age", "", Type::Int32),
            ]),
        )];
        let out = generate_one(&defs);
        assert_eq!(out.type_decl.document, "A registered user.");
        assert!(out.type_decl.code.contains("pub struct User {"));
        assert!(out.type_decl.code.contains("    /// Display name.\n    pub user_name: String,"));
        assert!(out.type_decl.code.contains("pub age: i32,"));
        assert!(out.tag_decl.is_none());

        let codec = &out.codec_decl.code;
        assert!(codec.contains("pub struct UserCodec;"));
        assert!(codec.contains("StringCodec.encode(&value.user_name, out);"));
        assert!(codec.contains("let decoded_user_name = StringCodec.decode(offset, bytes)?;"));
        assert!(codec.contains("let decoded_age = Int32Codec.decode(decoded_user_name.next_offset, bytes)?;"));
        assert!(codec.contains("next_offset: decoded_age.next_offset,"));
    }

    #[test]
    fn test_generic_product_holds_parameter_codecs() {
        let defs = vec![CustomTypeDefinition::new(
            "Pair",
            "",
            CustomTypeDefinitionBody::Product(vec![
                Member::new("first", "", Type::parameter("a")),
                Member::new("rest", "", Type::list(Type::parameter("b"))),
            ]),
        )
        .with_parameters(["a", "b"])];
        let out = generate_one(&defs);
        assert!(out.type_decl.code.contains("pub struct Pair<A, B> {"));
        let codec = &out.codec_decl.code;
        assert!(codec.contains("pub struct PairCodec<'a, A, B> {"));
        assert!(codec.contains("pub a: &'a dyn Codec<Value = A>,"));
        assert!(codec.contains("impl<'a, A, B> Codec for PairCodec<'a, A, B> {"));
        assert!(codec.contains("type Value = Pair<A, B>;"));
        assert!(codec.contains("self.a.encode(&value.first, out);"));
        assert!(codec.contains("ListCodec::new(self.b).encode(&value.rest, out);"));
    }

    #[test]
    fn test_instantiated_generic_passes_references() {
        let defs = vec![
            CustomTypeDefinition::new(
                "Holder",
                "",
                CustomTypeDefinitionBody::Product(vec![Member::new(
                    "pair",
                    "",
                    Type::custom("Pair", vec![Type::Int32, Type::list(Type::String)]),
                )]),
            ),
            CustomTypeDefinition::new(
                "Pair",
                "",
                CustomTypeDefinitionBody::Product(vec![
                    Member::new("first", "", Type::parameter("a")),
                    Member::new("second", "", Type::parameter("b")),
                ]),
            )
            .with_parameters(["a", "b"]),
        ];
        let out = generate_one(&defs);
        assert!(out.type_decl.code.contains("pub pair: Pair<i32, Vec<String>>,"));
        assert!(out
            .codec_decl
            .code
            .contains("PairCodec::new(&Int32Codec, &ListCodec::new(StringCodec)).encode(&value.pair, out);"));
    }

    #[test]
    fn test_tag_only_sum() {
        let defs = vec![CustomTypeDefinition::new(
            "Color",
            "",
            CustomTypeDefinitionBody::Sum(vec![
                Pattern::unit("Red", "Warm."),
                Pattern::unit("Green", ""),
            ]),
        )];
        let out = generate_one(&defs);
        assert!(out.type_decl.code.contains("PartialOrd, Ord)]\npub enum Color {"));
        assert!(out.type_decl.code.contains("    /// Warm.\n    Red = 0,\n    Green = 1,"));
        let tags = out.tag_decl.unwrap().code;
        assert!(tags.contains("pub const ALL: [Color; 2] = [Color::Red, Color::Green];"));
        assert!(tags.contains("Color::Green => \"Green\","));
        let codec = &out.codec_decl.code;
        assert!(codec.contains("UInt32Codec.encode(&(*value as u32), out);"));
        assert!(codec.contains("1 => Color::Green,"));
        assert!(codec.contains("type_name: \"Color\","));
    }

    #[test]
    fn test_sum_with_payloads() {
        let defs = vec![CustomTypeDefinition::new(
            "Shape",
            "",
            CustomTypeDefinitionBody::Sum(vec![
                Pattern::with_payload("Circle", "", Type::Int32),
                Pattern::unit("NoShape", ""),
            ]),
        )];
        let out = generate_one(&defs);
        assert!(out.type_decl.code.contains("Circle(i32),\n    NoShape,"));
        let tags = out.tag_decl.unwrap().code;
        assert!(tags.contains("pub fn circle(payload: i32) -> Self {"));
        assert!(tags.contains("pub const NO_SHAPE: Self = Self::NoShape;"));
        let codec = &out.codec_decl.code;
        assert!(codec.contains("Shape::Circle(payload) => {"));
        assert!(codec.contains("UInt32Codec.encode(&0, out);"));
        assert!(codec.contains("Shape::NoShape => UInt32Codec.encode(&1, out),"));
        assert!(codec.contains("0 => Ok(Int32Codec.decode(index.next_offset, bytes)?.map(Shape::Circle)),"));
    }

    #[test]
    fn test_recursive_member_is_boxed() {
        let defs = vec![CustomTypeDefinition::new(
            "Node",
            "",
            CustomTypeDefinitionBody::Product(vec![
                Member::new("value", "", Type::Int32),
                Member::new("next", "", Type::maybe(Type::named("Node"))),
            ]),
        )];
        let out = generate_one(&defs);
        assert!(out.type_decl.code.contains("pub next: Box<Option<Node>>,"));
        assert!(out
            .codec_decl
            .code
            .contains("BoxCodec::new(MaybeCodec::new(NodeCodec)).encode(&value.next, out);"));
    }

    #[test]
    fn test_colliding_member_names_are_rejected() {
        let defs = vec![CustomTypeDefinition::new(
            "Bad",
            "",
            CustomTypeDefinitionBody::Product(vec![
                Member::new("aBC", "", Type::Int32),
                Member::new("aBc", "", Type::Int32),
            ]),
        )];
        let ctx = GenerationContext::new(&defs, GenerateOptions::default());
        let err = generate(&defs[0], &ctx).unwrap_err();
        assert!(matches!(err, CodegenError::NameCollision { .. }));
    }

    #[test]
    fn test_unused_parameter_product_carries_marker() {
        let defs = vec![CustomTypeDefinition::new(
            "Tagged",
            "",
            CustomTypeDefinitionBody::Product(vec![Member::new("value", "", Type::Int32)]),
        )
        .with_parameters(["unit"])];
        let out = generate_one(&defs);
        assert!(out.type_decl.code.contains("pub struct Tagged<Unit> {"));
        assert!(out
            .type_decl
            .code
            .contains("pub _marker: std::marker::PhantomData<Unit>,"));
        let codec = &out.codec_decl.code;
        assert!(codec.contains("pub unit: &'a dyn Codec<Value = Unit>,"));
        assert!(codec.contains("_marker: std::marker::PhantomData,"));
        assert!(!codec.contains("self.unit"));
    }

    #[test]
    fn test_unused_parameter_sum_carries_hidden_variant() {
        let defs = vec![CustomTypeDefinition::new(
            "Signal",
            "",
            CustomTypeDefinitionBody::Sum(vec![
                Pattern::with_payload("Level", "", Type::parameter("a")),
                Pattern::unit("Off", ""),
            ]),
        )
        .with_parameters(["a", "b", "c"])];
        let out = generate_one(&defs);
        assert!(out.type_decl.code.contains(
            "    #[doc(hidden)]\n    _Phantom(std::convert::Infallible, std::marker::PhantomData<(B, C)>),"
        ));
        assert!(out
            .codec_decl
            .code
            .contains("Signal::_Phantom(never, _) => match *never {},"));
        let tags = out.tag_decl.unwrap().code;
        assert!(!tags.contains("_Phantom"));
    }
}
