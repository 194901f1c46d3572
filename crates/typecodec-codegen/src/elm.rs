//! Elm backend: types plus `Json.Encode`/`Json.Decode` functions over the
//! JSON value shape shared with the `typecodec-eval` crate.
//!
//! Products become record aliases, sums become custom types, and each Id or
//! Token becomes a single-constructor wrapper around its hex string. Elm
//! rejects recursive aliases, so a product that reaches itself is wrapped
//! in a single-constructor custom type instead.

use std::collections::HashMap;

use typecodec_types::{
    collect_hex_names, CustomTypeDefinition, CustomTypeDefinitionBody, Member, Pattern, Type,
};

use crate::context::boxed_slots;
use crate::error::{CodegenError, CodegenResult};
use crate::writer::SourceWriter;

const ELM_KEYWORDS: &[&str] = &[
    "if", "then", "else", "case", "of", "let", "in", "type", "module", "where", "import",
    "exposing", "as", "port", "alias", "infix",
];

const ELM_RESERVED_CONSTRUCTORS: &[&str] = &[
    "Just", "Nothing", "Ok", "Err", "True", "False", "Int", "String", "Bool", "List", "Maybe",
    "Result", "Decoder", "Value",
];

const PRELUDE: &str = r#"andMap : Decode.Decoder a -> Decode.Decoder (a -> b) -> Decode.Decoder b
andMap =
    Decode.map2 (|>)


encodeMaybe : (a -> Encode.Value) -> Maybe a -> Encode.Value
encodeMaybe encoder maybe =
    case maybe of
        Just value ->
            Encode.object [ ( "_", Encode.string "Just" ), ( "value", encoder value ) ]

        Nothing ->
            Encode.object [ ( "_", Encode.string "Nothing" ) ]


maybeDecoder : Decode.Decoder a -> Decode.Decoder (Maybe a)
maybeDecoder decoder =
    Decode.field "_" Decode.string
        |> Decode.andThen
            (\tag ->
                case tag of
                    "Just" ->
                        Decode.map Just (Decode.field "value" decoder)

                    "Nothing" ->
                        Decode.succeed Nothing

                    _ ->
                        Decode.fail ("unknown Maybe pattern: " ++ tag)
            )


encodeResult : (ok -> Encode.Value) -> (error -> Encode.Value) -> Result error ok -> Encode.Value
encodeResult okEncoder errorEncoder result =
    case result of
        Ok value ->
            Encode.object [ ( "_", Encode.string "Ok" ), ( "ok", okEncoder value ) ]

        Err error ->
            Encode.object [ ( "_", Encode.string "Error" ), ( "error", errorEncoder error ) ]


resultDecoder : Decode.Decoder ok -> Decode.Decoder error -> Decode.Decoder (Result error ok)
resultDecoder okDecoder errorDecoder =
    Decode.field "_" Decode.string
        |> Decode.andThen
            (\tag ->
                case tag of
                    "Ok" ->
                        Decode.map Ok (Decode.field "ok" okDecoder)

                    "Error" ->
                        Decode.map Err (Decode.field "error" errorDecoder)

                    _ ->
                        Decode.fail ("unknown Result pattern: " ++ tag)
            )"#;

/// Render a complete Elm module for a validated schema.
pub fn emit_elm(definitions: &[CustomTypeDefinition], module_name: &str) -> CodegenResult<String> {
    tracing::debug!(module = module_name, definitions = definitions.len(), "emitting elm module");
    check_constructors(definitions)?;

    let boxed = boxed_slots(definitions);
    let recursive = |name: &str| boxed.iter().any(|(def, _)| def == name);

    let mut sections = vec![
        format!(
            "module {module_name} exposing (..)\n\n{{-| Generated by typecodec. Do not edit.\n-}}\n\nimport Json.Decode as Decode\nimport Json.Encode as Encode"
        ),
        PRELUDE.to_string(),
    ];

    for hex in collect_hex_names(definitions) {
        sections.push(hex_section(&hex.name));
    }
    for def in definitions {
        let section = match &def.body {
            // Elm rejects type aliases with unused type variables.
            CustomTypeDefinitionBody::Product(members) => product_section(
                def,
                members,
                recursive(&def.name) || !def.unused_parameters().is_empty(),
            ),
            CustomTypeDefinitionBody::Sum(patterns) if def.body.is_tag_only_sum() => {
                tag_only_section(def, patterns)
            }
            CustomTypeDefinitionBody::Sum(patterns) => sum_section(def, patterns),
        };
        sections.push(section);
    }

    let mut out = sections.join("\n\n\n");
    out.push('\n');
    Ok(out)
}

/// Elm puts every value constructor of a module in one namespace, and the
/// core types and constructors are always in scope.
fn check_constructors(definitions: &[CustomTypeDefinition]) -> CodegenResult<()> {
    let hex_names = collect_hex_names(definitions);

    let mut constructors: Vec<(&str, String)> = Vec::new();
    for def in definitions {
        match &def.body {
            CustomTypeDefinitionBody::Product(_) => {
                constructors.push((def.name.as_str(), format!("type {}", def.name)));
            }
            CustomTypeDefinitionBody::Sum(patterns) => {
                for p in patterns {
                    constructors.push((p.name.as_str(), format!("pattern {}.{}", def.name, p.name)));
                }
            }
        }
    }
    for hex in &hex_names {
        constructors.push((hex.name.as_str(), format!("{} {}", hex.kind.label(), hex.name)));
    }

    let type_names = definitions
        .iter()
        .map(|d| d.name.as_str())
        .chain(hex_names.iter().map(|h| h.name.as_str()));
    for name in type_names.chain(constructors.iter().map(|(name, _)| *name)) {
        if ELM_RESERVED_CONSTRUCTORS.contains(&name) {
            return Err(CodegenError::ReservedName {
                name: name.to_string(),
                reason: "Elm core name",
            });
        }
    }

    let mut owners: HashMap<&str, &str> = HashMap::new();
    for (name, owner) in &constructors {
        if let Some(first) = owners.insert(*name, owner.as_str()) {
            return Err(CodegenError::NameCollision {
                symbol: name.to_string(),
                first: first.to_string(),
                second: owner.clone(),
            });
        }
    }
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
// Names and expressions
// ══════════════════════════════════════════════════════════════════════════════

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn escape(name: &str) -> String {
    if ELM_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

fn encoder_name(type_name: &str) -> String {
    format!("{}JsonEncoder", lower_first(type_name))
}

fn decoder_name(type_name: &str) -> String {
    format!("{}JsonDecoder", lower_first(type_name))
}

fn paren(expr: String) -> String {
    if expr.contains(' ') {
        format!("({expr})")
    } else {
        expr
    }
}

fn elm_type(ty: &Type) -> String {
    match ty {
        Type::Int32 | Type::UInt32 => "Int".to_string(),
        Type::String => "String".to_string(),
        Type::Bool => "Bool".to_string(),
        Type::Binary => "List Int".to_string(),
        Type::List(element) => format!("List {}", paren(elm_type(element))),
        Type::Maybe(inner) => format!("Maybe {}", paren(elm_type(inner))),
        Type::Result(ok, error) => format!(
            "Result {} {}",
            paren(elm_type(error)),
            paren(elm_type(ok))
        ),
        Type::Id(name) | Type::Token(name) => name.clone(),
        Type::Custom { name, arguments } => {
            let mut parts = vec![name.clone()];
            parts.extend(arguments.iter().map(|a| paren(elm_type(a))));
            parts.join(" ")
        }
        Type::Parameter(p) => escape(p),
    }
}

fn encoder_expr(ty: &Type) -> String {
    match ty {
        Type::Int32 | Type::UInt32 => "Encode.int".to_string(),
        Type::String => "Encode.string".to_string(),
        Type::Bool => "Encode.bool".to_string(),
        Type::Binary => "Encode.list Encode.int".to_string(),
        Type::List(element) => format!("Encode.list {}", paren(encoder_expr(element))),
        Type::Maybe(inner) => format!("encodeMaybe {}", paren(encoder_expr(inner))),
        Type::Result(ok, error) => format!(
            "encodeResult {} {}",
            paren(encoder_expr(ok)),
            paren(encoder_expr(error))
        ),
        Type::Id(name) | Type::Token(name) => encoder_name(name),
        Type::Custom { name, arguments } => {
            let mut parts = vec![encoder_name(name)];
            parts.extend(arguments.iter().map(|a| paren(encoder_expr(a))));
            parts.join(" ")
        }
        Type::Parameter(p) => format!("{p}Encoder"),
    }
}

fn decoder_expr(ty: &Type) -> String {
    match ty {
        Type::Int32 | Type::UInt32 => "Decode.int".to_string(),
        Type::String => "Decode.string".to_string(),
        Type::Bool => "Decode.bool".to_string(),
        Type::Binary => "Decode.list Decode.int".to_string(),
        Type::List(element) => format!("Decode.list {}", paren(decoder_expr(element))),
        Type::Maybe(inner) => format!("maybeDecoder {}", paren(decoder_expr(inner))),
        Type::Result(ok, error) => format!(
            "resultDecoder {} {}",
            paren(decoder_expr(ok)),
            paren(decoder_expr(error))
        ),
        Type::Id(name) | Type::Token(name) => decoder_name(name),
        Type::Custom { name, arguments } => {
            // Deferred so self-referential decoders are not evaluated eagerly.
            let mut parts = vec![decoder_name(name)];
            parts.extend(arguments.iter().map(|a| paren(decoder_expr(a))));
            format!("Decode.lazy (\\_ -> {})", parts.join(" "))
        }
        Type::Parameter(p) => format!("{p}Decoder"),
    }
}

/// `Pair a b` for a definition, and the encoder/decoder signatures' leading
/// parameter arguments.
struct Signature {
    applied: String,
    encoder_params: Vec<String>,
    encoder_args: Vec<String>,
    decoder_params: Vec<String>,
    decoder_args: Vec<String>,
}

fn signature(def: &CustomTypeDefinition) -> Signature {
    let params: Vec<String> = def.type_parameter_list.iter().map(|p| escape(p)).collect();
    let mut applied = vec![def.name.clone()];
    applied.extend(params.iter().cloned());
    Signature {
        applied: applied.join(" "),
        encoder_params: params.iter().map(|p| format!("({p} -> Encode.Value)")).collect(),
        encoder_args: def
            .type_parameter_list
            .iter()
            .map(|p| format!("{p}Encoder"))
            .collect(),
        decoder_params: params.iter().map(|p| format!("Decode.Decoder {p}")).collect(),
        decoder_args: def
            .type_parameter_list
            .iter()
            .map(|p| format!("{p}Decoder"))
            .collect(),
    }
}

fn doc_comment(w: &mut SourceWriter, description: &str) {
    if description.trim().is_empty() {
        return;
    }
    w.line(&format!("{{-| {}", description.trim()));
    w.line("-}");
}

/// Two blank lines, as between Elm top-level declarations.
fn separate(w: &mut SourceWriter) {
    w.blank();
    w.blank();
}

fn encoder_header(w: &mut SourceWriter, def: &CustomTypeDefinition, sig: &Signature, arg: &str) {
    let name = encoder_name(&def.name);
    let mut types = sig.encoder_params.clone();
    types.push(paren(sig.applied.clone()));
    types.push("Encode.Value".to_string());
    w.line(&format!("{name} : {}", types.join(" -> ")));
    let mut args = sig.encoder_args.clone();
    args.push(arg.to_string());
    w.open(&format!("{name} {} =", args.join(" ")));
}

fn decoder_header(w: &mut SourceWriter, def: &CustomTypeDefinition, sig: &Signature) {
    let name = decoder_name(&def.name);
    let mut types = sig.decoder_params.clone();
    types.push(format!("Decode.Decoder {}", paren(sig.applied.clone())));
    w.line(&format!("{name} : {}", types.join(" -> ")));
    if sig.decoder_args.is_empty() {
        w.open(&format!("{name} ="));
    } else {
        w.open(&format!("{name} {} =", sig.decoder_args.join(" ")));
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Sections
// ══════════════════════════════════════════════════════════════════════════════

fn hex_section(name: &str) -> String {
    let lower = lower_first(name);
    let encoder = encoder_name(name);
    let decoder = decoder_name(name);
    let mut w = SourceWriter::new();

    w.open(&format!("type {name}"));
    w.line(&format!("= {name} String"));
    w.dedent();
    separate(&mut w);

    w.line(&format!("{lower}ToString : {name} -> String"));
    w.open(&format!("{lower}ToString ({name} value) ="));
    w.line("value");
    w.dedent();
    separate(&mut w);

    w.line(&format!("{encoder} : {name} -> Encode.Value"));
    w.open(&format!("{encoder} ({name} value) ="));
    w.line("Encode.string value");
    w.dedent();
    separate(&mut w);

    w.line(&format!("{decoder} : Decode.Decoder {name}"));
    w.open(&format!("{decoder} ="));
    w.line(&format!("Decode.map ({name} << String.toLower) Decode.string"));
    w.dedent();
    w.finish()
}

fn product_section(def: &CustomTypeDefinition, members: &[Member], wrapped: bool) -> String {
    let sig = signature(def);
    let fields: Vec<String> = members.iter().map(|m| escape(&m.name)).collect();
    let mut w = SourceWriter::new();

    doc_comment(&mut w, &def.description);
    if wrapped {
        w.open(&format!("type {}", sig.applied));
        w.open(&format!("= {}", def.name));
        w.block(&members_record(members, &fields));
        w.dedent();
    } else {
        w.open(&format!("type alias {} =", sig.applied));
        w.block(&members_record(members, &fields));
    }
    w.dedent();
    separate(&mut w);

    let value = if wrapped {
        format!("({} value)", def.name)
    } else {
        "value".to_string()
    };
    encoder_header(&mut w, def, &sig, &value);
    w.open("Encode.object");
    for (i, (member, field)) in members.iter().zip(&fields).enumerate() {
        let lead = if i == 0 { "[" } else { "," };
        w.line(&format!(
            "{lead} ( \"{}\", {} value.{field} )",
            member.name,
            paren(encoder_expr(&member.ty))
        ));
    }
    w.line("]");
    w.dedent();
    w.dedent();
    separate(&mut w);

    decoder_header(&mut w, def, &sig);
    if wrapped {
        let assigns: Vec<String> = fields.iter().map(|f| format!("{f} = {f}")).collect();
        w.open(&format!(
            "Decode.succeed (\\{} -> {} {{ {} }})",
            fields.join(" "),
            def.name,
            assigns.join(", ")
        ));
    } else {
        w.open(&format!("Decode.succeed {}", def.name));
    }
    for member in members {
        w.line(&format!(
            "|> andMap (Decode.field \"{}\" {})",
            member.name,
            paren(decoder_expr(&member.ty))
        ));
    }
    w.dedent();
    w.dedent();
    w.finish()
}

fn members_record(members: &[Member], fields: &[String]) -> String {
    let mut lines = Vec::with_capacity(members.len() + 1);
    for (i, (member, field)) in members.iter().zip(fields).enumerate() {
        let lead = if i == 0 { "{" } else { "," };
        lines.push(format!("{lead} {field} : {}", elm_type(&member.ty)));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

fn type_declaration(w: &mut SourceWriter, def: &CustomTypeDefinition, sig: &Signature, patterns: &[Pattern]) {
    doc_comment(w, &def.description);
    w.open(&format!("type {}", sig.applied));
    for (i, pattern) in patterns.iter().enumerate() {
        let lead = if i == 0 { "=" } else { "|" };
        match &pattern.parameter {
            Some(ty) => w.line(&format!("{lead} {} {}", pattern.name, paren(elm_type(ty)))),
            None => w.line(&format!("{lead} {}", pattern.name)),
        }
    }
    w.dedent();
    separate(w);
}

fn tag_only_section(def: &CustomTypeDefinition, patterns: &[Pattern]) -> String {
    let sig = signature(def);
    let mut w = SourceWriter::new();
    type_declaration(&mut w, def, &sig, patterns);

    encoder_header(&mut w, def, &sig, "value");
    w.open("case value of");
    for (i, pattern) in patterns.iter().enumerate() {
        if i > 0 {
            w.blank();
        }
        w.open(&format!("{} ->", pattern.name));
        w.line(&format!("Encode.string \"{}\"", pattern.name));
        w.dedent();
    }
    w.dedent();
    w.dedent();
    separate(&mut w);

    decoder_header(&mut w, def, &sig);
    w.line("Decode.string");
    dispatch(&mut w, def, patterns, |w, pattern| {
        w.line(&format!("Decode.succeed {}", pattern.name));
    });
    w.dedent();
    w.finish()
}

fn sum_section(def: &CustomTypeDefinition, patterns: &[Pattern]) -> String {
    let sig = signature(def);
    let mut w = SourceWriter::new();
    type_declaration(&mut w, def, &sig, patterns);

    encoder_header(&mut w, def, &sig, "value");
    w.open("case value of");
    for (i, pattern) in patterns.iter().enumerate() {
        if i > 0 {
            w.blank();
        }
        let tag = format!("( \"_\", Encode.string \"{}\" )", pattern.name);
        match &pattern.parameter {
            Some(ty) => {
                w.open(&format!("{} payload ->", pattern.name));
                w.line(&format!(
                    "Encode.object [ {tag}, ( \"value\", {} payload ) ]",
                    paren(encoder_expr(ty))
                ));
            }
            None => {
                w.open(&format!("{} ->", pattern.name));
                w.line(&format!("Encode.object [ {tag} ]"));
            }
        }
        w.dedent();
    }
    w.dedent();
    w.dedent();
    separate(&mut w);

    decoder_header(&mut w, def, &sig);
    w.line("Decode.field \"_\" Decode.string");
    dispatch(&mut w, def, patterns, |w, pattern| match &pattern.parameter {
        Some(ty) => w.line(&format!(
            "Decode.map {} (Decode.field \"value\" {})",
            pattern.name,
            paren(decoder_expr(ty))
        )),
        None => w.line(&format!("Decode.succeed {}", pattern.name)),
    });
    w.dedent();
    w.finish()
}

/// `|> Decode.andThen (\tag -> case tag of ...)` with one branch per pattern.
fn dispatch(
    w: &mut SourceWriter,
    def: &CustomTypeDefinition,
    patterns: &[Pattern],
    branch: impl Fn(&mut SourceWriter, &Pattern),
) {
    w.indent();
    w.open("|> Decode.andThen");
    w.open("(\\tag ->");
    w.open("case tag of");
    for pattern in patterns {
        w.open(&format!("\"{}\" ->", pattern.name));
        branch(w, pattern);
        w.dedent();
        w.blank();
    }
    w.open("_ ->");
    w.line(&format!("Decode.fail (\"unknown {} pattern: \" ++ tag)", def.name));
    w.dedent();
    w.dedent();
    w.close(")");
    w.dedent();
    w.dedent();
}
