//! Schema validator: checks a list of custom type definitions before any
//! code is generated.
//!
//! Entry point: [`validate`]. Fail-fast: the first violation is returned.
//! Checks run schema-wide in this order:
//!
//! 1. E100: type names are UpperCamel
//! 2. E200: type names are unique
//! 3. E101 / E201: type parameters are lowerCamel and unique per definition
//! 4. E300 / E301: references name a known type with the right arity
//! 5. E400: parameters resolve to the enclosing definition
//! 6. E102 / E103 / E202 / E203 / E204: member and pattern names, non-empty bodies
//! 7. E104 / E205 / E206: Id/Token names

use std::collections::{HashMap, HashSet};

use typecodec_types::{
    CustomTypeDefinition, CustomTypeDefinitionBody, DefinitionIndex, ErrorCode, SchemaError, Type,
};

// ══════════════════════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════════════════════

/// Validate a schema. The input is never modified.
pub fn validate(definitions: &[CustomTypeDefinition]) -> Result<(), SchemaError> {
    let checker = Checker::new(definitions);
    checker.check_type_names()?;
    checker.check_duplicate_types()?;
    checker.check_type_parameters()?;
    checker.check_references()?;
    checker.check_parameter_scope()?;
    checker.check_bodies()?;
    checker.check_hex_names()?;
    tracing::debug!(definitions = definitions.len(), "schema validated");
    Ok(())
}

/// `[A-Z][A-Za-z0-9]*`
pub fn is_upper_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

/// `[a-z][A-Za-z0-9]*`
pub fn is_lower_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase()) && chars.all(|c| c.is_ascii_alphanumeric())
}

// ══════════════════════════════════════════════════════════════════════════════
// Checker
// ══════════════════════════════════════════════════════════════════════════════

struct Checker<'a> {
    definitions: &'a [CustomTypeDefinition],
    index: DefinitionIndex<'a>,
}

/// One member or pattern type, with the path used in diagnostics.
struct Slot<'a> {
    path: String,
    ty: &'a Type,
}

impl<'a> Checker<'a> {
    fn new(definitions: &'a [CustomTypeDefinition]) -> Self {
        Self {
            definitions,
            index: DefinitionIndex::new(definitions),
        }
    }

    fn slots(def: &'a CustomTypeDefinition) -> Vec<Slot<'a>> {
        match &def.body {
            CustomTypeDefinitionBody::Product(members) => members
                .iter()
                .map(|m| Slot {
                    path: format!("{}.members.{}", def.name, m.name),
                    ty: &m.ty,
                })
                .collect(),
            CustomTypeDefinitionBody::Sum(patterns) => patterns
                .iter()
                .filter_map(|p| {
                    p.parameter.as_ref().map(|ty| Slot {
                        path: format!("{}.patterns.{}", def.name, p.name),
                        ty,
                    })
                })
                .collect(),
        }
    }

    // ── (a) + (b) ───────────────────────────────────────────────────────────

    fn check_type_names(&self) -> Result<(), SchemaError> {
        for def in self.definitions {
            if !is_upper_identifier(&def.name) {
                return Err(SchemaError::new(
                    ErrorCode::INVALID_TYPE_NAME,
                    format!("type name '{}' must match [A-Z][A-Za-z0-9]*", def.name),
                    def.name.as_str(),
                )
                .with_suggestion(upper_suggestion(&def.name)));
            }
        }
        Ok(())
    }

    fn check_duplicate_types(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for def in self.definitions {
            if !seen.insert(def.name.as_str()) {
                return Err(SchemaError::new(
                    ErrorCode::DUPLICATE_TYPE_NAME,
                    format!("type '{}' is defined more than once", def.name),
                    def.name.as_str(),
                ));
            }
        }
        Ok(())
    }

    // ── (c) ─────────────────────────────────────────────────────────────────

    fn check_type_parameters(&self) -> Result<(), SchemaError> {
        for def in self.definitions {
            let mut seen = HashSet::new();
            for param in &def.type_parameter_list {
                let path = format!("{}.typeParameterList.{param}", def.name);
                if !is_lower_identifier(param) {
                    return Err(SchemaError::new(
                        ErrorCode::INVALID_PARAMETER_NAME,
                        format!("type parameter '{param}' must match [a-z][A-Za-z0-9]*"),
                        path,
                    )
                    .with_suggestion(lower_suggestion(param)));
                }
                if !seen.insert(param.as_str()) {
                    return Err(SchemaError::new(
                        ErrorCode::DUPLICATE_PARAMETER,
                        format!("type parameter '{param}' is declared more than once"),
                        path,
                    ));
                }
            }
        }
        Ok(())
    }

    // ── (d) ─────────────────────────────────────────────────────────────────

    fn check_references(&self) -> Result<(), SchemaError> {
        for def in self.definitions {
            for slot in Self::slots(def) {
                let mut found = Ok(());
                slot.ty.walk(&mut |t| {
                    if found.is_err() {
                        return;
                    }
                    if let Type::Custom { name, arguments } = t {
                        found = self.check_reference(&slot.path, name, arguments.len());
                    }
                });
                found?;
            }
        }
        Ok(())
    }

    fn check_reference(&self, path: &str, name: &str, supplied: usize) -> Result<(), SchemaError> {
        let Some(target) = self.index.get(name) else {
            let err = SchemaError::new(
                ErrorCode::UNKNOWN_TYPE,
                format!("unknown type '{name}'"),
                path,
            );
            return Err(match self.closest_type_name(name) {
                Some(close) => err.with_suggestion(format!("did you mean '{close}'?")),
                None => err,
            });
        };
        let expected = target.type_parameter_list.len();
        if expected != supplied {
            return Err(SchemaError::new(
                ErrorCode::WRONG_ARGUMENT_COUNT,
                format!("'{name}' expects {expected} type arguments, found {supplied}"),
                path,
            ));
        }
        Ok(())
    }

    /// A defined name equal to `name` ignoring case, if any.
    fn closest_type_name(&self, name: &str) -> Option<&'a str> {
        self.definitions
            .iter()
            .map(|d| d.name.as_str())
            .find(|candidate| candidate.eq_ignore_ascii_case(name))
    }

    // ── (e) ─────────────────────────────────────────────────────────────────

    fn check_parameter_scope(&self) -> Result<(), SchemaError> {
        for def in self.definitions {
            for slot in Self::slots(def) {
                let mut unbound = None;
                slot.ty.walk(&mut |t| {
                    if let Type::Parameter(name) = t {
                        if unbound.is_none() && !def.type_parameter_list.contains(name) {
                            unbound = Some(name.clone());
                        }
                    }
                });
                if let Some(name) = unbound {
                    let message = if def.is_generic() {
                        format!(
                            "type parameter '{name}' is not declared by '{}' (declares: {})",
                            def.name,
                            def.type_parameter_list.join(", ")
                        )
                    } else {
                        format!(
                            "type parameter '{name}' used in non-generic type '{}'",
                            def.name
                        )
                    };
                    return Err(SchemaError::new(
                        ErrorCode::UNBOUND_PARAMETER,
                        message,
                        slot.path,
                    ));
                }
            }
        }
        Ok(())
    }

    // ── (f) ─────────────────────────────────────────────────────────────────

    fn check_bodies(&self) -> Result<(), SchemaError> {
        for def in self.definitions {
            match &def.body {
                CustomTypeDefinitionBody::Product(members) => {
                    if members.is_empty() {
                        return Err(empty_body(def, "product has no members"));
                    }
                    let mut seen = HashSet::new();
                    for member in members {
                        let path = format!("{}.members.{}", def.name, member.name);
                        if !is_lower_identifier(&member.name) {
                            return Err(SchemaError::new(
                                ErrorCode::INVALID_MEMBER_NAME,
                                format!(
                                    "member name '{}' must match [a-z][A-Za-z0-9]*",
                                    member.name
                                ),
                                path,
                            )
                            .with_suggestion(lower_suggestion(&member.name)));
                        }
                        if !seen.insert(member.name.as_str()) {
                            return Err(SchemaError::new(
                                ErrorCode::DUPLICATE_MEMBER,
                                format!("member '{}' appears more than once", member.name),
                                path,
                            ));
                        }
                    }
                }
                CustomTypeDefinitionBody::Sum(patterns) => {
                    if patterns.is_empty() {
                        return Err(empty_body(def, "sum has no patterns"));
                    }
                    let mut seen = HashSet::new();
                    for pattern in patterns {
                        let path = format!("{}.patterns.{}", def.name, pattern.name);
                        if !is_upper_identifier(&pattern.name) {
                            return Err(SchemaError::new(
                                ErrorCode::INVALID_PATTERN_NAME,
                                format!(
                                    "pattern name '{}' must match [A-Z][A-Za-z0-9]*",
                                    pattern.name
                                ),
                                path,
                            )
                            .with_suggestion(upper_suggestion(&pattern.name)));
                        }
                        if !seen.insert(pattern.name.as_str()) {
                            return Err(SchemaError::new(
                                ErrorCode::DUPLICATE_PATTERN,
                                format!("pattern '{}' appears more than once", pattern.name),
                                path,
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    // ── (g) ─────────────────────────────────────────────────────────────────

    fn check_hex_names(&self) -> Result<(), SchemaError> {
        // name → (kind label, first path)
        let mut kinds: HashMap<String, (&'static str, String)> = HashMap::new();
        for def in self.definitions {
            for slot in Self::slots(def) {
                let mut problem = None;
                slot.ty.walk(&mut |t| {
                    if problem.is_some() {
                        return;
                    }
                    let (name, kind) = match t {
                        Type::Id(name) => (name, "Id"),
                        Type::Token(name) => (name, "Token"),
                        _ => return,
                    };
                    problem = self.check_hex_name(&slot.path, name, kind, &mut kinds);
                });
                if let Some(err) = problem {
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn check_hex_name(
        &self,
        path: &str,
        name: &str,
        kind: &'static str,
        kinds: &mut HashMap<String, (&'static str, String)>,
    ) -> Option<SchemaError> {
        if !is_upper_identifier(name) {
            return Some(
                SchemaError::new(
                    ErrorCode::INVALID_ID_NAME,
                    format!("{kind} name '{name}' must match [A-Z][A-Za-z0-9]*"),
                    path,
                )
                .with_suggestion(upper_suggestion(name)),
            );
        }
        if self.index.contains(name) {
            return Some(SchemaError::new(
                ErrorCode::ID_SHADOWS_TYPE,
                format!("{kind} name '{name}' is also the name of a custom type"),
                path,
            ));
        }
        match kinds.get(name) {
            Some((first_kind, first_path)) if *first_kind != kind => Some(
                SchemaError::new(
                    ErrorCode::ID_TOKEN_CONFLICT,
                    format!("'{name}' is used as {kind} here but as {first_kind} at {first_path}"),
                    path,
                ),
            ),
            Some(_) => None,
            None => {
                kinds.insert(name.to_string(), (kind, path.to_string()));
                None
            }
        }
    }
}

fn empty_body(def: &CustomTypeDefinition, message: &str) -> SchemaError {
    SchemaError::new(
        ErrorCode::EMPTY_BODY,
        format!("'{}': {message}", def.name),
        def.name.as_str(),
    )
}

fn upper_suggestion(name: &str) -> String {
    let fixed: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .enumerate()
        .map(|(i, c)| if i == 0 { c.to_ascii_uppercase() } else { c })
        .collect();
    format!("rename to '{fixed}'")
}

fn lower_suggestion(name: &str) -> String {
    let fixed: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .enumerate()
        .map(|(i, c)| if i == 0 { c.to_ascii_lowercase() } else { c })
        .collect();
    format!("rename to '{fixed}'")
}
