//! Schema-wide facts the per-type generator needs: definition lookup, the
//! set of generated symbols, and which members must be boxed.
//!
//! A Rust struct or enum cannot contain itself by value. A member (or
//! pattern payload) is boxed when its type reaches the enclosing definition
//! again without passing through a `List`, whose `Vec` already provides
//! the indirection. Maybe, Result and type arguments count as direct
//! containment; that over-approximates for generics that only store their
//! argument behind a List, which costs an unneeded box but never a
//! non-compiling type.

use std::collections::{HashMap, HashSet};

use typecodec_types::{
    collect_hex_names, CustomTypeDefinition, DefinitionIndex, HexName, Type,
};

use crate::naming::codec_name;
use crate::options::GenerateOptions;

/// Shared state for generating one schema.
#[derive(Debug)]
pub struct GenerationContext<'a> {
    index: DefinitionIndex<'a>,
    hex_names: Vec<HexName>,
    symbols: HashSet<String>,
    boxed: HashSet<(String, usize)>,
    options: GenerateOptions,
}

impl<'a> GenerationContext<'a> {
    pub fn new(definitions: &'a [CustomTypeDefinition], options: GenerateOptions) -> Self {
        let index = DefinitionIndex::new(definitions);
        let hex_names = collect_hex_names(definitions);

        let mut symbols = HashSet::new();
        for def in definitions {
            symbols.insert(def.name.clone());
            symbols.insert(codec_name(&def.name));
        }
        for hex in &hex_names {
            symbols.insert(hex.name.clone());
            symbols.insert(codec_name(&hex.name));
        }

        let boxed = boxed_slots(definitions);

        Self {
            index,
            hex_names,
            symbols,
            boxed,
            options,
        }
    }

    pub fn index(&self) -> &DefinitionIndex<'a> {
        &self.index
    }

    pub fn definitions(&self) -> &'a [CustomTypeDefinition] {
        self.index.definitions()
    }

    /// Id and Token names in first-seen order.
    pub fn hex_names(&self) -> &[HexName] {
        &self.hex_names
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Whether `name` is a type-level symbol of the generated module.
    pub fn is_symbol(&self, name: &str) -> bool {
        self.symbols.contains(name)
    }

    /// Whether member (or pattern) number `slot` of `definition` is boxed.
    pub fn is_boxed(&self, definition: &str, slot: usize) -> bool {
        self.boxed.contains(&(definition.to_string(), slot))
    }
}

/// Custom names contained by value in `ty`.
fn direct_references<'t>(ty: &'t Type, out: &mut Vec<&'t str>) {
    match ty {
        Type::List(_) => {}
        Type::Maybe(inner) => direct_references(inner, out),
        Type::Result(ok, error) => {
            direct_references(ok, out);
            direct_references(error, out);
        }
        Type::Custom { name, arguments } => {
            out.push(name);
            for argument in arguments {
                direct_references(argument, out);
            }
        }
        _ => {}
    }
}

/// The payload or member types of a body, by slot.
fn slot_types(def: &CustomTypeDefinition) -> Vec<Option<&Type>> {
    use typecodec_types::CustomTypeDefinitionBody as Body;
    match &def.body {
        Body::Product(members) => members.iter().map(|m| Some(&m.ty)).collect(),
        Body::Sum(patterns) => patterns.iter().map(|p| p.parameter.as_ref()).collect(),
    }
}

fn reaches(
    graph: &HashMap<&str, Vec<&str>>,
    from: &str,
    target: &str,
    visited: &mut HashSet<String>,
) -> bool {
    if from == target {
        return true;
    }
    if !visited.insert(from.to_string()) {
        return false;
    }
    graph
        .get(from)
        .is_some_and(|next| next.iter().any(|n| reaches(graph, n, target, visited)))
}

/// Every `(definition, slot)` whose type must be boxed.
pub fn boxed_slots(definitions: &[CustomTypeDefinition]) -> HashSet<(String, usize)> {
    let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();
    for def in definitions {
        let mut refs = Vec::new();
        for ty in slot_types(def).into_iter().flatten() {
            direct_references(ty, &mut refs);
        }
        graph.insert(def.name.as_str(), refs);
    }

    let mut boxed = HashSet::new();
    for def in definitions {
        for (slot, ty) in slot_types(def).into_iter().enumerate() {
            let Some(ty) = ty else { continue };
            let mut refs = Vec::new();
            direct_references(ty, &mut refs);
            let cyclic = refs
                .iter()
                .any(|r| reaches(&graph, r, &def.name, &mut HashSet::new()));
            if cyclic {
                boxed.insert((def.name.clone(), slot));
            }
        }
    }
    boxed
}
