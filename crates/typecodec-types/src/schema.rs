//! Read-only views over a list of definitions.

use std::collections::HashMap;

use crate::model::{CustomTypeDefinition, Type, ID_BYTE_SIZE, TOKEN_BYTE_SIZE};

// ══════════════════════════════════════════════════════════════════════════════
// Definition lookup
// ══════════════════════════════════════════════════════════════════════════════

/// Name → definition lookup that preserves schema order.
#[derive(Debug, Clone)]
pub struct DefinitionIndex<'a> {
    definitions: &'a [CustomTypeDefinition],
    by_name: HashMap<&'a str, usize>,
}

impl<'a> DefinitionIndex<'a> {
    /// Index `definitions`. On duplicate names the first one wins.
    pub fn new(definitions: &'a [CustomTypeDefinition]) -> Self {
        let mut by_name = HashMap::with_capacity(definitions.len());
        for (i, def) in definitions.iter().enumerate() {
            by_name.entry(def.name.as_str()).or_insert(i);
        }
        Self {
            definitions,
            by_name,
        }
    }

    pub fn get(&self, name: &str) -> Option<&'a CustomTypeDefinition> {
        self.by_name.get(name).map(|&i| &self.definitions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Definitions in schema order.
    pub fn definitions(&self) -> &'a [CustomTypeDefinition] {
        self.definitions
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Id / Token name set
// ══════════════════════════════════════════════════════════════════════════════

/// Which fixed-size identifier family a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HexKind {
    Id,
    Token,
}

impl HexKind {
    /// Raw byte length on the wire.
    pub fn byte_size(self) -> usize {
        match self {
            HexKind::Id => ID_BYTE_SIZE,
            HexKind::Token => TOKEN_BYTE_SIZE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HexKind::Id => "Id",
            HexKind::Token => "Token",
        }
    }
}

/// One distinct `Id`/`Token` name reachable from a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexName {
    pub name: String,
    pub kind: HexKind,
}

impl HexName {
    pub fn byte_size(&self) -> usize {
        self.kind.byte_size()
    }
}

/// Collect every distinct `Id`/`Token` name in the schema, in first-seen
/// order (definition order, then member/pattern order, depth first).
///
/// If a name is used as both `Id` and `Token`, only the first use is kept;
/// the validator reports that case as an error before generation.
pub fn collect_hex_names(definitions: &[CustomTypeDefinition]) -> Vec<HexName> {
    let mut names: Vec<HexName> = Vec::new();
    for def in definitions {
        for ty in def.body_types() {
            ty.walk(&mut |t| {
                let found = match t {
                    Type::Id(name) => Some((name, HexKind::Id)),
                    Type::Token(name) => Some((name, HexKind::Token)),
                    _ => None,
                };
                if let Some((name, kind)) = found {
                    if !names.iter().any(|n| &n.name == name) {
                        names.push(HexName {
                            name: name.clone(),
                            kind,
                        });
                    }
                }
            });
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomTypeDefinitionBody, Member, Pattern};

    fn sample() -> Vec<CustomTypeDefinition> {
        vec![
            CustomTypeDefinition::new(
                "User",
                "",
                CustomTypeDefinitionBody::Product(vec![
                    Member::new("id", "", Type::id("UserId")),
                    Member::new("friends", "", Type::list(Type::id("UserId"))),
                    Member::new("session", "", Type::maybe(Type::token("AccessToken"))),
                ]),
            ),
            CustomTypeDefinition::new(
                "Event",
                "",
                CustomTypeDefinitionBody::Sum(vec![
                    Pattern::with_payload("Created", "", Type::id("EventId")),
                    Pattern::unit("Deleted", ""),
                ]),
            ),
        ]
    }

    #[test]
    fn test_collect_hex_names_first_seen_order() {
        let names = collect_hex_names(&sample());
        let listed: Vec<(&str, HexKind)> =
            names.iter().map(|n| (n.name.as_str(), n.kind)).collect();
        assert_eq!(
            listed,
            vec![
                ("UserId", HexKind::Id),
                ("AccessToken", HexKind::Token),
                ("EventId", HexKind::Id),
            ]
        );
    }

    #[test]
    fn test_hex_byte_sizes() {
        assert_eq!(HexKind::Id.byte_size(), 16);
        assert_eq!(HexKind::Token.byte_size(), 32);
    }

    #[test]
    fn test_definition_index_lookup() {
        let defs = sample();
        let index = DefinitionIndex::new(&defs);
        assert!(index.contains("User"));
        assert_eq!(index.get("Event").map(|d| d.name.as_str()), Some("Event"));
        assert!(index.get("Missing").is_none());
        assert_eq!(index.definitions().len(), 2);
    }

    #[test]
    fn test_collect_hex_names_determinism_100_iterations() {
        let defs = sample();
        let first = collect_hex_names(&defs);
        for i in 0..100 {
            assert_eq!(first, collect_hex_names(&defs), "Determinism failure at iteration {i}");
        }
    }
}
