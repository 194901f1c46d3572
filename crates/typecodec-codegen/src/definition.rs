//! The declaration list handed to the renderer.

use serde::Serialize;

/// What a [`Definition`] declares. Drives how the renderer attaches its
/// documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    /// `use` items.
    Import,
    /// An inline module (the kernel or the wrapper codecs).
    Module,
    /// A struct or enum declaration, with inherent helpers.
    Type,
    /// Tag constructors of a sum type.
    Tags,
    /// A codec struct and its `Codec` impl.
    Codec,
}

/// One named declaration with its documentation and source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub name: String,
    pub document: String,
    pub kind: DefinitionKind,
    pub code: String,
}

impl Definition {
    pub fn new(
        name: impl Into<String>,
        document: impl Into<String>,
        kind: DefinitionKind,
        code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            document: document.into(),
            kind,
            code: code.into(),
        }
    }
}
