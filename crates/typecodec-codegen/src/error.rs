//! Codegen error types.

use thiserror::Error;

/// Errors that can occur during code generation.
///
/// Schema-level problems are caught by the validator first; these report
/// what only the target language forbids, or a broken internal invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// Two generated symbols would share one name.
    #[error("generated symbol '{symbol}' is produced by both {first} and {second}")]
    NameCollision {
        symbol: String,
        first: String,
        second: String,
    },

    /// A schema name clashes with a symbol the generated module relies on.
    #[error("'{name}' is reserved in generated code ({reason})")]
    ReservedName { name: String, reason: &'static str },

    /// An internal consistency check failed.
    #[error("internal codegen error: {0}")]
    Internal(String),
}

/// Codegen result type alias.
pub type CodegenResult<T> = Result<T, CodegenError>;
