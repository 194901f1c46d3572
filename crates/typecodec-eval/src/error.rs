//! Error types for the reference codec.

use thiserror::Error;
use typecodec_runtime::DecodeError;

/// A value that does not fit its type, or bytes that do not decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },
    #[error("unknown type '{0}'")]
    UnknownType(String),
    #[error("type parameter '{0}' has no argument")]
    FreeParameter(String),
    #[error("missing member '{member}' at {path}")]
    MissingMember { path: String, member: String },
    #[error("'{type_name}' has no pattern named '{pattern}'")]
    UnknownPattern { type_name: String, pattern: String },
    #[error("pattern '{pattern}' of '{type_name}' {problem}")]
    PayloadMismatch {
        type_name: String,
        pattern: String,
        problem: &'static str,
    },
    #[error("unknown pattern index {index} for {type_name}")]
    UnknownPatternIndex { type_name: String, index: u32 },
    #[error("invalid {kind} at {path}: expected {digits} hex characters")]
    InvalidHex {
        path: String,
        kind: &'static str,
        digits: usize,
    },
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Result alias for reference codec operations.
pub type EvalResult<T> = Result<T, EvalError>;
