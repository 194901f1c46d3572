use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Naming,
    Duplicate,
    Reference,
    Scope,
    /// A code outside the ranges above.
    Other,
}

/// Numeric schema error code (E100–E499).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Naming errors (E100–E199) ──
    pub const INVALID_TYPE_NAME: Self = Self(100);
    pub const INVALID_PARAMETER_NAME: Self = Self(101);
    pub const INVALID_MEMBER_NAME: Self = Self(102);
    pub const INVALID_PATTERN_NAME: Self = Self(103);
    pub const INVALID_ID_NAME: Self = Self(104);

    // ── Duplicate / shape errors (E200–E299) ──
    pub const DUPLICATE_TYPE_NAME: Self = Self(200);
    pub const DUPLICATE_PARAMETER: Self = Self(201);
    pub const DUPLICATE_MEMBER: Self = Self(202);
    pub const DUPLICATE_PATTERN: Self = Self(203);
    pub const EMPTY_BODY: Self = Self(204);
    pub const ID_SHADOWS_TYPE: Self = Self(205);
    pub const ID_TOKEN_CONFLICT: Self = Self(206);

    // ── Reference errors (E300–E399) ──
    pub const UNKNOWN_TYPE: Self = Self(300);
    pub const WRONG_ARGUMENT_COUNT: Self = Self(301);

    // ── Scope errors (E400–E499) ──
    pub const UNBOUND_PARAMETER: Self = Self(400);

    /// Get the category for this error code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Naming,
            200..=299 => ErrorCategory::Duplicate,
            300..=399 => ErrorCategory::Reference,
            400..=499 => ErrorCategory::Scope,
            _ => ErrorCategory::Other,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naming => write!(f, "naming"),
            Self::Duplicate => write!(f, "duplicate"),
            Self::Reference => write!(f, "reference"),
            Self::Scope => write!(f, "scope"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A structured schema error.
///
/// `path` locates the offending item, e.g. `User.members.name` or
/// `Shape.patterns.Circle`. Tooling renders these fields; it must not parse
/// the display string.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{path}: {code} [{category}] {message}")]
pub struct SchemaError {
    pub code: ErrorCode,
    pub category: ErrorCategory,
    pub message: String,
    pub path: String,
    /// Optional fix suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl SchemaError {
    pub fn new(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            category: code.category(),
            message: message.into(),
            path: path.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}
