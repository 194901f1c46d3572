//! Shared types for the typecodec schema compiler.
//!
//! This crate defines the schema type model, read-only schema walks, and the
//! structured error type used across all compiler stages.

mod error;
pub mod model;
pub mod schema;

pub use error::{ErrorCategory, ErrorCode, SchemaError};
pub use model::{
    CustomTypeDefinition, CustomTypeDefinitionBody, Member, Pattern, Type, ID_BYTE_SIZE,
    TOKEN_BYTE_SIZE,
};
pub use schema::{collect_hex_names, DefinitionIndex, HexKind, HexName};

/// Result type used throughout the schema compiler.
pub type Result<T> = std::result::Result<T, SchemaError>;
