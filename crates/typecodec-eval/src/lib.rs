//! typecodec reference codec.
//!
//! Encodes and decodes dynamic [`Value`]s against a schema without generating
//! any code. Used by the CLI's `encode`/`decode` commands and as the golden
//! reference that generated codecs are checked against.

pub mod codec;
pub mod error;
pub mod json;
pub mod value;

pub use codec::{decode_value, encode_value, SchemaCodec, DEFAULT_MAX_DEPTH};
pub use error::{EvalError, EvalResult};
pub use json::TAG_FIELD;
pub use value::Value;
