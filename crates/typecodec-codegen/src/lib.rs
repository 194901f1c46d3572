//! typecodec code generator: turns a validated schema into Rust source.
//!
//! # Architecture
//!
//! Generation produces an ordered list of [`Definition`]s (see
//! [`assemble`]) which the [`render`] step prints as text. Every custom type
//! yields a type declaration, tag helpers for sums, and a codec
//! implementing the runtime's `Codec` trait:
//!
//! | Schema              | Rust                                        |
//! |---------------------|---------------------------------------------|
//! | product             | `struct` with one `pub` field per member    |
//! | sum, no payloads    | fieldless `Copy` enum + `as_str` / `ALL`    |
//! | sum with payloads   | enum + constructor fns / consts             |
//! | `Id(X)`, `Token(X)` | `struct X(String)` newtype                  |
//! | generic `T<a>`      | `T<A>` + `TCodec<'a, A>` over `&dyn Codec`  |
//!
//! Members that would make a type contain itself by value are boxed.
//!
//! The [`elm`] module is a second, independent backend emitting Elm JSON
//! encoders and decoders.

pub mod assemble;
pub mod context;
pub mod custom;
pub mod definition;
pub mod elm;
pub mod error;
pub mod hex;
pub mod naming;
pub mod options;
pub mod render;
pub mod writer;

pub use assemble::assemble;
pub use custom::{generate, CustomTypeOutput};
pub use definition::{Definition, DefinitionKind};
pub use elm::emit_elm;
pub use error::{CodegenError, CodegenResult};
pub use options::{GenerateOptions, KernelMode, Target, DEFAULT_RUNTIME_CRATE};
pub use render::{render, render_header};

use typecodec_types::CustomTypeDefinition;

/// Assemble and render a schema as Rust source, without a header.
pub fn generate_rust(
    definitions: &[CustomTypeDefinition],
    options: &GenerateOptions,
) -> CodegenResult<String> {
    let declarations = assemble(definitions, options)?;
    Ok(render(&declarations))
}
