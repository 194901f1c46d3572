//! # typecodec-cli
//!
//! The `typecodec` binary.
//!
//! ## Subcommands
//!
//! - `check`: validate a schema file
//! - `generate`: emit Rust codecs or an Elm JSON module
//! - `encode`: JSON value to bytes, via the reference codec
//! - `decode`: bytes to JSON value, via the reference codec
//!
//! Argument parsing lives here; every handler delegates to the library
//! crates and returns a process exit code.

pub mod check;
pub mod decode;
pub mod encode;
pub mod generate;
pub mod schema;
