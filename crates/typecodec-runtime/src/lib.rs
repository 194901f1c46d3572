//! Runtime support for code generated by the typecodec schema compiler.
//!
//! Generated modules either import these codecs (`KernelMode::Import`) or
//! carry their own copy of [`kernel`] and [`wrapper`] (`KernelMode::Inline`).
//! The two source files are emitted byte-for-byte, so the wire format of
//! both modes is identical by construction.

pub mod kernel;
pub mod wrapper;

pub use kernel::{
    decode_hex_string, encode_hex_string, is_hex_string, BinaryCodec, BoolCodec, BoxCodec, Codec,
    DecodeError, Decoded, HexStringCodec, Int32Codec, ListCodec, StringCodec, UInt32Codec,
};
pub use wrapper::{MaybeCodec, ResultCodec};

/// Source text of [`kernel`], for inline emission.
pub const KERNEL_SOURCE: &str = include_str!("kernel.rs");

/// Source text of [`wrapper`], for inline emission.
pub const WRAPPER_SOURCE: &str = include_str!("wrapper.rs");
