//! Codecs generated from `schema/fixture.json` by the build script.
//!
//! [`inline`] carries its own kernel; [`imported`] uses `typecodec_runtime`.
//! Both are compiled from the same schema, so their wire output must agree
//! byte for byte.

/// The fixture schema the modules below were generated from.
pub const FIXTURE_SCHEMA: &str = include_str!("../schema/fixture.json");

/// Self-contained output (`KernelMode::Inline`).
pub mod inline {
    include!(concat!(env!("OUT_DIR"), "/inline.rs"));
}

/// Output importing the runtime crate (`KernelMode::Import`).
pub mod imported {
    include!(concat!(env!("OUT_DIR"), "/imported.rs"));
}
