//! Build script for typecodec-roundtrip.
//!
//! Runs the compiler over `schema/fixture.json` once per kernel mode and
//! writes the generated modules to `OUT_DIR`, where `src/lib.rs` includes
//! them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use typecodec_codegen::GenerateOptions;

const FIXTURE: &str = "schema/fixture.json";

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={FIXTURE}");

    let schema =
        std::fs::read_to_string(FIXTURE).with_context(|| format!("failed to read {FIXTURE}"))?;
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").context("OUT_DIR is not set")?);

    let targets = [
        ("inline.rs", GenerateOptions::inline()),
        ("imported.rs", GenerateOptions::import("typecodec_runtime")),
    ];
    for (file, options) in targets {
        let output = typecodec_compiler::compile_json(&schema, &options)
            .with_context(|| format!("failed to compile {FIXTURE} into {file}"))?;
        let path = out_dir.join(file);
        std::fs::write(&path, output.source)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
