//! # Generate Subcommand
//!
//! Compiles a schema into Rust codec source, or an Elm JSON module.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use typecodec_codegen::{GenerateOptions, KernelMode, Target, DEFAULT_RUNTIME_CRATE};
use typecodec_compiler::compile;

use crate::schema::{describe, load_schema, write_output};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Rust,
    Elm,
}

/// Arguments for the `typecodec generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Schema file (a JSON array of type definitions).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Output file. Writes to stdout when omitted or `-`.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output language.
    #[arg(long, value_enum, default_value_t = TargetArg::Rust)]
    pub target: TargetArg,

    /// Embed the primitive codecs instead of importing the runtime crate.
    #[arg(long, conflicts_with = "runtime_crate")]
    pub with_kernel: bool,

    /// Crate path the generated code imports the runtime from.
    #[arg(long, value_name = "PATH")]
    pub runtime_crate: Option<String>,

    /// Elm module name (required with `--target elm`).
    #[arg(long, value_name = "NAME")]
    pub elm_module: Option<String>,
}

impl GenerateArgs {
    /// Translate flags into generation options.
    pub fn options(&self) -> Result<GenerateOptions> {
        let kernel = if self.with_kernel {
            KernelMode::Inline
        } else {
            KernelMode::Import {
                crate_path: self
                    .runtime_crate
                    .clone()
                    .unwrap_or_else(|| DEFAULT_RUNTIME_CRATE.to_string()),
            }
        };
        let target = match (self.target, &self.elm_module) {
            (TargetArg::Rust, None) => Target::Rust,
            (TargetArg::Rust, Some(_)) => bail!("--elm-module requires --target elm"),
            (TargetArg::Elm, Some(module_name)) => Target::Elm {
                module_name: module_name.clone(),
            },
            (TargetArg::Elm, None) => bail!("--target elm requires --elm-module"),
        };
        Ok(GenerateOptions { kernel, target })
    }
}

/// Execute the generate subcommand.
pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let options = args.options()?;
    let definitions = load_schema(&args.schema)?;
    tracing::debug!(?options, definitions = definitions.len(), "generating");

    let output = compile(&definitions, &options).map_err(|err| describe(err, &args.schema))?;
    write_output(args.output.as_ref(), output.source.as_bytes())
        .context("failed to write generated source")?;
    tracing::info!(fingerprint = %output.fingerprint, "generation complete");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(target: TargetArg, elm_module: Option<&str>) -> GenerateArgs {
        GenerateArgs {
            schema: PathBuf::from("schema.json"),
            output: None,
            target,
            with_kernel: false,
            runtime_crate: None,
            elm_module: elm_module.map(str::to_string),
        }
    }

    #[test]
    fn options_default_to_runtime_import() {
        let options = args(TargetArg::Rust, None).options().unwrap();
        assert_eq!(options, GenerateOptions::default());
    }

    #[test]
    fn options_custom_runtime_and_kernel() {
        let mut a = args(TargetArg::Rust, None);
        a.runtime_crate = Some("crate::wire".into());
        assert_eq!(a.options().unwrap(), GenerateOptions::import("crate::wire"));
        a.runtime_crate = None;
        a.with_kernel = true;
        assert_eq!(a.options().unwrap(), GenerateOptions::inline());
    }

    #[test]
    fn options_elm_requires_module() {
        assert!(args(TargetArg::Elm, None).options().is_err());
        assert!(args(TargetArg::Rust, Some("Api")).options().is_err());
        assert_eq!(
            args(TargetArg::Elm, Some("Api")).options().unwrap(),
            GenerateOptions::elm("Api")
        );
    }

    #[test]
    fn generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let schema = dir.path().join("schema.json");
        std::fs::write(
            &schema,
            r#"[{"name":"Point","body":{"product":[{"name":"x","type":"Int32"},{"name":"y","type":"Int32"}]}}]"#,
        )
        .unwrap();
        let out = dir.path().join("point.rs");
        let mut a = args(TargetArg::Rust, None);
        a.schema = schema;
        a.output = Some(out.clone());
        a.with_kernel = true;

        assert_eq!(run_generate(&a).unwrap(), 0);
        let source = std::fs::read_to_string(out).unwrap();
        assert!(source.contains("pub struct Point {"));
        assert!(source.contains("pub mod kernel {"));
    }
}
