//! # Check Subcommand
//!
//! Validates a schema file without generating code.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use typecodec_codegen::GenerateOptions;
use typecodec_compiler::{check, compile_to_result, CompileResult, VERSION};

/// Arguments for the `typecodec check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema file (a JSON array of type definitions).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Print the result as JSON diagnostics instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 if the schema is valid, 1 otherwise.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let json = std::fs::read_to_string(&args.schema)
        .with_context(|| format!("failed to read schema {}", args.schema.display()))?;

    if args.json {
        let mut result = compile_to_result(&json, &GenerateOptions::default());
        // Only the verdict matters here.
        result.output = None;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(exit_code(&result));
    }

    match check(&json) {
        Ok(definitions) => {
            println!(
                "OK: {} ({} definitions, typecodec {VERSION})",
                args.schema.display(),
                definitions.len()
            );
            Ok(0)
        }
        Err(err) => {
            println!("FAIL: {}: {err}", args.schema.display());
            if let typecodec_compiler::CompileError::Schema(schema) = &err {
                if let Some(suggestion) = &schema.suggestion {
                    println!("  hint: {suggestion}");
                }
            }
            Ok(1)
        }
    }
}

fn exit_code(result: &CompileResult) -> u8 {
    u8::from(!result.success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_valid_and_invalid_schema() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        std::fs::write(
            &good,
            r#"[{"name":"Color","body":{"sum":[{"name":"Red"},{"name":"Blue"}]}}]"#,
        )
        .unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"[{"name":"Color","body":{"sum":[]}}]"#).unwrap();

        let run = |schema: &PathBuf, json: bool| {
            run_check(&CheckArgs {
                schema: schema.clone(),
                json,
            })
            .unwrap()
        };
        assert_eq!(run(&good, false), 0);
        assert_eq!(run(&bad, false), 1);
        assert_eq!(run(&good, true), 0);
        assert_eq!(run(&bad, true), 1);
    }

    #[test]
    fn check_missing_file_is_error() {
        let args = CheckArgs {
            schema: PathBuf::from("/nonexistent/schema.json"),
            json: false,
        };
        assert!(run_check(&args).is_err());
    }
}
