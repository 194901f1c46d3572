//! typecodec compiler: orchestrates the full generation pipeline.
//!
//! ```text
//! schema JSON → parse → validate → assemble / emit → header + source
//! ```
//!
//! [`compile`] works on an already parsed schema and returns a typed error;
//! [`compile_to_result`] takes raw JSON and always returns a serializable
//! [`CompileResult`] for tooling.

pub mod checker;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use typecodec_codegen::{emit_elm, generate_rust, render_header, CodegenError, GenerateOptions, Target};
use typecodec_types::{CustomTypeDefinition, SchemaError};

pub use checker::validate;

/// Compiler version, stamped into generated headers and results.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ══════════════════════════════════════════════════════════════════════════════
// Errors
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("code generation failed: {0}")]
    Codegen(#[from] CodegenError),
}

impl CompileError {
    /// Pipeline stage that produced the error.
    pub fn stage(&self) -> Stage {
        match self {
            CompileError::Json(_) => Stage::Parse,
            CompileError::Schema(_) => Stage::Validate,
            CompileError::Codegen(_) => Stage::Generate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Parse,
    Validate,
    Generate,
}

// ══════════════════════════════════════════════════════════════════════════════
// Pipeline
// ══════════════════════════════════════════════════════════════════════════════

/// Successful compilation output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub source: String,
    pub fingerprint: String,
}

/// Parse a schema: a JSON array of custom type definitions.
pub fn parse_schema(json: &str) -> Result<Vec<CustomTypeDefinition>, CompileError> {
    let definitions: Vec<CustomTypeDefinition> = serde_json::from_str(json)?;
    tracing::debug!(definitions = definitions.len(), "schema parsed");
    Ok(definitions)
}

/// Parse and validate without generating anything.
pub fn check(json: &str) -> Result<Vec<CustomTypeDefinition>, CompileError> {
    let definitions = parse_schema(json)?;
    validate(&definitions)?;
    Ok(definitions)
}

/// SHA-256 of the schema's canonical JSON form, lowercase hex.
pub fn fingerprint(definitions: &[CustomTypeDefinition]) -> Result<String, CompileError> {
    let canonical = serde_json::to_string(definitions)?;
    Ok(format!("{:x}", Sha256::digest(canonical.as_bytes())))
}

/// Validate and generate source for `definitions`.
///
/// Rust output starts with a header carrying [`VERSION`] and the schema
/// fingerprint. Elm output is the module text only.
pub fn compile(
    definitions: &[CustomTypeDefinition],
    options: &GenerateOptions,
) -> Result<CompileOutput, CompileError> {
    validate(definitions)?;
    let fingerprint = fingerprint(definitions)?;

    let source = match &options.target {
        Target::Rust => {
            let body = generate_rust(definitions, options)?;
            let mut source = render_header(VERSION, &fingerprint);
            source.push_str(&body);
            source
        }
        Target::Elm { module_name } => emit_elm(definitions, module_name)?,
    };

    tracing::info!(
        definitions = definitions.len(),
        bytes = source.len(),
        fingerprint = %fingerprint,
        "compiled schema"
    );
    Ok(CompileOutput {
        source,
        fingerprint,
    })
}

/// Parse, validate and generate in one step.
pub fn compile_json(json: &str, options: &GenerateOptions) -> Result<CompileOutput, CompileError> {
    let definitions = parse_schema(json)?;
    compile(&definitions, options)
}

// ══════════════════════════════════════════════════════════════════════════════
// Tooling result
// ══════════════════════════════════════════════════════════════════════════════

/// One reported problem, flattened for JSON consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    /// `E100`…`E499` for schema errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl From<&CompileError> for Diagnostic {
    fn from(err: &CompileError) -> Self {
        match err {
            CompileError::Schema(schema) => Diagnostic {
                stage: Stage::Validate,
                code: Some(schema.code.to_string()),
                category: Some(schema.category.to_string()),
                message: schema.message.clone(),
                path: Some(schema.path.clone()),
                suggestion: schema.suggestion.clone(),
            },
            other => Diagnostic {
                stage: other.stage(),
                code: None,
                category: None,
                message: other.to_string(),
                path: None,
                suggestion: None,
            },
        }
    }
}

/// Full result of a compilation, serializable to JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    pub errors: Vec<Diagnostic>,
    pub compiler_version: String,
}

/// Compile raw schema JSON, capturing any failure as diagnostics.
pub fn compile_to_result(json: &str, options: &GenerateOptions) -> CompileResult {
    match compile_json(json, options) {
        Ok(output) => CompileResult {
            success: true,
            output: Some(output.source),
            fingerprint: Some(output.fingerprint),
            errors: Vec::new(),
            compiler_version: VERSION.to_string(),
        },
        Err(err) => {
            tracing::debug!(stage = ?err.stage(), error = %err, "compilation failed");
            CompileResult {
                success: false,
                output: None,
                fingerprint: None,
                errors: vec![Diagnostic::from(&err)],
                compiler_version: VERSION.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT: &str = r#"[{"name":"Point","body":{"product":[
        {"name":"x","type":"Int32"},{"name":"y","type":"Int32"}]}}]"#;

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        let defs = parse_schema(POINT).unwrap();
        let fp = fingerprint(&defs).unwrap();
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_stage_of_json_error() {
        let err = parse_schema("not json").unwrap_err();
        assert_eq!(err.stage(), Stage::Parse);
        let diag = Diagnostic::from(&err);
        assert!(diag.code.is_none());
        assert!(diag.message.starts_with("invalid schema JSON"));
    }

    #[test]
    fn test_header_precedes_body() {
        let out = compile_json(POINT, &GenerateOptions::default()).unwrap();
        assert!(out
            .source
            .starts_with(&format!("// Code generated by typecodec {VERSION}. DO NOT EDIT.\n")));
        assert!(out.source.contains(&out.fingerprint));
        assert!(out.source.contains("pub struct Point {"));
    }
}
