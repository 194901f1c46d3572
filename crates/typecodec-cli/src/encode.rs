//! # Encode Subcommand
//!
//! Reads a JSON value and writes its binary encoding.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use typecodec_eval::SchemaCodec;

use crate::schema::{load_schema, parse_type, read_input, write_output};

/// Arguments for the `typecodec encode` subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Schema file (a JSON array of type definitions).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Type of the value: a type name or a type JSON document.
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub ty: String,

    /// JSON input file. Reads stdin when omitted or `-`.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output file. Writes to stdout when omitted or `-`.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write lowercase hex text instead of raw bytes.
    #[arg(long)]
    pub hex: bool,
}

/// Execute the encode subcommand.
pub fn run_encode(args: &EncodeArgs) -> Result<u8> {
    let definitions = load_schema(&args.schema)?;
    let ty = parse_type(&args.ty, &definitions)?;
    let input = read_input(args.input.as_ref())?;
    let json: serde_json::Value =
        serde_json::from_slice(&input).context("input is not valid JSON")?;

    let codec = SchemaCodec::new(&definitions);
    let value = codec
        .value_from_json(&ty, &json)
        .with_context(|| format!("input is not a valid {ty}"))?;
    let bytes = codec.to_bytes(&ty, &value).context("failed to encode value")?;
    tracing::debug!(ty = %ty, bytes = bytes.len(), "encoded");

    if args.hex {
        let mut text = hex::encode(&bytes);
        text.push('\n');
        write_output(args.output.as_ref(), text.as_bytes())?;
    } else {
        write_output(args.output.as_ref(), &bytes)?;
    }
    Ok(0)
}
