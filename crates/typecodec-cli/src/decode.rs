//! # Decode Subcommand
//!
//! Reads a binary encoding and prints the value as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use typecodec_eval::SchemaCodec;

use crate::schema::{load_schema, parse_type, read_input, write_output};

/// Arguments for the `typecodec decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Schema file (a JSON array of type definitions).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Type of the value: a type name or a type JSON document.
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub ty: String,

    /// Binary input file. Reads stdin when omitted or `-`.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output file. Writes to stdout when omitted or `-`.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Read hex text instead of raw bytes. Whitespace is ignored.
    #[arg(long)]
    pub hex: bool,

    /// Print compact JSON on one line.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the decode subcommand.
pub fn run_decode(args: &DecodeArgs) -> Result<u8> {
    let definitions = load_schema(&args.schema)?;
    let ty = parse_type(&args.ty, &definitions)?;
    let mut bytes = read_input(args.input.as_ref())?;
    if args.hex {
        let text: String = String::from_utf8_lossy(&bytes)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        bytes = hex::decode(text).context("input is not valid hex")?;
    }

    let codec = SchemaCodec::new(&definitions);
    let value = codec
        .from_bytes(&ty, &bytes)
        .with_context(|| format!("input is not a valid {ty}"))?;
    let json = codec.value_to_json(&ty, &value)?;
    tracing::debug!(ty = %ty, bytes = bytes.len(), "decoded");

    let mut text = if args.compact {
        serde_json::to_string(&json)?
    } else {
        serde_json::to_string_pretty(&json)?
    };
    text.push('\n');
    write_output(args.output.as_ref(), text.as_bytes())?;
    Ok(0)
}
