//! # typecodec CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use typecodec_cli::check::{run_check, CheckArgs};
use typecodec_cli::decode::{run_decode, DecodeArgs};
use typecodec_cli::encode::{run_encode, EncodeArgs};
use typecodec_cli::generate::{run_generate, GenerateArgs};

/// typecodec: schema compiler for compact binary codecs.
#[derive(Parser, Debug)]
#[command(name = "typecodec", version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging on stderr. Repeat for more (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a schema file.
    Check(CheckArgs),

    /// Generate codec source from a schema.
    Generate(GenerateArgs),

    /// Encode a JSON value into bytes.
    Encode(EncodeArgs),

    /// Decode bytes into a JSON value.
    Decode(DecodeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "typecodec starting");

    let result = match cli.command {
        Commands::Check(args) => run_check(&args),
        Commands::Generate(args) => run_generate(&args),
        Commands::Encode(args) => run_encode(&args),
        Commands::Decode(args) => run_decode(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
