//! CLI entry point. Thin wrapper around [`eventbus_gen::generate`]: parse
//! flags, initialize structured JSON logging, run the pipeline, exit
//! non-zero on failure.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

/// Generates a statically typed, in-process event bus from a Protobuf schema.
#[derive(Parser, Debug)]
#[command(name = "eventbus-gen", about, version)]
struct Cli {
    /// Path to the input .proto file.
    #[arg(long = "in", value_name = "FILE")]
    input: PathBuf,

    /// Path to the generated code output file.
    #[arg(long = "out", value_name = "FILE")]
    output: PathBuf,

    /// Path to an optional YAML config file for code generation.
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().json().with_target(false).init();

    let cli = Cli::parse();

    match eventbus_gen::generate(&cli.input, &cli.output, cli.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "failed running code generation");
            ExitCode::FAILURE
        }
    }
}
