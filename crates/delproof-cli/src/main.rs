//! delproof CLI
//!
//! Deletes one remote object and emits a timestamped proof-of-deletion
//! receipt.

use clap::{Parser, ValueEnum};
use delproof_core::logging_facility::{init, Profile};
use std::process::ExitCode;

mod commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    /// Human-readable lines on stderr
    Pretty,
    /// One JSON object per line on stderr
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "delproof", version)]
#[command(about = "Delete a remote object and produce a timestamped proof of deletion", long_about = None)]
struct Cli {
    #[command(flatten)]
    prove: commands::prove::ProveArgs,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Pretty => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    commands::prove::execute(cli.prove)
}
