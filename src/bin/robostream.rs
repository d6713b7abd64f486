// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robostream CLI
//!
//! Command-line tool for checking MCAP record streams.
//!
//! ## Usage
//!
//! ```sh
//! # Validate a file and print record counts
//! robostream validate file.mcap
//!
//! # Validate with chunk CRC checks and a JSON summary
//! robostream validate --validate-crcs --json file.mcap
//!
//! # Print the first 20 records
//! robostream dump --limit 20 file.mcap
//! ```

mod cmd;
mod common;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{DumpCmd, ValidateCmd};
use common::{init_logging, Result};
use robostream::McapError;
use tracing::debug;

/// Robostream - incremental MCAP stream reader
///
/// Streams files through the non-blocking reader, expanding chunks and
/// checking channel consistency along the way.
#[derive(Parser, Clone)]
#[command(name = "robostream")]
#[command(about = "Validate and dump MCAP record streams", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Check that a file is a complete, well-formed stream
    Validate(ValidateCmd),

    /// Print every record, nested chunk records indented
    Dump(DumpCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Validate(cmd) => cmd.run(),
        Commands::Dump(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        if let Some(err) = e.downcast_ref::<McapError>() {
            for (field, value) in err.log_fields() {
                debug!(context = "robostream", field, value = %value, "Error detail");
            }
        }
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
