// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Validate command - stream a file through the validator and report counts.

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context as _;
use clap::Args;

use crate::common::{
    format_bytes, format_duration, format_timestamp, load_options, ProgressBar, Result,
};
use robostream::io::formats::mcap::validate_reader_with;
use robostream::{StreamOptions, StreamSummary};

/// Check that a file is a complete, well-formed MCAP stream.
#[derive(Args, Clone, Debug)]
pub struct ValidateCmd {
    /// Input MCAP file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Load options from a TOML file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verify chunk CRCs
    #[arg(long)]
    validate_crcs: bool,

    /// Bytes read from the file per call
    #[arg(long, value_name = "BYTES")]
    read_size: Option<usize>,

    /// Reject records longer than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_record_size: Option<usize>,

    /// Reject chunks that decompress to more than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_chunk_size: Option<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

impl ValidateCmd {
    /// Combine the config file with command-line overrides.
    fn options(&self) -> Result<StreamOptions> {
        let mut options = load_options(self.config.as_deref())?;
        if self.validate_crcs {
            options.chunk.validate_crcs = true;
        }
        if let Some(size) = self.read_size {
            options.read_buffer_size = size;
        }
        if let Some(limit) = self.max_record_size {
            options.reader.record_length_limit = Some(limit);
        }
        if let Some(limit) = self.max_chunk_size {
            options.chunk.max_decompressed_size = limit;
        }
        options.validate()?;
        Ok(options)
    }

    pub fn run(self) -> Result<()> {
        let options = self.options()?;
        let file = File::open(&self.input)
            .with_context(|| format!("Failed to open '{}'", self.input.display()))?;
        let total = file.metadata()?.len();

        if !self.json {
            println!("Reading {}", self.input.display());
        }

        let progress = ProgressBar::new(total, "Validating");
        let start = Instant::now();
        let result = validate_reader_with(
            file,
            options,
            |_, _| Ok(()),
            |bytes| progress.set_position(bytes),
        );
        progress.finish_and_clear();
        let summary = result?;
        let elapsed = start.elapsed().as_secs_f64();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary, elapsed);
        }
        Ok(())
    }
}

fn print_summary(summary: &StreamSummary, elapsed_secs: f64) {
    let bytes = summary.bytes_read as f64;
    let rate = if elapsed_secs > 0.0 {
        bytes / elapsed_secs
    } else {
        bytes
    };
    println!(
        "Read {} in {:.2}ms ({}/sec)",
        format_bytes(bytes),
        elapsed_secs * 1000.0,
        format_bytes(rate)
    );

    println!("Record counts:");
    for (kind, count) in &summary.record_counts {
        println!("  {count:>6} {kind}");
    }
    if !summary.nested_record_counts.is_empty() {
        println!(
            "Records in {} chunks ({} decompressed):",
            summary.chunk_count,
            format_bytes(summary.decompressed_bytes as f64)
        );
        for (kind, count) in &summary.nested_record_counts {
            println!("  {count:>6} {kind}");
        }
    }

    if let (Some(start), Some(end)) = (summary.start_time, summary.end_time) {
        println!("Start: {}", format_timestamp(start));
        println!("End: {}", format_timestamp(end));
        println!("Duration: {}", format_duration(end - start));
    }

    if !summary.channels.is_empty() {
        println!("Channels:");
        for channel in &summary.channels {
            println!(
                "  [{}] {} | {} | {} | {} messages",
                channel.id,
                channel.topic,
                channel.serialization_format,
                channel.schema_format,
                channel.message_count
            );
        }
    }
}
