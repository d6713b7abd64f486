// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dump command - print one line per record.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use crate::common::{format_bytes, format_timestamp, hex_preview, load_options, Result};
use robostream::io::formats::mcap::validate_reader_with;
use robostream::{Record, RecordOrigin};

/// Bytes of message payload shown per line.
const PREVIEW_BYTES: usize = 16;

/// Print every record in a file, nested chunk records indented.
#[derive(Args, Clone, Debug)]
pub struct DumpCmd {
    /// Input MCAP file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Load options from a TOML file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop printing after this many records
    #[arg(short = 'n', long)]
    limit: Option<usize>,
}

impl DumpCmd {
    pub fn run(self) -> Result<()> {
        let options = load_options(self.config.as_deref())?;
        let file = File::open(&self.input)
            .with_context(|| format!("Failed to open '{}'", self.input.display()))?;

        let limit = self.limit.unwrap_or(usize::MAX);
        let mut seen = 0usize;
        let summary = validate_reader_with(
            file,
            options,
            |record, origin| {
                if seen < limit {
                    let indent = match origin {
                        RecordOrigin::TopLevel => "",
                        RecordOrigin::InChunk => "  ",
                    };
                    println!("{indent}{}", describe_record(record));
                }
                seen += 1;
                Ok(())
            },
            |_| {},
        )?;

        if seen > limit {
            println!("... {} more records", seen - limit);
        }
        println!("{} records, {} bytes", summary.total_records(), summary.bytes_read);
        Ok(())
    }
}

/// One-line description of a record.
fn describe_record(record: &Record<'_>) -> String {
    match record {
        Record::ChannelInfo(info) => format!(
            "ChannelInfo id={} topic={} serialization={} schema_format={} schema={}",
            info.id,
            info.topic,
            info.serialization_format,
            info.schema_format,
            format_bytes(info.schema.len() as f64)
        ),
        Record::Message(message) => format!(
            "Message channel={} time={} data={} [{}]",
            message.channel_id,
            format_timestamp(message.timestamp),
            format_bytes(message.data.len() as f64),
            hex_preview(&message.data, PREVIEW_BYTES)
        ),
        Record::Chunk(chunk) => format!(
            "Chunk compression={:?} size={} decompressed={} crc={:#010x}",
            chunk.compression,
            format_bytes(chunk.data.len() as f64),
            format_bytes(chunk.decompressed_size as f64),
            chunk.decompressed_crc
        ),
        Record::IndexData | Record::ChunkInfo => record.kind().to_string(),
        Record::Footer(footer) => format!(
            "Footer index_pos={:#x} index_crc={:#010x}",
            footer.index_pos, footer.index_crc
        ),
    }
}
