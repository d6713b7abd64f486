// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MCAP format implementation.
//!
//! This module provides an incremental, non-blocking MCAP reader:
//! - [`McapReader`] turns appended byte fragments into records
//! - [`parse_record`] and [`verify_magic`] decode records from a plain slice
//! - [`ExpandedChunk`] decompresses chunks and iterates their records
//! - [`StreamValidator`] drives a whole stream and checks its structure

// Constants module (wire format)
pub mod constants;

// Record types
pub mod records;

// Stateless record codec
pub mod parse;

// Reader, chunk and stream configuration
pub mod options;

// Incremental reader
pub mod reader;

// Chunk decompression and iteration
pub mod chunk;

// Whole-stream driver
pub mod stream;

pub use constants::{
    FORMAT_VERSION, MCAP_MAGIC, OP_CHANNEL_INFO, OP_CHUNK, OP_CHUNK_INFO, OP_FOOTER,
    OP_INDEX_DATA, OP_MESSAGE,
};
pub use chunk::{decompress_chunk, ChunkRecords, ExpandedChunk};
pub use options::{ChunkOptions, ReaderOptions, StreamOptions};
pub use parse::{parse_record, record_extent, verify_magic};
pub use reader::McapReader;
pub use records::{ChannelInfo, Chunk, DecodedRecord, Footer, Magic, Message, Record, RecordKind};
pub use stream::{
    validate_reader, validate_reader_with, ChannelSummary, RecordOrigin, StreamSummary,
    StreamValidator,
};
