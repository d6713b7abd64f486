// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Robostream
//!
//! Incremental, non-blocking reader for MCAP record streams.
//!
//! Bytes are appended as they arrive (from a socket, a file read loop, a
//! browser stream...) and records are pulled out as soon as they are complete.
//! A pull that does not have enough bytes yet returns `Ok(None)` and consumes
//! nothing.
//!
//! ## Architecture
//!
//! - `io/byte_storage` - Append-and-consume byte accumulator
//! - `io/formats/mcap/` - Record codec, incremental reader, chunk expansion
//!   and whole-stream validation
//! - `core/` - Error type and channel registry
//!
//! ## Example: Pulling records
//!
//! ```rust
//! use robostream::{McapReader, Record};
//!
//! # fn main() -> robostream::Result<()> {
//! let mut reader = McapReader::new();
//! reader.append(&[0x89, b'M', b'C', b'A', b'P', 0x30, b'\r', b'\n', 1]);
//! let magic = reader.read_magic()?.expect("magic is fully buffered");
//! assert_eq!(magic.format_version, 1);
//!
//! // A footer arrives in two pieces.
//! reader.append(&[6, 0xef, 0xcd, 0xab]);
//! assert!(reader.read_record()?.is_none());
//! reader.append(&[0x89, 0x67, 0x45, 0x23, 0x01, 0x67, 0x45, 0x23, 0x01]);
//! match reader.read_record()? {
//!     Some(Record::Footer(footer)) => assert_eq!(footer.index_pos, 0x0123456789abcdef),
//!     other => panic!("unexpected {other:?}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Validating a file
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use robostream::{validate_reader, StreamOptions};
//!
//! let file = std::fs::File::open("recording.mcap")?;
//! let summary = validate_reader(file, StreamOptions::default())?;
//! println!("{} messages on {} channels", summary.message_count, summary.channels.len());
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{ChannelRegistry, McapError, Result};

// I/O types (byte storage, format implementations)
pub mod io;

// Re-export key MCAP types
pub use io::formats::mcap::{
    validate_reader, ChannelInfo, Chunk, ChunkOptions, ExpandedChunk, Footer, Magic, McapReader,
    Message, ReaderOptions, Record, RecordKind, RecordOrigin, StreamOptions, StreamSummary,
    StreamValidator,
};
