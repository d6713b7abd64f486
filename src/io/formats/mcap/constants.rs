// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! MCAP format constants.
//!
//! Magic bytes, the supported format version and record tags for the
//! chunked record stream. Using a single source of truth for these constants
//! keeps the codec, the reader and the test encoders in agreement.

/// MCAP magic bytes (at start of stream and after the footer).
pub const MCAP_MAGIC: [u8; 8] = [0x89, 0x4D, 0x43, 0x41, 0x50, 0x30, 0x0D, 0x0A];

/// The only format version accepted after the magic bytes.
pub const FORMAT_VERSION: u8 = 1;

/// Length of the magic marker including the version byte.
pub const MAGIC_MARKER_LEN: usize = MCAP_MAGIC.len() + 1;

/// Channel info record - declares a channel and its schema.
pub const OP_CHANNEL_INFO: u8 = 0x01;
/// Message record - one payload on a channel.
pub const OP_MESSAGE: u8 = 0x02;
/// Chunk record - a (possibly compressed) stream of nested records.
pub const OP_CHUNK: u8 = 0x03;
/// Index data record.
pub const OP_INDEX_DATA: u8 = 0x04;
/// Chunk info record.
pub const OP_CHUNK_INFO: u8 = 0x05;
/// Footer record - fixed length, terminates the record sequence.
pub const OP_FOOTER: u8 = 0x06;

/// Size of the record tag.
pub const TAG_LEN: usize = 1;
/// Size of the record length prefix (absent for the footer).
pub const LENGTH_LEN: usize = 4;
/// Size of the footer body: index position (u64) + index CRC (u32).
pub const FOOTER_BODY_LEN: usize = 8 + 4;

/// Chunk compression name for uncompressed chunks.
pub const COMPRESSION_NONE: &str = "";
/// Chunk compression name for LZ4 block compression.
pub const COMPRESSION_LZ4: &str = "lz4";

/// Largest ratio between an LZ4 block's decompressed and compressed size.
pub const LZ4_MAX_EXPANSION: u64 = 255;
/// Allowance on top of [`LZ4_MAX_EXPANSION`] for very small blocks.
pub const LZ4_EXPANSION_SLACK: u64 = 16;
