// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for robostream.
//!
//! Every variant is fatal for the stream that produced it. "Not enough bytes
//! yet" is never an error: readers report it as `Ok(None)`.

use thiserror::Error;

use crate::io::formats::mcap::records::RecordKind;

/// Errors that can occur while decoding an MCAP stream.
#[derive(Debug, Error)]
pub enum McapError {
    /// Leading or trailing magic bytes did not match.
    #[error("Expected MCAP magic '{expected}', found '{found}'")]
    InvalidMagic {
        /// Expected bytes, hex encoded
        expected: String,
        /// Bytes found in the stream, hex encoded
        found: String,
    },

    /// Format version byte after the magic is not supported.
    #[error("Unsupported format version {0}")]
    UnsupportedVersion(u8),

    /// Record tag outside the known range.
    #[error("Invalid record type {0}")]
    InvalidRecordType(u8),

    /// A field ran past the end of its record.
    #[error("Truncated {kind} record: field '{field}' needs {needed} bytes at offset {offset}, record ends at {end}")]
    Truncated {
        /// Record being decoded
        kind: RecordKind,
        /// Field being decoded
        field: &'static str,
        /// Bytes the field needs
        needed: usize,
        /// Offset of the field within the buffer
        offset: usize,
        /// End offset of the record within the buffer
        end: usize,
    },

    /// Record type is known but decoding it is not supported.
    #[error("Not yet implemented: {0} record")]
    NotImplemented(RecordKind),

    /// Chunk compression other than identity or LZ4.
    #[error("Unsupported compression '{0}'")]
    UnsupportedCompression(String),

    /// Decompressor rejected the chunk payload.
    #[error("{compression} decompression failed: {message}")]
    Decompression {
        /// Compression name from the chunk
        compression: String,
        /// Decompressor error message
        message: String,
    },

    /// Decompressed payload length differs from the declared size.
    #[error("Decompressed chunk is {actual} bytes, expected {expected}")]
    DecompressedSizeMismatch {
        /// Declared decompressed size
        expected: u64,
        /// Actual decompressed size
        actual: u64,
    },

    /// CRC32 of the decompressed chunk payload differs from the declared one.
    #[error("Chunk CRC mismatch: expected {expected:#010x}, computed {actual:#010x}")]
    CrcMismatch {
        /// Declared CRC
        expected: u32,
        /// Computed CRC
        actual: u32,
    },

    /// A record inside a chunk extends past the chunk's end.
    #[error("Not enough data in chunk: record at offset {offset} overruns chunk of {len} bytes")]
    TruncatedChunk {
        /// Offset of the partial record within the chunk
        offset: usize,
        /// Decompressed chunk length
        len: usize,
    },

    /// Record kind that must not appear inside a chunk.
    #[error("{0} record not allowed inside a chunk")]
    RecordNotAllowedInChunk(RecordKind),

    /// Declared record length exceeds the configured limit.
    #[error("Record length {length} exceeds limit {limit}")]
    RecordTooLarge {
        /// Declared record length
        length: usize,
        /// Configured limit
        limit: usize,
    },

    /// Declared decompressed chunk size is larger than allowed.
    #[error("Chunk decompressed size {size} exceeds limit {limit}")]
    ChunkTooLarge {
        /// Declared decompressed size
        size: u64,
        /// Largest size accepted for this chunk
        limit: u64,
    },

    /// Footer seen where it is not allowed.
    #[error("Unexpected footer record")]
    UnexpectedFooter,

    /// Stream ended without a footer record.
    #[error("Missing footer")]
    MissingFooter,

    /// Stream ended between the footer and the trailing magic.
    #[error("Missing trailing magic after footer record")]
    MissingTrailingMagic,

    /// Unconsumed bytes remain after the trailing magic.
    #[error("{0} bytes remaining after parsing")]
    TrailingBytes(usize),

    /// More data was fed after the trailing magic.
    #[error("Already read footer")]
    DataAfterEnd,

    /// A channel id was declared twice with different contents.
    #[error("Differing channel infos for channel {id}")]
    ChannelRedefined {
        /// Channel id
        id: u32,
    },

    /// A message references a channel that was never declared.
    #[error("Message for channel {channel_id} with no prior channel info")]
    UnknownChannel {
        /// Channel id from the message
        channel_id: u32,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// I/O error from the byte source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl McapError {
    /// Create an invalid magic error from the expected and found bytes.
    pub fn invalid_magic(expected: &[u8], found: &[u8]) -> Self {
        McapError::InvalidMagic {
            expected: hex_bytes(expected),
            found: hex_bytes(found),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        McapError::Config(message.into())
    }

    /// Create a decompression error.
    pub fn decompression(compression: impl Into<String>, message: impl ToString) -> Self {
        McapError::Decompression {
            compression: compression.into(),
            message: message.to_string(),
        }
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            McapError::InvalidMagic { expected, found } => {
                vec![("expected", expected.clone()), ("found", found.clone())]
            }
            McapError::UnsupportedVersion(version) => vec![("version", version.to_string())],
            McapError::InvalidRecordType(tag) => vec![("tag", tag.to_string())],
            McapError::Truncated {
                kind,
                field,
                needed,
                offset,
                end,
            } => vec![
                ("kind", kind.to_string()),
                ("field", field.to_string()),
                ("needed", needed.to_string()),
                ("offset", offset.to_string()),
                ("end", end.to_string()),
            ],
            McapError::NotImplemented(kind) | McapError::RecordNotAllowedInChunk(kind) => {
                vec![("kind", kind.to_string())]
            }
            McapError::UnsupportedCompression(compression) => {
                vec![("compression", compression.clone())]
            }
            McapError::Decompression {
                compression,
                message,
            } => vec![
                ("compression", compression.clone()),
                ("message", message.clone()),
            ],
            McapError::DecompressedSizeMismatch { expected, actual } => vec![
                ("expected", expected.to_string()),
                ("actual", actual.to_string()),
            ],
            McapError::CrcMismatch { expected, actual } => vec![
                ("expected", format!("{expected:#010x}")),
                ("actual", format!("{actual:#010x}")),
            ],
            McapError::TruncatedChunk { offset, len } => {
                vec![("offset", offset.to_string()), ("len", len.to_string())]
            }
            McapError::RecordTooLarge { length, limit } => vec![
                ("length", length.to_string()),
                ("limit", limit.to_string()),
            ],
            McapError::ChunkTooLarge { size, limit } => {
                vec![("size", size.to_string()), ("limit", limit.to_string())]
            }
            McapError::TrailingBytes(count) => vec![("remaining", count.to_string())],
            McapError::ChannelRedefined { id } => vec![("channel", id.to_string())],
            McapError::UnknownChannel { channel_id } => {
                vec![("channel", channel_id.to_string())]
            }
            McapError::Config(message) => vec![("message", message.clone())],
            McapError::Io(err) => vec![("message", err.to_string())],
            McapError::UnexpectedFooter
            | McapError::MissingFooter
            | McapError::MissingTrailingMagic
            | McapError::DataAfterEnd => Vec::new(),
        }
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Result type for robostream operations.
pub type Result<T> = std::result::Result<T, McapError>;
