// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Chunk expansion.
//!
//! A chunk's payload is itself a record stream. Expanding a chunk means
//! decompressing the payload (if needed), optionally checking its CRC32, and
//! running the record codec over it until the payload is exhausted.
//!
//! Only channel info and message records may appear inside a chunk.

use std::borrow::Cow;

use tracing::{debug, warn};

use super::constants::{
    COMPRESSION_LZ4, COMPRESSION_NONE, LZ4_EXPANSION_SLACK, LZ4_MAX_EXPANSION,
};
use super::options::ChunkOptions;
use super::parse::parse_record;
use super::records::{Chunk, Record, RecordKind};
use crate::{McapError, Result};

/// Decompress a chunk's payload.
///
/// Uncompressed chunks are returned borrowed. LZ4 chunks are decompressed to
/// exactly `decompressed_size` bytes. The compression name is checked before
/// the payload is looked at.
///
/// # Errors
///
/// Fails on an unsupported compression, a corrupt LZ4 payload, a size
/// mismatch, or (with CRC validation enabled) a CRC mismatch. A declared size
/// above `max_decompressed_size`, or more than an LZ4 block can expand to, is
/// `ChunkTooLarge`.
pub fn decompress_chunk<'c>(
    chunk: &'c Chunk<'_>,
    options: &ChunkOptions,
) -> Result<Cow<'c, [u8]>> {
    let data: Cow<'c, [u8]> = match &*chunk.compression {
        COMPRESSION_NONE => {
            check_size(chunk.data.len() as u64, options.max_decompressed_size)?;
            Cow::Borrowed(&chunk.data[..])
        }
        COMPRESSION_LZ4 => {
            let expected = lz4_output_size(chunk, options)?;
            let decompressed = lz4_flex::block::decompress(&chunk.data, expected)
                .map_err(|e| McapError::decompression(COMPRESSION_LZ4, e))?;
            if decompressed.len() != expected {
                return Err(McapError::DecompressedSizeMismatch {
                    expected: chunk.decompressed_size,
                    actual: decompressed.len() as u64,
                });
            }
            Cow::Owned(decompressed)
        }
        other => return Err(McapError::UnsupportedCompression(other.to_string())),
    };

    if options.validate_crcs {
        if chunk.decompressed_crc == 0 {
            warn!(
                context = "ChunkExpansion",
                "Chunk declares no CRC, skipping validation"
            );
        } else {
            let actual = crc32fast::hash(&data);
            if actual != chunk.decompressed_crc {
                return Err(McapError::CrcMismatch {
                    expected: chunk.decompressed_crc,
                    actual,
                });
            }
        }
    }

    Ok(data)
}

fn check_size(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(McapError::ChunkTooLarge { size, limit });
    }
    Ok(())
}

/// The output buffer size for an LZ4 chunk, checked before anything is
/// allocated. No LZ4 block expands past `LZ4_MAX_EXPANSION` times its input.
fn lz4_output_size(chunk: &Chunk<'_>, options: &ChunkOptions) -> Result<usize> {
    let size = chunk.decompressed_size;
    check_size(size, options.max_decompressed_size)?;
    let bound = (chunk.data.len() as u64)
        .saturating_mul(LZ4_MAX_EXPANSION)
        .saturating_add(LZ4_EXPANSION_SLACK);
    check_size(size, bound)?;
    usize::try_from(size).map_err(|_| {
        McapError::decompression(
            COMPRESSION_LZ4,
            format!("decompressed size {size} does not fit in memory"),
        )
    })
}

/// A chunk with its payload decompressed.
#[derive(Debug)]
pub struct ExpandedChunk<'c> {
    data: Cow<'c, [u8]>,
}

impl<'c> ExpandedChunk<'c> {
    /// Decompress `chunk` and prepare it for iteration.
    pub fn new(chunk: &'c Chunk<'_>, options: &ChunkOptions) -> Result<Self> {
        let data = decompress_chunk(chunk, options)?;
        debug!(
            context = "ChunkExpansion",
            compression = %chunk.compression,
            compressed = chunk.data.len(),
            decompressed = data.len(),
            "Expanded chunk"
        );
        Ok(Self { data })
    }

    /// The decompressed record stream.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Iterate the records nested in the chunk.
    pub fn records(&self) -> ChunkRecords<'_> {
        ChunkRecords::new(&self.data)
    }
}

/// Iterator over the records of a decompressed chunk payload.
///
/// Yields at most one error, after which it is exhausted.
#[derive(Debug, Clone)]
pub struct ChunkRecords<'a> {
    data: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> ChunkRecords<'a> {
    /// Iterate the records in `data`, a decompressed chunk payload.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            failed: false,
        }
    }

    /// Byte offset of the next record within the payload.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn next_record(&mut self) -> Result<Record<'a>> {
        let tag = self.data[self.offset];
        if let Some(kind) = RecordKind::from_tag(tag) {
            if !kind.allowed_in_chunk() {
                return Err(McapError::RecordNotAllowedInChunk(kind));
            }
        }

        let decoded =
            parse_record(self.data, self.offset)?.ok_or(McapError::TruncatedChunk {
                offset: self.offset,
                len: self.data.len(),
            })?;
        self.offset += decoded.used_bytes;
        Ok(decoded.record)
    }
}

impl<'a> Iterator for ChunkRecords<'a> {
    type Item = Result<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.data.len() {
            return None;
        }
        let result = self.next_record();
        self.failed = result.is_err();
        Some(result)
    }
}
