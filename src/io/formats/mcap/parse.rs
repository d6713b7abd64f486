// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Stateless record codec.
//!
//! [`parse_record`] decodes exactly one record at an offset of a byte slice
//! and reports how many bytes it occupied. It never mutates its input, so a
//! caller that gets `Ok(None)` (not enough bytes yet) can retry from the same
//! offset once more bytes have arrived.
//!
//! # Record Layout
//!
//! ```text
//! tag:u8 | length:u32 | body[length]      (every record but the footer)
//! tag:u8 | index_pos:u64 | index_crc:u32  (footer, fixed 12-byte body)
//! ```
//!
//! Integers are little-endian; strings and byte fields are prefixed with a
//! `u32` byte count.

use std::borrow::Cow;

use byteorder::{ByteOrder, LittleEndian};

use super::constants::{
    FOOTER_BODY_LEN, FORMAT_VERSION, LENGTH_LEN, MAGIC_MARKER_LEN, MCAP_MAGIC, TAG_LEN,
};
use super::records::{
    ChannelInfo, Chunk, DecodedRecord, Footer, Magic, Message, Record, RecordKind,
};
use crate::{McapError, Result};

/// Validate the magic marker (magic bytes + version) at `start_offset`.
///
/// Returns `Ok(None)` if fewer than [`MAGIC_MARKER_LEN`] bytes are available.
pub fn verify_magic(buf: &[u8], start_offset: usize) -> Result<Option<Magic>> {
    let Some(marker) = buf.get(start_offset..start_offset + MAGIC_MARKER_LEN) else {
        return Ok(None);
    };

    let (magic, version) = marker.split_at(MCAP_MAGIC.len());
    if magic != MCAP_MAGIC {
        return Err(McapError::invalid_magic(&MCAP_MAGIC, magic));
    }

    let format_version = version[0];
    if format_version != FORMAT_VERSION {
        return Err(McapError::UnsupportedVersion(format_version));
    }

    Ok(Some(Magic { format_version }))
}

/// Compute how many bytes the record at `start_offset` occupies.
///
/// Validates the tag and, for length-prefixed records, that the whole body is
/// buffered. Does not decode any fields.
pub fn record_extent(buf: &[u8], start_offset: usize) -> Result<Option<usize>> {
    Ok(record_header(buf, start_offset)?.map(|(_, used_bytes)| used_bytes))
}

/// Read the tag and (if present) the length prefix at `start_offset`.
///
/// Returns the record kind and the total number of bytes the record occupies,
/// or `None` until the whole record is buffered.
pub(crate) fn record_header(buf: &[u8], start_offset: usize) -> Result<Option<(RecordKind, usize)>> {
    let Some(&tag) = buf.get(start_offset) else {
        return Ok(None);
    };
    let kind = RecordKind::from_tag(tag).ok_or(McapError::InvalidRecordType(tag))?;
    let available = buf.len() - start_offset;

    // Footer doesn't carry a length because it's always the same size.
    if kind == RecordKind::Footer {
        let used_bytes = TAG_LEN + FOOTER_BODY_LEN;
        return Ok((available >= used_bytes).then_some((kind, used_bytes)));
    }

    if available < TAG_LEN + LENGTH_LEN {
        return Ok(None);
    }
    let length_offset = start_offset + TAG_LEN;
    let record_len = LittleEndian::read_u32(&buf[length_offset..length_offset + LENGTH_LEN]);
    let used_bytes = match (TAG_LEN + LENGTH_LEN).checked_add(record_len as usize) {
        Some(used_bytes) => used_bytes,
        None => return Ok(None),
    };

    Ok((available >= used_bytes).then_some((kind, used_bytes)))
}

/// Declared body length of the record at `start_offset`, once its tag and
/// length prefix are buffered. The footer reports its fixed body length.
pub(crate) fn declared_length(buf: &[u8], start_offset: usize) -> Result<Option<usize>> {
    let Some(&tag) = buf.get(start_offset) else {
        return Ok(None);
    };
    let kind = RecordKind::from_tag(tag).ok_or(McapError::InvalidRecordType(tag))?;
    if kind == RecordKind::Footer {
        return Ok(Some(FOOTER_BODY_LEN));
    }
    let length_offset = start_offset + TAG_LEN;
    Ok(buf
        .get(length_offset..length_offset + LENGTH_LEN)
        .map(|bytes| LittleEndian::read_u32(bytes) as usize))
}

/// Parse an MCAP record beginning at `start_offset` in `buf`.
///
/// Returns `Ok(None)` when `buf` does not yet hold the complete record. A tag
/// outside the known range is an error, so a corrupt stream is never mistaken
/// for a truncated one.
pub fn parse_record(buf: &[u8], start_offset: usize) -> Result<Option<DecodedRecord<'_>>> {
    let Some((kind, used_bytes)) = record_header(buf, start_offset)? else {
        return Ok(None);
    };
    let record = decode_record(buf, start_offset, kind, used_bytes)?;
    Ok(Some(DecodedRecord { record, used_bytes }))
}

/// Decode the fields of a record whose header was already validated by
/// [`record_header`]; `buf[start_offset..start_offset + used_bytes]` must be
/// the complete record.
pub(crate) fn decode_record(
    buf: &[u8],
    start_offset: usize,
    kind: RecordKind,
    used_bytes: usize,
) -> Result<Record<'_>> {
    let body_start = start_offset + TAG_LEN + LENGTH_LEN;
    let record_end = start_offset + used_bytes;
    let record = match kind {
        RecordKind::Footer => {
            let footer = start_offset + TAG_LEN;
            Record::Footer(Footer {
                index_pos: LittleEndian::read_u64(&buf[footer..footer + 8]),
                index_crc: LittleEndian::read_u32(&buf[footer + 8..footer + 12]),
            })
        }
        RecordKind::ChannelInfo => {
            let mut fields = FieldReader::new(buf, kind, body_start, record_end);
            Record::ChannelInfo(ChannelInfo {
                id: fields.u32("id")?,
                topic: fields.string("topic")?,
                serialization_format: fields.string("serialization_format")?,
                schema_format: fields.string("schema_format")?,
                schema: Cow::Borrowed(fields.bytes("schema")?),
                data: Cow::Borrowed(fields.rest()),
            })
        }
        RecordKind::Message => {
            let mut fields = FieldReader::new(buf, kind, body_start, record_end);
            Record::Message(Message {
                channel_id: fields.u32("channel_id")?,
                timestamp: fields.u64("timestamp")?,
                data: Cow::Borrowed(fields.rest()),
            })
        }
        RecordKind::Chunk => {
            let mut fields = FieldReader::new(buf, kind, body_start, record_end);
            let decompressed_size = fields.u64("decompressed_size")?;
            let decompressed_crc = fields.u32("decompressed_crc")?;
            Record::Chunk(Chunk {
                compression: fields.string("compression")?,
                decompressed_size,
                decompressed_crc,
                data: Cow::Borrowed(fields.rest()),
            })
        }
        RecordKind::IndexData | RecordKind::ChunkInfo => {
            return Err(McapError::NotImplemented(kind));
        }
    };

    Ok(record)
}

/// Sequential little-endian field reader bounded by a record's end.
struct FieldReader<'a> {
    buf: &'a [u8],
    kind: RecordKind,
    pos: usize,
    end: usize,
}

impl<'a> FieldReader<'a> {
    fn new(buf: &'a [u8], kind: RecordKind, pos: usize, end: usize) -> Self {
        Self {
            buf,
            kind,
            pos,
            end,
        }
    }

    fn take(&mut self, field: &'static str, len: usize) -> Result<&'a [u8]> {
        match self.pos.checked_add(len) {
            Some(next) if next <= self.end => {
                let bytes = &self.buf[self.pos..next];
                self.pos = next;
                Ok(bytes)
            }
            _ => Err(McapError::Truncated {
                kind: self.kind,
                field,
                needed: len,
                offset: self.pos,
                end: self.end,
            }),
        }
    }

    fn u32(&mut self, field: &'static str) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(field, 4)?))
    }

    fn u64(&mut self, field: &'static str) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(field, 8)?))
    }

    /// A `u32` length-prefixed byte field.
    fn bytes(&mut self, field: &'static str) -> Result<&'a [u8]> {
        let len = self.u32(field)? as usize;
        self.take(field, len)
    }

    /// A `u32` length-prefixed UTF-8 string; invalid sequences are replaced.
    fn string(&mut self, field: &'static str) -> Result<Cow<'a, str>> {
        Ok(String::from_utf8_lossy(self.bytes(field)?))
    }

    /// Everything left up to the record boundary.
    fn rest(&mut self) -> &'a [u8] {
        let bytes = &self.buf[self.pos..self.end];
        self.pos = self.end;
        bytes
    }
}
