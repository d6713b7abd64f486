// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use robostream::io::formats::mcap::constants::{
    MCAP_MAGIC, OP_CHANNEL_INFO, OP_CHUNK, OP_FOOTER, OP_MESSAGE,
};

// ============================================================================
// Primitive Encoders
// ============================================================================

pub fn u32_le(value: u32) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

pub fn u64_le(value: u64) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

/// Length-prefixed string.
pub fn string(s: &str) -> Vec<u8> {
    bytes(s.as_bytes())
}

/// Length-prefixed byte array.
pub fn bytes(data: &[u8]) -> Vec<u8> {
    let mut out = u32_le(data.len() as u32);
    out.extend_from_slice(data);
    out
}

// ============================================================================
// Record Encoders
// ============================================================================

/// Magic bytes followed by the format version.
pub fn magic() -> Vec<u8> {
    let mut out = MCAP_MAGIC.to_vec();
    out.push(1);
    out
}

/// Tag, length prefix and body.
pub fn record(tag: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(u32_le(body.len() as u32));
    out.extend_from_slice(body);
    out
}

pub fn channel_info(
    id: u32,
    topic: &str,
    serialization_format: &str,
    schema_format: &str,
    schema: &[u8],
    data: &[u8],
) -> Vec<u8> {
    let mut body = u32_le(id);
    body.extend(string(topic));
    body.extend(string(serialization_format));
    body.extend(string(schema_format));
    body.extend(bytes(schema));
    body.extend_from_slice(data);
    record(OP_CHANNEL_INFO, &body)
}

/// Channel info with the field values used throughout the tests.
pub fn sample_channel_info() -> Vec<u8> {
    channel_info(1, "mytopic", "utf12", "none", &[], &[1, 2, 3])
}

pub fn message(channel_id: u32, timestamp: u64, data: &[u8]) -> Vec<u8> {
    let mut body = u32_le(channel_id);
    body.extend(u64_le(timestamp));
    body.extend_from_slice(data);
    record(OP_MESSAGE, &body)
}

pub fn chunk(compression: &str, decompressed_size: u64, crc: u32, data: &[u8]) -> Vec<u8> {
    let mut body = u64_le(decompressed_size);
    body.extend(u32_le(crc));
    body.extend(string(compression));
    body.extend_from_slice(data);
    record(OP_CHUNK, &body)
}

/// Uncompressed chunk holding `payload`.
pub fn plain_chunk(payload: &[u8]) -> Vec<u8> {
    chunk("", payload.len() as u64, crc32fast::hash(payload), payload)
}

/// LZ4 chunk holding `payload`.
pub fn lz4_chunk(payload: &[u8]) -> Vec<u8> {
    let compressed = lz4_flex::block::compress(payload);
    chunk(
        "lz4",
        payload.len() as u64,
        crc32fast::hash(payload),
        &compressed,
    )
}

pub fn footer(index_pos: u64, index_crc: u32) -> Vec<u8> {
    let mut out = vec![OP_FOOTER];
    out.extend(u64_le(index_pos));
    out.extend(u32_le(index_crc));
    out
}

/// Complete stream: magic, `records`, zero footer, trailing magic.
pub fn stream(records: &[Vec<u8>]) -> Vec<u8> {
    let mut out = magic();
    for r in records {
        out.extend_from_slice(r);
    }
    out.extend(footer(0, 0));
    out.extend(magic());
    out
}
