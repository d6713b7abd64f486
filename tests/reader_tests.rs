// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Incremental reader integration tests.
//!
//! These tests feed encoded streams to `McapReader` in various fragmentations
//! and check the decoded records.

mod common;

use common::*;
use robostream::io::formats::mcap::constants::{OP_CHUNK_INFO, OP_FOOTER, OP_INDEX_DATA};
use robostream::{
    ChunkOptions, ExpandedChunk, McapError, McapReader, Record, RecordKind, Result,
};

/// Read magic, then every record up to and including the footer, then the
/// trailing magic. Returns owned records.
fn read_all(reader: &mut McapReader) -> Vec<Record<'static>> {
    assert!(reader.read_magic().unwrap().is_some());
    let mut records = Vec::new();
    loop {
        let record = reader
            .read_record()
            .unwrap()
            .expect("record should be fully buffered")
            .into_owned();
        let is_footer = matches!(record, Record::Footer(_));
        records.push(record);
        if is_footer {
            break;
        }
    }
    assert!(reader.read_magic().unwrap().is_some());
    assert!(reader.at_end());
    records
}

/// Feed `bytes` one at a time, pulling whatever becomes available.
fn read_byte_at_a_time(bytes: &[u8]) -> Vec<Record<'static>> {
    let mut reader = McapReader::new();
    let mut records = Vec::new();
    let mut read_leading_magic = false;
    let mut read_footer = false;
    let mut read_trailing_magic = false;

    for byte in bytes {
        reader.append(std::slice::from_ref(byte));
        loop {
            if !read_leading_magic {
                if reader.read_magic().unwrap().is_none() {
                    break;
                }
                read_leading_magic = true;
            } else if read_footer {
                if !read_trailing_magic && reader.read_magic().unwrap().is_some() {
                    read_trailing_magic = true;
                }
                break;
            } else {
                let Some(record) = reader.read_record().unwrap() else {
                    break;
                };
                read_footer = matches!(record, Record::Footer(_));
                records.push(record.into_owned());
            }
        }
    }

    assert!(read_trailing_magic);
    assert!(reader.at_end());
    records
}

// ============================================================================
// Magic
// ============================================================================

#[test]
fn test_magic_all_fragmentations() {
    let marker = magic();
    assert_eq!(marker.len(), 9);

    // Bit i of `splits` set means a fragment boundary before byte i.
    for splits in 0u32..(1 << marker.len()) {
        let mut reader = McapReader::new();
        let mut next_start = 0;
        for split in 1..marker.len() {
            if splits & (1 << split) == 0 {
                continue;
            }
            reader.append(&marker[next_start..split]);
            assert!(
                reader.read_magic().unwrap().is_none(),
                "split mask {splits:#b}"
            );
            next_start = split;
        }
        reader.append(&marker[next_start..]);
        let magic = reader.read_magic().unwrap().expect("complete marker");
        assert_eq!(magic.format_version, 1);
        assert!(reader.at_end());
    }
}

#[test]
fn test_rejects_invalid_magic() {
    for i in 0..8 {
        let mut bad = magic();
        bad[i] = 0x00;
        let mut reader = McapReader::new();
        reader.append(&bad);
        let err = reader.read_magic().unwrap_err();
        assert!(
            err.to_string().contains("Expected MCAP magic"),
            "unexpected error: {err}"
        );
    }
}

// ============================================================================
// End-to-end Scenarios
// ============================================================================

#[test]
fn test_empty_file() {
    let mut bytes = magic();
    bytes.extend(footer(0x0123456789abcdef, 0x01234567));
    bytes.extend(magic());

    let mut reader = McapReader::new();
    reader.append(&bytes);
    assert_eq!(reader.read_magic().unwrap().map(|m| m.format_version), Some(1));
    let Some(Record::Footer(footer)) = reader.read_record().unwrap() else {
        panic!("expected footer");
    };
    assert_eq!(footer.index_pos, 0x0123456789abcdef);
    assert_eq!(footer.index_crc, 0x01234567);
    assert!(reader.read_magic().unwrap().is_some());
    assert!(reader.at_end());
}

#[test]
fn test_empty_chunk() {
    let bytes = stream(&[chunk("", 0, 0, &[])]);
    let mut reader = McapReader::new();
    reader.append(&bytes);

    let records = read_all(&mut reader);
    assert_eq!(records.len(), 2);
    let Record::Chunk(chunk) = &records[0] else {
        panic!("expected chunk, got {:?}", records[0]);
    };
    assert_eq!(chunk.compression, "");
    assert_eq!(chunk.decompressed_size, 0);
    assert!(chunk.data.is_empty());

    let expanded = ExpandedChunk::new(chunk, &ChunkOptions::default()).unwrap();
    assert_eq!(expanded.records().count(), 0);
}

#[test]
fn test_channel_info_at_top_level() {
    let bytes = stream(&[sample_channel_info()]);
    let mut reader = McapReader::new();
    reader.append(&bytes);

    let records = read_all(&mut reader);
    let Record::ChannelInfo(info) = &records[0] else {
        panic!("expected channel info, got {:?}", records[0]);
    };
    assert_eq!(info.id, 1);
    assert_eq!(info.topic, "mytopic");
    assert_eq!(info.serialization_format, "utf12");
    assert_eq!(info.schema_format, "none");
    assert!(info.schema.is_empty());
    assert_eq!(&info.data[..], &[1, 2, 3]);
}

#[test]
fn test_channel_info_in_chunk_matches_top_level() {
    let top_level = {
        let mut reader = McapReader::new();
        reader.append(&stream(&[sample_channel_info()]));
        read_all(&mut reader).remove(0)
    };

    for chunk_record in [plain_chunk(&sample_channel_info()), lz4_chunk(&sample_channel_info())] {
        let mut reader = McapReader::new();
        reader.append(&stream(&[chunk_record]));
        let records = read_all(&mut reader);
        let Record::Chunk(chunk) = &records[0] else {
            panic!("expected chunk");
        };
        let expanded = ExpandedChunk::new(chunk, &ChunkOptions::default().with_validate_crcs(true))
            .unwrap();
        let nested: Vec<_> = expanded.records().collect::<Result<_>>().unwrap();
        assert_eq!(nested, vec![top_level.clone()]);
    }
}

// ============================================================================
// Fragmentation and Consumption
// ============================================================================

#[test]
fn test_byte_at_a_time_matches_single_append() {
    let mut payload = sample_channel_info();
    payload.extend(message(1, 42, b"nested"));
    let bytes = stream(&[
        sample_channel_info(),
        message(1, 7, b"hello"),
        lz4_chunk(&payload),
        chunk("", 0, 0, &[]),
        message(1, 8, &[]),
    ]);

    let mut reader = McapReader::new();
    reader.append(&bytes);
    let expected = read_all(&mut reader);
    assert_eq!(expected.len(), 6);

    assert_eq!(read_byte_at_a_time(&bytes), expected);
}

#[test]
fn test_exact_consumption() {
    let records = [
        sample_channel_info(),
        message(1, 1, b"abc"),
        plain_chunk(&message(1, 2, b"x")),
        footer(5, 6),
    ];
    let mut reader = McapReader::new();
    for r in &records {
        reader.append(r);
    }

    let mut remaining: usize = records.iter().map(Vec::len).sum();
    for r in &records {
        assert_eq!(reader.bytes_remaining(), remaining);
        assert!(reader.read_record().unwrap().is_some());
        remaining -= r.len();
    }
    assert!(reader.at_end());
}

#[test]
fn test_need_more_bytes_is_idempotent() {
    let record = sample_channel_info();
    // Tag only, tag + partial length, tag + length + partial body.
    for cut in [1, 3, 5, record.len() - 1] {
        let mut reader = McapReader::new();
        reader.append(&record[..cut]);
        for _ in 0..5 {
            assert!(reader.read_record().unwrap().is_none());
            assert_eq!(reader.bytes_remaining(), cut);
        }
    }

    // A footer with a short body.
    let mut reader = McapReader::new();
    reader.append(&footer(1, 2)[..12]);
    assert!(reader.read_record().unwrap().is_none());
    assert!(reader.read_record().unwrap().is_none());
    assert_eq!(reader.bytes_remaining(), 12);
}

#[test]
fn test_empty_reader_needs_more() {
    let mut reader = McapReader::new();
    assert!(reader.at_end());
    assert!(reader.read_magic().unwrap().is_none());
    assert!(reader.read_record().unwrap().is_none());
}

// ============================================================================
// Fatal Paths
// ============================================================================

#[test]
fn test_invalid_record_types() {
    for tag in [0x00u8, OP_FOOTER + 1, 0x7f, 0xff] {
        let mut reader = McapReader::new();
        reader.append(&[tag]);
        assert!(
            matches!(reader.read_record(), Err(McapError::InvalidRecordType(t)) if t == tag),
            "tag {tag:#04x}"
        );
    }
}

#[test]
fn test_index_records_not_implemented() {
    for (tag, kind) in [
        (OP_INDEX_DATA, RecordKind::IndexData),
        (OP_CHUNK_INFO, RecordKind::ChunkInfo),
    ] {
        let bytes = record(tag, &[0; 4]);
        let mut reader = McapReader::new();
        reader.append(&bytes);
        assert!(matches!(
            reader.read_record(),
            Err(McapError::NotImplemented(k)) if k == kind
        ));
        assert_eq!(reader.bytes_remaining(), bytes.len());
    }
}

#[test]
fn test_overrunning_field_is_fatal() {
    // Topic length claims 100 bytes but the record body ends first.
    let mut body = u32_le(1);
    body.extend(u32_le(100));
    body.extend(b"short");
    let bytes = record(1, &body);
    let mut reader = McapReader::new();
    reader.append(&bytes);
    reader.append(&message(1, 0, b"next"));
    let remaining = reader.bytes_remaining();
    assert!(matches!(
        reader.read_record(),
        Err(McapError::Truncated {
            kind: RecordKind::ChannelInfo,
            ..
        })
    ));
    assert_eq!(reader.bytes_remaining(), remaining);
}

#[test]
fn test_unsupported_compression() {
    let mut reader = McapReader::new();
    reader.append(&chunk("zstd", 3, 0, &[1, 2, 3]));
    let Some(Record::Chunk(chunk)) = reader.read_record().unwrap() else {
        panic!("expected chunk");
    };
    assert!(matches!(
        ExpandedChunk::new(&chunk, &ChunkOptions::default()),
        Err(McapError::UnsupportedCompression(c)) if c == "zstd"
    ));
}
