// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decoded MCAP record types.
//!
//! Variable-length fields borrow from the buffer the record was decoded from
//! (`Cow::Borrowed`). A record borrowed from an [`McapReader`] is valid until
//! the next call that mutates the reader; use [`Record::into_owned`] to keep
//! it longer.
//!
//! [`McapReader`]: super::reader::McapReader

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

use super::constants::{
    OP_CHANNEL_INFO, OP_CHUNK, OP_CHUNK_INFO, OP_FOOTER, OP_INDEX_DATA, OP_MESSAGE,
};

/// Result of validating a magic marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Magic {
    /// Format version byte following the magic bytes
    pub format_version: u8,
}

/// Kind of a record, one per record tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RecordKind {
    ChannelInfo,
    Message,
    Chunk,
    IndexData,
    ChunkInfo,
    Footer,
}

impl RecordKind {
    /// Map a record tag to its kind, `None` if the tag is out of range.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            OP_CHANNEL_INFO => Some(RecordKind::ChannelInfo),
            OP_MESSAGE => Some(RecordKind::Message),
            OP_CHUNK => Some(RecordKind::Chunk),
            OP_INDEX_DATA => Some(RecordKind::IndexData),
            OP_CHUNK_INFO => Some(RecordKind::ChunkInfo),
            OP_FOOTER => Some(RecordKind::Footer),
            _ => None,
        }
    }

    /// The wire tag for this kind.
    pub fn tag(&self) -> u8 {
        match self {
            RecordKind::ChannelInfo => OP_CHANNEL_INFO,
            RecordKind::Message => OP_MESSAGE,
            RecordKind::Chunk => OP_CHUNK,
            RecordKind::IndexData => OP_INDEX_DATA,
            RecordKind::ChunkInfo => OP_CHUNK_INFO,
            RecordKind::Footer => OP_FOOTER,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::ChannelInfo => "ChannelInfo",
            RecordKind::Message => "Message",
            RecordKind::Chunk => "Chunk",
            RecordKind::IndexData => "IndexData",
            RecordKind::ChunkInfo => "ChunkInfo",
            RecordKind::Footer => "Footer",
        }
    }

    /// Whether this kind may appear inside a chunk.
    pub fn allowed_in_chunk(&self) -> bool {
        matches!(self, RecordKind::ChannelInfo | RecordKind::Message)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Channel declaration: topic, formats and schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo<'a> {
    pub id: u32,
    pub topic: Cow<'a, str>,
    pub serialization_format: Cow<'a, str>,
    pub schema_format: Cow<'a, str>,
    pub schema: Cow<'a, [u8]>,
    /// Opaque channel data (the rest of the record after the schema)
    pub data: Cow<'a, [u8]>,
}

impl ChannelInfo<'_> {
    pub fn into_owned(self) -> ChannelInfo<'static> {
        ChannelInfo {
            id: self.id,
            topic: Cow::Owned(self.topic.into_owned()),
            serialization_format: Cow::Owned(self.serialization_format.into_owned()),
            schema_format: Cow::Owned(self.schema_format.into_owned()),
            schema: Cow::Owned(self.schema.into_owned()),
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}

/// A message payload on a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message<'a> {
    pub channel_id: u32,
    /// Nanoseconds
    pub timestamp: u64,
    pub data: Cow<'a, [u8]>,
}

impl Message<'_> {
    pub fn into_owned(self) -> Message<'static> {
        Message {
            channel_id: self.channel_id,
            timestamp: self.timestamp,
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}

/// A sub-stream of nested records, possibly compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// `""` for uncompressed data, `"lz4"` for LZ4 blocks
    pub compression: Cow<'a, str>,
    pub decompressed_size: u64,
    /// CRC32 of the decompressed data, 0 if not computed
    pub decompressed_crc: u32,
    pub data: Cow<'a, [u8]>,
}

impl Chunk<'_> {
    pub fn into_owned(self) -> Chunk<'static> {
        Chunk {
            compression: Cow::Owned(self.compression.into_owned()),
            decompressed_size: self.decompressed_size,
            decompressed_crc: self.decompressed_crc,
            data: Cow::Owned(self.data.into_owned()),
        }
    }
}

/// Terminal record of the top-level sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub index_pos: u64,
    pub index_crc: u32,
}

/// A decoded MCAP record.
///
/// `IndexData` and `ChunkInfo` are never produced by the decoder (decoding
/// them fails with [`McapError::NotImplemented`]); they exist so callers can
/// match on every record kind.
///
/// [`McapError::NotImplemented`]: crate::McapError::NotImplemented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<'a> {
    ChannelInfo(ChannelInfo<'a>),
    Message(Message<'a>),
    Chunk(Chunk<'a>),
    IndexData,
    ChunkInfo,
    Footer(Footer),
}

impl<'a> Record<'a> {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::ChannelInfo(_) => RecordKind::ChannelInfo,
            Record::Message(_) => RecordKind::Message,
            Record::Chunk(_) => RecordKind::Chunk,
            Record::IndexData => RecordKind::IndexData,
            Record::ChunkInfo => RecordKind::ChunkInfo,
            Record::Footer(_) => RecordKind::Footer,
        }
    }

    /// Detach the record from the buffer it was decoded from.
    pub fn into_owned(self) -> Record<'static> {
        match self {
            Record::ChannelInfo(info) => Record::ChannelInfo(info.into_owned()),
            Record::Message(message) => Record::Message(message.into_owned()),
            Record::Chunk(chunk) => Record::Chunk(chunk.into_owned()),
            Record::IndexData => Record::IndexData,
            Record::ChunkInfo => Record::ChunkInfo,
            Record::Footer(footer) => Record::Footer(footer),
        }
    }
}

/// A record plus the number of bytes it occupied in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord<'a> {
    pub record: Record<'a>,
    pub used_bytes: usize,
}
