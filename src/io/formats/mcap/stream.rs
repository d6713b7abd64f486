// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Whole-stream validation on top of [`McapReader`].
//!
//! [`StreamValidator`] is the driving loop for a complete MCAP stream: it
//! reads the leading magic, walks every record (expanding chunks in place),
//! checks channel consistency with a [`ChannelRegistry`], and requires the
//! stream to end with a footer followed by the trailing magic.
//!
//! Bytes may be fed in fragments of any size. The result does not depend on
//! how the stream was split.

use std::collections::{BTreeMap, HashMap};
use std::io::{ErrorKind, Read};

use serde::Serialize;
use tracing::debug;

use super::chunk::ExpandedChunk;
use super::options::{ChunkOptions, StreamOptions};
use super::reader::McapReader;
use super::records::{Footer, Record, RecordKind};
use crate::core::ChannelRegistry;
use crate::{McapError, Result};

/// Where a record was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrigin {
    /// Directly in the stream
    TopLevel,
    /// Inside a chunk
    InChunk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    AwaitingMagic,
    Records,
    AwaitingTrailingMagic,
    Complete,
}

/// Per-channel summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSummary {
    pub id: u32,
    pub topic: String,
    pub serialization_format: String,
    pub schema_format: String,
    pub message_count: u64,
}

/// Summary of a fully validated stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    /// Total bytes fed to the validator
    pub bytes_read: u64,
    /// Format version from the leading magic
    pub format_version: u8,
    /// The stream's footer
    pub footer: Footer,
    /// Top-level records by kind
    pub record_counts: BTreeMap<RecordKind, u64>,
    /// Records found inside chunks by kind
    pub nested_record_counts: BTreeMap<RecordKind, u64>,
    pub chunk_count: u64,
    /// Total decompressed size of all chunks
    pub decompressed_bytes: u64,
    pub message_count: u64,
    /// Earliest message timestamp (nanoseconds)
    pub start_time: Option<u64>,
    /// Latest message timestamp (nanoseconds)
    pub end_time: Option<u64>,
    /// Declared channels, ordered by id
    pub channels: Vec<ChannelSummary>,
}

impl StreamSummary {
    /// Total number of records, top-level and nested.
    pub fn total_records(&self) -> u64 {
        self.record_counts
            .values()
            .chain(self.nested_record_counts.values())
            .sum()
    }
}

/// Bookkeeping accumulated while walking records.
#[derive(Debug, Default)]
struct Tally {
    registry: ChannelRegistry,
    record_counts: BTreeMap<RecordKind, u64>,
    nested_record_counts: BTreeMap<RecordKind, u64>,
    messages_per_channel: HashMap<u32, u64>,
    chunk_count: u64,
    decompressed_bytes: u64,
    message_count: u64,
    start_time: Option<u64>,
    end_time: Option<u64>,
    footer: Option<Footer>,
}

impl Tally {
    fn count(&mut self, kind: RecordKind, origin: RecordOrigin) {
        let counts = match origin {
            RecordOrigin::TopLevel => &mut self.record_counts,
            RecordOrigin::InChunk => &mut self.nested_record_counts,
        };
        *counts.entry(kind).or_default() += 1;
    }

    fn process<F>(
        &mut self,
        record: &Record<'_>,
        origin: RecordOrigin,
        chunk_options: &ChunkOptions,
        visitor: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&Record<'_>, RecordOrigin) -> Result<()>,
    {
        match record {
            Record::ChannelInfo(info) => {
                if self.registry.register(info)? {
                    debug!(
                        context = "StreamValidator",
                        channel_id = info.id,
                        topic = %info.topic,
                        "Registered channel"
                    );
                }
            }
            Record::Message(message) => {
                self.registry.require(message.channel_id)?;
                *self
                    .messages_per_channel
                    .entry(message.channel_id)
                    .or_default() += 1;
                self.message_count += 1;
                self.start_time = Some(
                    self.start_time
                        .map_or(message.timestamp, |t| t.min(message.timestamp)),
                );
                self.end_time = Some(
                    self.end_time
                        .map_or(message.timestamp, |t| t.max(message.timestamp)),
                );
            }
            Record::Chunk(_) => {}
            Record::IndexData | Record::ChunkInfo => {
                return Err(McapError::NotImplemented(record.kind()));
            }
            Record::Footer(footer) => {
                if origin == RecordOrigin::InChunk || self.footer.is_some() {
                    return Err(McapError::UnexpectedFooter);
                }
                self.footer = Some(*footer);
            }
        }

        self.count(record.kind(), origin);
        visitor(record, origin)?;

        if let Record::Chunk(chunk) = record {
            let expanded = ExpandedChunk::new(chunk, chunk_options)?;
            self.chunk_count += 1;
            self.decompressed_bytes += expanded.data().len() as u64;
            for nested in expanded.records() {
                self.process(&nested?, RecordOrigin::InChunk, chunk_options, visitor)?;
            }
        }
        Ok(())
    }

    fn channel_summaries(&self) -> Vec<ChannelSummary> {
        self.registry
            .channels()
            .into_iter()
            .map(|info| ChannelSummary {
                id: info.id,
                topic: info.topic.to_string(),
                serialization_format: info.serialization_format.to_string(),
                schema_format: info.schema_format.to_string(),
                message_count: self
                    .messages_per_channel
                    .get(&info.id)
                    .copied()
                    .unwrap_or(0),
            })
            .collect()
    }
}

/// Incremental validator for a complete MCAP stream.
///
/// # Example
///
/// ```rust
/// use robostream::{StreamOptions, StreamValidator};
///
/// # fn main() -> robostream::Result<()> {
/// let mut stream = vec![0x89, b'M', b'C', b'A', b'P', 0x30, b'\r', b'\n', 1];
/// stream.push(6);
/// stream.extend([0u8; 12]);
/// stream.extend([0x89, b'M', b'C', b'A', b'P', 0x30, b'\r', b'\n', 1]);
///
/// let mut validator = StreamValidator::new(StreamOptions::default());
/// for piece in stream.chunks(5) {
///     validator.feed(piece)?;
/// }
/// let summary = validator.finish()?;
/// assert_eq!(summary.total_records(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StreamValidator {
    reader: McapReader,
    chunk_options: ChunkOptions,
    state: StreamState,
    format_version: Option<u8>,
    bytes_read: u64,
    tally: Tally,
}

impl StreamValidator {
    /// Create a validator.
    pub fn new(options: StreamOptions) -> Self {
        Self {
            reader: McapReader::with_options(options.reader),
            chunk_options: options.chunk,
            state: StreamState::AwaitingMagic,
            format_version: None,
            bytes_read: 0,
            tally: Tally::default(),
        }
    }

    /// Feed the next piece of the stream.
    pub fn feed(&mut self, data: &[u8]) -> Result<()> {
        self.feed_with(data, |_, _| Ok(()))
    }

    /// Feed the next piece of the stream, passing every record that becomes
    /// available to `visitor`.
    ///
    /// Chunk records are passed to the visitor before the records nested in
    /// them. An error returned by the visitor stops validation.
    pub fn feed_with<F>(&mut self, data: &[u8], mut visitor: F) -> Result<()>
    where
        F: FnMut(&Record<'_>, RecordOrigin) -> Result<()>,
    {
        if data.is_empty() {
            return Ok(());
        }
        if self.state == StreamState::Complete {
            return Err(McapError::DataAfterEnd);
        }

        self.reader.append(data);
        self.bytes_read += data.len() as u64;

        loop {
            match self.state {
                StreamState::AwaitingMagic => {
                    let Some(magic) = self.reader.read_magic()? else {
                        return Ok(());
                    };
                    debug!(
                        context = "StreamValidator",
                        format_version = magic.format_version,
                        "Read leading magic"
                    );
                    self.format_version = Some(magic.format_version);
                    self.state = StreamState::Records;
                }
                StreamState::Records => {
                    let Some(record) = self.reader.read_record()? else {
                        return Ok(());
                    };
                    self.tally.process(
                        &record,
                        RecordOrigin::TopLevel,
                        &self.chunk_options,
                        &mut visitor,
                    )?;
                    if let Record::Footer(footer) = record {
                        debug!(
                            context = "StreamValidator",
                            index_pos = footer.index_pos,
                            index_crc = footer.index_crc,
                            "Read footer"
                        );
                        self.state = StreamState::AwaitingTrailingMagic;
                    }
                }
                StreamState::AwaitingTrailingMagic => {
                    if self.reader.read_magic()?.is_none() {
                        return Ok(());
                    }
                    debug!(context = "StreamValidator", "Read trailing magic");
                    self.state = StreamState::Complete;
                }
                StreamState::Complete => return Ok(()),
            }
        }
    }

    /// Total bytes fed so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Whether the footer and trailing magic have been read.
    pub fn is_complete(&self) -> bool {
        self.state == StreamState::Complete
    }

    /// Declared channels so far.
    pub fn registry(&self) -> &ChannelRegistry {
        &self.tally.registry
    }

    /// Finish validation once the whole stream has been fed.
    ///
    /// # Errors
    ///
    /// Fails if the stream ended before the footer or the trailing magic, or
    /// if bytes remain after the trailing magic.
    pub fn finish(self) -> Result<StreamSummary> {
        match self.state {
            StreamState::AwaitingMagic | StreamState::Records => Err(McapError::MissingFooter),
            StreamState::AwaitingTrailingMagic => Err(McapError::MissingTrailingMagic),
            StreamState::Complete => {
                let remaining = self.reader.bytes_remaining();
                if remaining > 0 {
                    return Err(McapError::TrailingBytes(remaining));
                }
                let (Some(format_version), Some(footer)) =
                    (self.format_version, self.tally.footer)
                else {
                    return Err(McapError::MissingFooter);
                };
                Ok(StreamSummary {
                    bytes_read: self.bytes_read,
                    format_version,
                    footer,
                    channels: self.tally.channel_summaries(),
                    record_counts: self.tally.record_counts,
                    nested_record_counts: self.tally.nested_record_counts,
                    chunk_count: self.tally.chunk_count,
                    decompressed_bytes: self.tally.decompressed_bytes,
                    message_count: self.tally.message_count,
                    start_time: self.tally.start_time,
                    end_time: self.tally.end_time,
                })
            }
        }
    }
}

/// Validate a whole stream read from `source`.
///
/// The source is read in `options.read_buffer_size` pieces.
pub fn validate_reader<R: Read>(source: R, options: StreamOptions) -> Result<StreamSummary> {
    validate_reader_with(source, options, |_, _| Ok(()), |_| {})
}

/// Validate a whole stream read from `source`, passing every record to
/// `visitor` and the running byte count to `progress` after each read.
pub fn validate_reader_with<R, F, P>(
    mut source: R,
    options: StreamOptions,
    mut visitor: F,
    mut progress: P,
) -> Result<StreamSummary>
where
    R: Read,
    F: FnMut(&Record<'_>, RecordOrigin) -> Result<()>,
    P: FnMut(u64),
{
    options.validate()?;
    let mut buffer = vec![0u8; options.read_buffer_size];
    let mut validator = StreamValidator::new(options);

    loop {
        let n = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        validator.feed_with(&buffer[..n], &mut visitor)?;
        progress(validator.bytes_read());
    }

    validator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::formats::mcap::constants::{
        MCAP_MAGIC, OP_CHANNEL_INFO, OP_CHUNK, OP_FOOTER, OP_MESSAGE,
    };

    fn magic() -> Vec<u8> {
        let mut out = MCAP_MAGIC.to_vec();
        out.push(1);
        out
    }

    fn record(tag: u8, body: &[u8]) -> Vec<u8> {
        let mut out = vec![tag];
        out.extend((body.len() as u32).to_le_bytes());
        out.extend_from_slice(body);
        out
    }

    fn string(s: &str) -> Vec<u8> {
        let mut out = (s.len() as u32).to_le_bytes().to_vec();
        out.extend(s.as_bytes());
        out
    }

    fn channel_info(id: u32, topic: &str) -> Vec<u8> {
        let mut body = id.to_le_bytes().to_vec();
        body.extend(string(topic));
        body.extend(string("ros1"));
        body.extend(string("ros1msg"));
        body.extend(string(""));
        record(OP_CHANNEL_INFO, &body)
    }

    fn message(channel_id: u32, timestamp: u64) -> Vec<u8> {
        let mut body = channel_id.to_le_bytes().to_vec();
        body.extend(timestamp.to_le_bytes());
        body.extend(b"data");
        record(OP_MESSAGE, &body)
    }

    fn chunk(payload: &[u8]) -> Vec<u8> {
        let mut body = (payload.len() as u64).to_le_bytes().to_vec();
        body.extend(0u32.to_le_bytes());
        body.extend(string(""));
        body.extend_from_slice(payload);
        record(OP_CHUNK, &body)
    }

    fn footer() -> Vec<u8> {
        let mut out = vec![OP_FOOTER];
        out.extend([0u8; 12]);
        out
    }

    fn stream(records: &[Vec<u8>]) -> Vec<u8> {
        let mut out = magic();
        for r in records {
            out.extend_from_slice(r);
        }
        out.extend(footer());
        out.extend(magic());
        out
    }

    fn validate(bytes: &[u8]) -> Result<StreamSummary> {
        let mut validator = StreamValidator::new(StreamOptions::default());
        validator.feed(bytes)?;
        validator.finish()
    }

    #[test]
    fn test_minimal_stream() {
        let summary = validate(&stream(&[])).unwrap();
        assert_eq!(summary.format_version, 1);
        assert_eq!(summary.record_counts.get(&RecordKind::Footer), Some(&1));
        assert_eq!(summary.total_records(), 1);
        assert_eq!(summary.start_time, None);
    }

    #[test]
    fn test_counts_nested_records() {
        let mut payload = channel_info(1, "/a");
        payload.extend(message(1, 30));
        payload.extend(message(1, 10));
        let bytes = stream(&[chunk(&payload), message(1, 20)]);

        let summary = validate(&bytes).unwrap();
        assert_eq!(summary.chunk_count, 1);
        assert_eq!(summary.decompressed_bytes, payload.len() as u64);
        assert_eq!(summary.message_count, 3);
        assert_eq!(summary.record_counts.get(&RecordKind::Message), Some(&1));
        assert_eq!(
            summary.nested_record_counts.get(&RecordKind::Message),
            Some(&2)
        );
        assert_eq!(summary.start_time, Some(10));
        assert_eq!(summary.end_time, Some(30));
        assert_eq!(summary.channels.len(), 1);
        assert_eq!(summary.channels[0].message_count, 3);
    }

    #[test]
    fn test_split_invariance() {
        let bytes = stream(&[channel_info(7, "/t"), message(7, 1), message(7, 2)]);
        let expected = validate(&bytes).unwrap();
        for piece in [1, 2, 3, 8, 13] {
            let mut validator = StreamValidator::new(StreamOptions::default());
            for part in bytes.chunks(piece) {
                validator.feed(part).unwrap();
            }
            assert_eq!(validator.finish().unwrap(), expected);
        }
    }

    #[test]
    fn test_unknown_channel() {
        let err = validate(&stream(&[message(3, 0)])).unwrap_err();
        assert!(matches!(err, McapError::UnknownChannel { channel_id: 3 }));
    }

    #[test]
    fn test_missing_footer_and_trailing_magic() {
        let mut bytes = magic();
        bytes.extend(channel_info(1, "/a"));
        assert!(matches!(validate(&bytes), Err(McapError::MissingFooter)));
        assert!(matches!(validate(&[]), Err(McapError::MissingFooter)));

        bytes.extend(footer());
        assert!(matches!(
            validate(&bytes),
            Err(McapError::MissingTrailingMagic)
        ));

        // A partial trailing magic is still missing.
        bytes.extend(&magic()[..4]);
        assert!(matches!(
            validate(&bytes),
            Err(McapError::MissingTrailingMagic)
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = stream(&[]);
        bytes.extend([1, 2, 3]);
        assert!(matches!(validate(&bytes), Err(McapError::TrailingBytes(3))));
    }

    #[test]
    fn test_data_after_end() {
        let mut validator = StreamValidator::new(StreamOptions::default());
        validator.feed(&stream(&[])).unwrap();
        assert!(validator.is_complete());
        validator.feed(&[]).unwrap();
        assert!(matches!(
            validator.feed(&[0]),
            Err(McapError::DataAfterEnd)
        ));
    }

    #[test]
    fn test_visitor_sees_records_in_order() {
        let mut payload = channel_info(1, "/a");
        payload.extend(message(1, 5));
        let bytes = stream(&[chunk(&payload)]);

        let mut seen = Vec::new();
        let mut validator = StreamValidator::new(StreamOptions::default());
        validator
            .feed_with(&bytes, |record, origin| {
                seen.push((record.kind(), origin));
                Ok(())
            })
            .unwrap();
        validator.finish().unwrap();

        assert_eq!(
            seen,
            vec![
                (RecordKind::Chunk, RecordOrigin::TopLevel),
                (RecordKind::ChannelInfo, RecordOrigin::InChunk),
                (RecordKind::Message, RecordOrigin::InChunk),
                (RecordKind::Footer, RecordOrigin::TopLevel),
            ]
        );
    }

    #[test]
    fn test_visitor_error_stops_validation() {
        let bytes = stream(&[channel_info(1, "/a")]);
        let mut validator = StreamValidator::new(StreamOptions::default());
        let err = validator
            .feed_with(&bytes, |_, _| Err(McapError::config("stop")))
            .unwrap_err();
        assert!(matches!(err, McapError::Config(_)));
    }

    #[test]
    fn test_validate_reader() {
        let bytes = stream(&[channel_info(1, "/a"), message(1, 9)]);
        let options = StreamOptions::default().with_read_buffer_size(3);
        let summary = validate_reader(&bytes[..], options).unwrap();
        assert_eq!(summary.bytes_read, bytes.len() as u64);
        assert_eq!(summary.message_count, 1);
    }

    #[test]
    fn test_validate_reader_rejects_bad_options() {
        let options = StreamOptions::default().with_read_buffer_size(0);
        assert!(matches!(
            validate_reader(&[][..], options),
            Err(McapError::Config(_))
        ));
    }
}
