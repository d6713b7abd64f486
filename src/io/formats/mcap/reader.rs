// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Incremental, pull-based MCAP reader.
//!
//! The reader never performs I/O and never blocks: bytes are pushed in with
//! [`McapReader::append`] in fragments of any size, and the pull operations
//! return `Ok(None)` when the buffered bytes are not yet enough to produce a
//! result. Nothing is consumed in that case, so the call can simply be
//! repeated after the next `append`.
//!
//! # Example
//!
//! ```rust
//! use robostream::io::formats::mcap::reader::McapReader;
//! use robostream::io::formats::mcap::records::Record;
//!
//! # fn main() -> robostream::Result<()> {
//! let mut reader = McapReader::new();
//! reader.append(&[0x89, b'M', b'C', b'A']);
//! assert!(reader.read_magic()?.is_none());
//!
//! reader.append(&[b'P', 0x30, b'\r', b'\n', 1]);
//! assert_eq!(reader.read_magic()?.map(|m| m.format_version), Some(1));
//!
//! reader.append(&[6, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
//! assert!(matches!(reader.read_record()?, Some(Record::Footer(_))));
//! assert!(reader.at_end());
//! # Ok(())
//! # }
//! ```

use super::constants::MAGIC_MARKER_LEN;
use super::options::ReaderOptions;
use super::parse::{decode_record, declared_length, record_header, verify_magic};
use super::records::{Magic, Record};
use crate::io::byte_storage::ByteStorage;
use crate::{McapError, Result};

/// Stateful façade over [`ByteStorage`] and the record codec.
///
/// Decoded records borrow from the reader's storage, so a record must be
/// dropped (or converted with [`Record::into_owned`]) before the next call
/// that takes `&mut self`.
#[derive(Debug)]
pub struct McapReader {
    storage: ByteStorage,
    options: ReaderOptions,
    /// Length of the last record returned, released on the next call.
    pending_consume: usize,
}

impl Default for McapReader {
    fn default() -> Self {
        Self::new()
    }
}

impl McapReader {
    /// Create a reader with default options.
    pub fn new() -> Self {
        Self::with_options(ReaderOptions::default())
    }

    /// Create a reader with the given options.
    pub fn with_options(options: ReaderOptions) -> Self {
        Self {
            storage: ByteStorage::with_capacity(options.initial_capacity),
            options,
            pending_consume: 0,
        }
    }

    /// Buffer more bytes from the stream.
    pub fn append(&mut self, data: &[u8]) {
        self.release();
        self.storage.append(data);
    }

    /// Drop the bytes of the record returned by the last `read_record`.
    fn release(&mut self) {
        if self.pending_consume > 0 {
            self.storage.consume(self.pending_consume);
            self.pending_consume = 0;
        }
    }

    /// Read the magic marker (magic bytes + format version).
    ///
    /// Returns `Ok(None)` until all of the marker is buffered; on success
    /// exactly the marker is consumed.
    ///
    /// # Errors
    ///
    /// Fails if the buffered bytes are not the MCAP magic or the version is
    /// not supported.
    pub fn read_magic(&mut self) -> Result<Option<Magic>> {
        self.release();
        let Some(magic) = verify_magic(self.storage.view(), 0)? else {
            return Ok(None);
        };
        self.storage.consume(MAGIC_MARKER_LEN);
        Ok(Some(magic))
    }

    /// Read the next record.
    ///
    /// Returns `Ok(None)` without consuming anything until the whole record is
    /// buffered; on success exactly the record's bytes are consumed. An error
    /// consumes nothing.
    ///
    /// # Errors
    ///
    /// Fails on an invalid record tag, a malformed record body, an
    /// unsupported record type or a record longer than the configured limit.
    pub fn read_record(&mut self) -> Result<Option<Record<'_>>> {
        self.release();
        if let Some(limit) = self.options.record_length_limit {
            if let Some(length) = declared_length(self.storage.view(), 0)? {
                if length > limit {
                    return Err(McapError::RecordTooLarge { length, limit });
                }
            }
        }

        let Some((kind, used_bytes)) = record_header(self.storage.view(), 0)? else {
            return Ok(None);
        };
        let record = decode_record(self.storage.view(), 0, kind, used_bytes)?;
        self.pending_consume = used_bytes;
        Ok(Some(record))
    }

    /// Whether every appended byte has been consumed.
    pub fn at_end(&self) -> bool {
        self.bytes_remaining() == 0
    }

    /// Number of buffered bytes not yet consumed.
    pub fn bytes_remaining(&self) -> usize {
        self.storage.len() - self.pending_consume
    }

    /// The reader's options.
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }
}
