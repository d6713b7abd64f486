// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Append-and-consume byte accumulator.
//!
//! `ByteStorage` owns a single buffer and a live window into it: the bytes
//! that have been appended but not yet consumed. Consuming only moves the
//! window start, so it is O(1). Appending prefers, in order:
//!
//! 1. writing after the window when the buffer has room there,
//! 2. compacting the window to offset 0 when the buffer is big enough overall,
//! 3. reallocating to twice the required size, copying only the live bytes.
//!
//! ```text
//! buffer: [ consumed | live window | spare ]
//!          0         start         start+len   capacity
//! ```

use std::fmt;

/// Growable byte buffer with an O(1) consumable prefix.
#[derive(Default)]
pub struct ByteStorage {
    /// Backing buffer; its length is the usable capacity
    buffer: Vec<u8>,
    /// Start of the live window
    start: usize,
    /// Length of the live window
    len: usize,
}

impl ByteStorage {
    /// Create empty storage without allocating.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty storage with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0; capacity],
            start: 0,
            len: 0,
        }
    }

    /// Append bytes to the end of the live window.
    pub fn append(&mut self, data: &[u8]) {
        let end = self.start + self.len;
        let needed = self.len + data.len();

        if end + data.len() <= self.buffer.len() {
            // Fits after the window.
            self.buffer[end..end + data.len()].copy_from_slice(data);
        } else if needed <= self.buffer.len() {
            // Fits once the window is moved to the front.
            self.buffer.copy_within(self.start..end, 0);
            self.buffer[self.len..needed].copy_from_slice(data);
            self.start = 0;
        } else {
            let mut buffer = vec![0; needed * 2];
            buffer[..self.len].copy_from_slice(&self.buffer[self.start..end]);
            buffer[self.len..needed].copy_from_slice(data);
            self.buffer = buffer;
            self.start = 0;
        }

        self.len = needed;
    }

    /// Whether the live window holds at least `count` bytes.
    #[inline]
    pub fn has_bytes(&self, count: usize) -> bool {
        count <= self.len
    }

    /// Drop `count` bytes from the front of the live window and return them.
    ///
    /// The returned slice stays valid until the next mutation.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds the number of buffered bytes.
    pub fn consume(&mut self, count: usize) -> &[u8] {
        assert!(
            count <= self.len,
            "attempted to consume {count} bytes with only {} buffered",
            self.len
        );
        let consumed = self.start..self.start + count;
        self.len -= count;
        // An empty window can restart at the front, keeping later appends in place.
        self.start = if self.len == 0 { 0 } else { consumed.end };
        &self.buffer[consumed]
    }

    /// Zero-copy view of the live window.
    #[inline]
    pub fn view(&self) -> &[u8] {
        &self.buffer[self.start..self.start + self.len]
    }

    /// Number of buffered bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no bytes are buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether every appended byte has been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.is_empty()
    }

    /// Size of the backing buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

impl fmt::Debug for ByteStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStorage")
            .field("start", &self.start)
            .field("len", &self.len)
            .field("capacity", &self.buffer.len())
            .finish()
    }
}
