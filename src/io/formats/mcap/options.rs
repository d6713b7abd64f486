// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Configuration for reading MCAP streams.
//!
//! Options can be built in code with the `with_*` setters or loaded from a
//! TOML file:
//!
//! ```toml
//! read_buffer_size = 65536
//!
//! [reader]
//! initial_capacity = 16
//! record_length_limit = 268435456
//!
//! [chunk]
//! validate_crcs = true
//! max_decompressed_size = 1073741824
//! ```
//!
//! Every key is optional; missing keys take their default value.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::constants::MCAP_MAGIC;
use crate::{McapError, Result};

/// Default number of bytes the stream driver reads per call (64KB).
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Largest accepted read size (64MB).
pub const MAX_READ_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// Default cap on a chunk's decompressed size (1GB).
pub const DEFAULT_MAX_DECOMPRESSED_SIZE: u64 = 1024 * 1024 * 1024;

/// Options for [`McapReader`](super::reader::McapReader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Initial capacity of the reader's byte storage
    pub initial_capacity: usize,
    /// Reject records whose declared length exceeds this many bytes
    /// (None = no limit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_length_limit: Option<usize>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            initial_capacity: MCAP_MAGIC.len() * 2,
            record_length_limit: None,
        }
    }
}

impl ReaderOptions {
    /// Set the initial storage capacity.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the record length limit.
    pub fn with_record_length_limit(mut self, limit: usize) -> Self {
        self.record_length_limit = Some(limit);
        self
    }
}

/// Options for chunk expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkOptions {
    /// Verify the CRC32 of decompressed chunk data when the chunk declares
    /// one (a declared CRC of 0 means "not computed" and is never checked).
    pub validate_crcs: bool,
    /// Reject chunks whose decompressed size exceeds this many bytes
    pub max_decompressed_size: u64,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            validate_crcs: false,
            max_decompressed_size: DEFAULT_MAX_DECOMPRESSED_SIZE,
        }
    }
}

impl ChunkOptions {
    /// Enable or disable chunk CRC validation.
    pub fn with_validate_crcs(mut self, validate_crcs: bool) -> Self {
        self.validate_crcs = validate_crcs;
        self
    }

    /// Set the decompressed size limit.
    pub fn with_max_decompressed_size(mut self, size: u64) -> Self {
        self.max_decompressed_size = size;
        self
    }
}

/// Options for driving a whole stream through
/// [`StreamValidator`](super::stream::StreamValidator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamOptions {
    /// Bytes read from the source per call
    pub read_buffer_size: usize,
    /// Reader options
    pub reader: ReaderOptions,
    /// Chunk expansion options
    pub chunk: ChunkOptions,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            reader: ReaderOptions::default(),
            chunk: ChunkOptions::default(),
        }
    }
}

impl StreamOptions {
    /// Parse options from a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let options: Self = toml::from_str(s)
            .map_err(|e| McapError::config(format!("Failed to parse options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            McapError::config(format!("Failed to read '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Serialize options as a TOML document.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| McapError::config(format!("Failed to serialize options: {e}")))
    }

    /// Check option values.
    pub fn validate(&self) -> Result<()> {
        if self.read_buffer_size == 0 {
            return Err(McapError::config("read_buffer_size must be greater than 0"));
        }
        if self.read_buffer_size > MAX_READ_BUFFER_SIZE {
            return Err(McapError::config(format!(
                "read_buffer_size must be at most {MAX_READ_BUFFER_SIZE}"
            )));
        }
        if self.chunk.max_decompressed_size == 0 {
            return Err(McapError::config(
                "max_decompressed_size must be greater than 0",
            ));
        }
        if self.reader.record_length_limit == Some(0) {
            return Err(McapError::config(
                "record_length_limit must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Set the read size.
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Set the reader options.
    pub fn with_reader(mut self, reader: ReaderOptions) -> Self {
        self.reader = reader;
        self
    }

    /// Set the chunk options.
    pub fn with_chunk(mut self, chunk: ChunkOptions) -> Self {
        self.chunk = chunk;
        self
    }
}
