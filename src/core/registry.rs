// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Channel registry for cross-record consistency checks.
//!
//! The reader keeps no memory between records; the registry is owned by the
//! layer that drives it and enforces two rules:
//! - a channel id may be declared again only with identical contents,
//! - a message may only reference a channel that was already declared.

use std::collections::HashMap;

use super::error::{McapError, Result};
use crate::io::formats::mcap::records::ChannelInfo;

/// Registry of declared channels keyed by channel id.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: HashMap<u32, ChannelInfo<'static>>,
}

impl ChannelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel declaration.
    ///
    /// Returns `true` if the channel is new and `false` if it repeats an
    /// identical earlier declaration.
    ///
    /// # Errors
    ///
    /// Fails if the id was declared before with different contents.
    pub fn register(&mut self, info: &ChannelInfo<'_>) -> Result<bool> {
        match self.channels.get(&info.id) {
            Some(existing) if existing == info => Ok(false),
            Some(_) => Err(McapError::ChannelRedefined { id: info.id }),
            None => {
                self.channels.insert(info.id, info.clone().into_owned());
                Ok(true)
            }
        }
    }

    /// Look up a channel by id.
    pub fn get(&self, id: u32) -> Option<&ChannelInfo<'static>> {
        self.channels.get(&id)
    }

    /// Look up the channel a message refers to.
    ///
    /// # Errors
    ///
    /// Fails if no channel with this id was declared.
    pub fn require(&self, channel_id: u32) -> Result<&ChannelInfo<'static>> {
        self.get(channel_id)
            .ok_or(McapError::UnknownChannel { channel_id })
    }

    /// Whether a channel with this id was declared.
    pub fn contains(&self, id: u32) -> bool {
        self.channels.contains_key(&id)
    }

    /// Number of declared channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channels were declared.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Declared channels, ordered by id.
    pub fn channels(&self) -> Vec<&ChannelInfo<'static>> {
        let mut channels: Vec<_> = self.channels.values().collect();
        channels.sort_by_key(|info| info.id);
        channels
    }
}
