// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout robostream.
//!
//! - [`McapError`] - Error type for every reader operation
//! - [`ChannelRegistry`] - Cross-record channel bookkeeping

pub mod error;
pub mod registry;

pub use error::{McapError, Result};
pub use registry::ChannelRegistry;
