// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer: byte buffering and format implementations.

pub mod byte_storage;
pub mod formats;

pub use byte_storage::ByteStorage;
