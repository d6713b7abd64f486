// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod dump;
mod validate;

pub use dump::DumpCmd;
pub use validate::ValidateCmd;
