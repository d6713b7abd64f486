// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::io::IsTerminal as _;
use std::path::Path;

use robostream::StreamOptions;
use tracing_subscriber::EnvFilter;

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Install the log subscriber.
///
/// `RUST_LOG` takes precedence; otherwise warnings are shown, or debug
/// output when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load stream options from an optional TOML file.
pub fn load_options(config: Option<&Path>) -> Result<StreamOptions> {
    match config {
        Some(path) => Ok(StreamOptions::load(path)?),
        None => Ok(StreamOptions::default()),
    }
}

/// Format a byte count with binary units and two decimals.
pub fn format_bytes(total_bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "kiB", "MiB", "GiB", "TiB"];
    let mut bytes = total_bytes;
    let mut unit = 0;
    while unit + 1 < UNITS.len() && bytes >= 1024.0 {
        bytes /= 1024.0;
        unit += 1;
    }
    format!("{bytes:.2}{}", UNITS[unit])
}

/// Format a duration in nanoseconds to human-readable string.
pub fn format_duration(nanos: u64) -> String {
    let secs = nanos / 1_000_000_000;
    let millis = (nanos % 1_000_000_000) / 1_000_000;

    if secs >= 3600 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{secs}.{millis:03}s")
    } else {
        format!("{millis}ms")
    }
}

/// Format a timestamp in nanoseconds since the epoch.
pub fn format_timestamp(nanos: u64) -> String {
    let secs = (nanos / 1_000_000_000) as i64;
    let subsec = (nanos % 1_000_000_000) as u32;

    match chrono::DateTime::<chrono::Utc>::from_timestamp(secs, subsec) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.9f UTC").to_string(),
        None => format!("{nanos} ns"),
    }
}

/// Hex-encode the first `limit` bytes of `data`.
pub fn hex_preview(data: &[u8], limit: usize) -> String {
    if data.len() > limit {
        format!("{}...", hex::encode(&data[..limit]))
    } else {
        hex::encode(data)
    }
}

/// Byte progress bar, shown only when stderr is a terminal.
pub struct ProgressBar {
    inner: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a new progress bar over `total` bytes.
    pub fn new(total: u64, prefix: impl Into<String>) -> Self {
        let inner = if std::io::stderr().is_terminal() {
            let pb = indicatif::ProgressBar::new(total);
            if let Ok(style) = indicatif::ProgressStyle::default_bar().template(
                "{prefix} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
            ) {
                pb.set_style(style.progress_chars("=>-"));
            }
            pb.set_prefix(prefix.into());
            Some(pb)
        } else {
            None
        };

        Self { inner }
    }

    /// Move the bar to `position` bytes.
    pub fn set_position(&self, position: u64) {
        if let Some(pb) = &self.inner {
            pb.set_position(position);
        }
    }

    /// Remove the bar from the terminal.
    pub fn finish_and_clear(&self) {
        if let Some(pb) = &self.inner {
            pb.finish_and_clear();
        }
    }
}
