//! File format implementations.
//!
//! - [`mcap`]: incremental MCAP stream reading

pub mod mcap;
