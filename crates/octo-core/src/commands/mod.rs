//! High-level commands for frontends.
//!
//! Promotion itself lives in [`crate::promotion`]; this module holds the
//! read-only lookups the CLI exposes next to it.

pub mod browse;

pub use browse::{BrowseCommand, LatestRelease};
