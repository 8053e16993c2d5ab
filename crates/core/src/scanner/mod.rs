//! Scan pipeline - walks a media directory and indexes it into the catalog.
//!
//! Each regular file goes through:
//! 1. Tag extraction (skipped when absent)
//! 2. Identity hashing over an independent handle
//! 3. Record building
//! 4. Upsert into the catalog
//!
//! Per-file failures are logged and counted; catalog failures end the scan.

mod pipeline;
mod types;

pub use pipeline::ScanPipeline;
pub use types::{ScanError, ScanOptions, ScanReport};
