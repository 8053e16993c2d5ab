//! Types for the scan pipeline.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::LibraryConfig;

/// Scan behaviour that is independent of the catalog and the tag reader.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// URL prefix that replaces the scan root in servable paths.
    pub static_prefix: String,
    /// Follow symlinks while walking.
    pub follow_symlinks: bool,
    /// Lowercase extensions without the dot. Empty means every file.
    pub extensions: Vec<String>,
    /// Remove records whose identity was not seen during the walk.
    pub prune_stale: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from(&LibraryConfig::default())
    }
}

impl From<&LibraryConfig> for ScanOptions {
    fn from(config: &LibraryConfig) -> Self {
        Self {
            static_prefix: config.static_prefix.clone(),
            follow_symlinks: config.follow_symlinks,
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
                .filter(|ext| !ext.is_empty())
                .collect(),
            prune_stale: config.prune_stale,
        }
    }
}

/// Summary of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Root that was walked.
    pub root: PathBuf,
    /// Regular files considered (after the extension filter).
    pub files_seen: u64,
    /// Records upserted.
    pub records_indexed: u64,
    /// Files without usable tag metadata.
    pub skipped_no_metadata: u64,
    /// Files (or walk entries) that could not be read.
    pub skipped_errors: u64,
    /// Files whose content matched a file seen earlier in the same walk.
    pub duplicates: u64,
    /// Stale records removed (0 unless pruning is enabled).
    pub pruned: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScanReport {
    pub(crate) fn new(root: PathBuf, started_at: DateTime<Utc>) -> Self {
        Self {
            root,
            files_seen: 0,
            records_indexed: 0,
            skipped_no_metadata: 0,
            skipped_errors: 0,
            duplicates: 0,
            pruned: 0,
            started_at,
            finished_at: started_at,
        }
    }

    /// Distinct records produced by this walk.
    pub fn unique_records(&self) -> u64 {
        self.records_indexed - self.duplicates
    }

    /// Wall-clock duration in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Errors that end a scan. Per-file problems never surface here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Scan root does not exist or is not a directory: {0}")]
    RootNotFound(PathBuf),

    #[error("Catalog failure during scan: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Scan cancelled after indexing {records_indexed} records")]
    Cancelled { records_indexed: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config_normalizes_extensions() {
        let config = LibraryConfig {
            extensions: vec![".MP3".to_string(), " flac ".to_string()],
            ..Default::default()
        };
        let options = ScanOptions::from(&config);
        assert_eq!(options.extensions, vec!["mp3", "flac"]);
        assert_eq!(options.static_prefix, "/static/");
        assert!(!options.prune_stale);
    }

    #[test]
    fn test_report_serialization() {
        let mut report = ScanReport::new(PathBuf::from("/music"), Utc::now());
        report.records_indexed = 3;
        report.duplicates = 1;

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["records_indexed"], 3);
        assert_eq!(json["root"], "/music");
        assert_eq!(report.unique_records(), 2);
        assert_eq!(report.duration_ms(), 0);
    }
}
