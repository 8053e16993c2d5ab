//! Scan pipeline implementation.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::types::{ScanError, ScanOptions, ScanReport};
use crate::catalog::{MediaCatalog, RecordBuilder};
use crate::config::LibraryConfig;
use crate::identity::IdentityHasher;
use crate::metadata::{MetadataError, MetadataReader};
use crate::metrics::{FILES_SCANNED, FILES_SKIPPED, RECORDS_INDEXED, RECORDS_PRUNED, SCAN_DURATION};

/// What happened to a single file.
enum FileOutcome {
    Indexed(String),
    NoMetadata,
    Failed,
}

/// Walks a directory tree and upserts a record for every tagged file.
///
/// The pipeline is the catalog's only writer and runs on a single thread.
/// Re-running it over an unchanged tree leaves the catalog unchanged.
pub struct ScanPipeline<R: MetadataReader> {
    catalog: Arc<dyn MediaCatalog>,
    reader: R,
    hasher: IdentityHasher,
    options: ScanOptions,
}

impl<R: MetadataReader> ScanPipeline<R> {
    pub fn new(
        catalog: Arc<dyn MediaCatalog>,
        reader: R,
        hasher: IdentityHasher,
        options: ScanOptions,
    ) -> Self {
        Self {
            catalog,
            reader,
            hasher,
            options,
        }
    }

    /// Create a pipeline from the library section of the config.
    pub fn from_config(catalog: Arc<dyn MediaCatalog>, reader: R, config: &LibraryConfig) -> Self {
        Self::new(
            catalog,
            reader,
            IdentityHasher::new(config.identity_algorithm),
            ScanOptions::from(config),
        )
    }

    /// Walk `root` and index every regular file with tag metadata.
    ///
    /// The token is checked before each entry. On cancellation the walk stops,
    /// records already upserted stay, and no prune pass runs. Pruning also
    /// requires that every entry was readable.
    pub fn scan(&self, root: &Path, cancel: &CancellationToken) -> Result<ScanReport, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }

        let timer = Instant::now();
        let result = self.walk(root, cancel);

        let label = match &result {
            Ok(_) => "completed",
            Err(ScanError::Cancelled { .. }) => "cancelled",
            Err(_) => "failed",
        };
        SCAN_DURATION
            .with_label_values(&[label])
            .observe(timer.elapsed().as_secs_f64());

        result
    }

    fn walk(&self, root: &Path, cancel: &CancellationToken) -> Result<ScanReport, ScanError> {
        info!(root = %root.display(), "Starting scan");

        let builder = RecordBuilder::new(root, &self.options.static_prefix);
        let mut report = ScanReport::new(root.to_path_buf(), Utc::now());
        let mut seen: HashSet<String> = HashSet::new();

        let walker = WalkDir::new(root).follow_links(self.options.follow_symlinks);

        for entry in walker {
            if cancel.is_cancelled() {
                info!(
                    records_indexed = report.records_indexed,
                    "Scan cancelled, stopping walk"
                );
                return Err(ScanError::Cancelled {
                    records_indexed: report.records_indexed,
                });
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    FILES_SKIPPED.with_label_values(&["error"]).inc();
                    report.skipped_errors += 1;
                    continue;
                }
            };

            // Directories, sockets, unfollowed symlinks etc.
            if !entry.file_type().is_file() {
                continue;
            }

            if !self.wants(entry.path()) {
                continue;
            }

            report.files_seen += 1;
            FILES_SCANNED.inc();

            match self.process_file(&builder, entry.path())? {
                FileOutcome::Indexed(identity) => {
                    if !seen.insert(identity) {
                        report.duplicates += 1;
                    }
                    report.records_indexed += 1;
                    RECORDS_INDEXED.inc();
                }
                FileOutcome::NoMetadata => {
                    report.skipped_no_metadata += 1;
                    FILES_SKIPPED.with_label_values(&["no_metadata"]).inc();
                }
                FileOutcome::Failed => {
                    report.skipped_errors += 1;
                    FILES_SKIPPED.with_label_values(&["error"]).inc();
                }
            }
        }

        if self.options.prune_stale {
            if report.skipped_errors > 0 {
                warn!(
                    skipped_errors = report.skipped_errors,
                    "Some entries could not be read, skipping prune"
                );
            } else {
                report.pruned = self.prune(&seen)?;
            }
        }

        report.finished_at = Utc::now();
        info!(
            files_seen = report.files_seen,
            records_indexed = report.records_indexed,
            skipped_no_metadata = report.skipped_no_metadata,
            skipped_errors = report.skipped_errors,
            duplicates = report.duplicates,
            pruned = report.pruned,
            duration_ms = report.duration_ms(),
            "Scan finished"
        );

        Ok(report)
    }

    /// Extension filter. An empty filter accepts everything.
    fn wants(&self, path: &Path) -> bool {
        if self.options.extensions.is_empty() {
            return true;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.options.extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }

    /// Only catalog failures are returned as errors.
    fn process_file(&self, builder: &RecordBuilder, path: &Path) -> Result<FileOutcome, ScanError> {
        let metadata = match self.reader.read_metadata(path) {
            Ok(Some(metadata)) => metadata,
            Ok(None) => {
                debug!(path = %path.display(), "No tag metadata, skipping");
                return Ok(FileOutcome::NoMetadata);
            }
            Err(e @ MetadataError::Io { .. }) => {
                warn!(path = %path.display(), error = %e, "Cannot open file, skipping");
                return Ok(FileOutcome::Failed);
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Unreadable tag metadata, skipping");
                return Ok(FileOutcome::NoMetadata);
            }
        };

        let identity = match self.hasher.hash_file(path) {
            Ok(identity) => identity,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot hash file, skipping");
                return Ok(FileOutcome::Failed);
            }
        };

        let record = match builder.build(path, identity, Some(metadata)) {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(FileOutcome::NoMetadata),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot derive servable path, skipping");
                return Ok(FileOutcome::Failed);
            }
        };

        self.catalog.upsert(&record)?;

        debug!(
            path = %path.display(),
            id = %record.identity,
            name = %record.title,
            "Indexed file"
        );

        Ok(FileOutcome::Indexed(record.identity))
    }

    /// Remove every stored record whose identity was not seen.
    fn prune(&self, seen: &HashSet<String>) -> Result<u64, ScanError> {
        let stale: Vec<String> = self
            .catalog
            .identities()?
            .into_iter()
            .filter(|id| !seen.contains(id))
            .collect();

        for identity in &stale {
            self.catalog.remove(identity)?;
            debug!(id = %identity, "Pruned stale record");
        }

        let pruned = stale.len() as u64;
        if pruned > 0 {
            info!(pruned, "Removed stale records");
            RECORDS_PRUNED.inc_by(pruned);
        }

        Ok(pruned)
    }
}
