//! Embedded tag metadata.
//!
//! The scan pipeline only talks to [`MetadataReader`]; the tag library behind
//! [`TagMetadataReader`] is an implementation detail and tests substitute
//! their own reader.

mod tag_reader;

pub use tag_reader::TagMetadataReader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag values read from a media file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u32>,
    /// Tag container family, e.g. "ID3v2" or "VORBIS".
    pub format: Option<String>,
    /// File/codec type, e.g. "MP3" or "FLAC".
    pub file_type: Option<String>,
}

/// Errors reading tags. None of these are fatal to a scan.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to open {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported media format: {path}")]
    Unsupported { path: PathBuf },

    #[error("Malformed metadata in {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Reads embedded tag metadata from a file.
///
/// Implementations must open their own handle on `path`; identities are
/// computed separately over the full file.
pub trait MetadataReader: Send + Sync {
    /// Returns `Ok(None)` when the file parses but carries no tag.
    fn read_metadata(&self, path: &Path) -> Result<Option<MediaMetadata>, MetadataError>;
}

/// Trim a tag string, dropping it entirely if nothing is left.
pub(crate) fn clean_text(value: Option<impl AsRef<str>>) -> Option<String> {
    value
        .map(|v| v.as_ref().trim().to_string())
        .filter(|v| !v.is_empty())
}
