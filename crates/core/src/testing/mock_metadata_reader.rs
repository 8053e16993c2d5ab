//! Mock metadata reader for testing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::metadata::{clean_text, MediaMetadata, MetadataError, MetadataReader};

/// Tag container reported for every file the mock parses.
pub const MOCK_TAG_FORMAT: &str = "MOCK";

/// Forced result for a single path.
#[derive(Debug, Clone)]
enum Override {
    Metadata(Option<MediaMetadata>),
    Malformed,
    Unreadable,
}

/// Mock implementation of the MetadataReader trait.
///
/// Files are parsed as plain `key=value` lines instead of real tags, so tests
/// can create "tagged" files with `std::fs::write`:
///
/// ```text
/// title=One More Time
/// artist=Daft Punk
/// year=2001
/// ```
///
/// Recognised keys are `title`, `artist`, `album`, `genre`, `year` and
/// `format`. A file with none of them has no metadata. The file type is the
/// uppercased extension.
///
/// # Example
///
/// ```rust,ignore
/// use mediacat_core::testing::MockMetadataReader;
///
/// let reader = MockMetadataReader::new();
/// reader.fail_path(&broken);
///
/// let pipeline = ScanPipeline::new(catalog, reader, hasher, options);
/// ```
#[derive(Debug, Default)]
pub struct MockMetadataReader {
    overrides: RwLock<HashMap<PathBuf, Override>>,
    reads: RwLock<Vec<PathBuf>>,
}

impl MockMetadataReader {
    /// Create a new mock reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make reads of `path` fail with a malformed-metadata error.
    pub fn fail_path(&self, path: &Path) {
        if let Ok(mut overrides) = self.overrides.write() {
            overrides.insert(path.to_path_buf(), Override::Malformed);
        }
    }

    /// Make reads of `path` fail as if the file could not be opened.
    pub fn fail_open(&self, path: &Path) {
        if let Ok(mut overrides) = self.overrides.write() {
            overrides.insert(path.to_path_buf(), Override::Unreadable);
        }
    }

    /// Return `metadata` for `path` regardless of its contents.
    pub fn set_metadata(&self, path: &Path, metadata: Option<MediaMetadata>) {
        if let Ok(mut overrides) = self.overrides.write() {
            overrides.insert(path.to_path_buf(), Override::Metadata(metadata));
        }
    }

    /// Number of reads performed.
    pub fn read_count(&self) -> usize {
        self.reads.read().map(|r| r.len()).unwrap_or_default()
    }

    fn parse(path: &Path, contents: &str) -> Option<MediaMetadata> {
        let mut metadata = MediaMetadata::default();
        let mut found = false;

        for line in contents.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = clean_text(Some(value));
            match key.trim() {
                "title" => metadata.title = value,
                "artist" => metadata.artist = value,
                "album" => metadata.album = value,
                "genre" => metadata.genre = value,
                "year" => metadata.year = value.and_then(|v| v.parse().ok()),
                "format" => metadata.format = value,
                _ => continue,
            }
            found = true;
        }

        if !found {
            return None;
        }

        if metadata.format.is_none() {
            metadata.format = Some(MOCK_TAG_FORMAT.to_string());
        }
        metadata.file_type = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_uppercase());

        Some(metadata)
    }
}

impl MetadataReader for MockMetadataReader {
    fn read_metadata(&self, path: &Path) -> Result<Option<MediaMetadata>, MetadataError> {
        if let Ok(mut reads) = self.reads.write() {
            reads.push(path.to_path_buf());
        }

        let forced = self
            .overrides
            .read()
            .ok()
            .and_then(|overrides| overrides.get(path).cloned());

        match forced {
            Some(Override::Metadata(metadata)) => return Ok(metadata),
            Some(Override::Malformed) => {
                return Err(MetadataError::Malformed {
                    path: path.to_path_buf(),
                    reason: "forced failure".to_string(),
                })
            }
            Some(Override::Unreadable) => {
                return Err(MetadataError::Io {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "forced open failure",
                    ),
                })
            }
            None => {}
        }

        let bytes = fs::read(path).map_err(|e| MetadataError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self::parse(path, &String::from_utf8_lossy(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parses_key_value_tags() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song.flac");
        fs::write(&path, "title=Song\nartist= Artist \nyear=1999\nnoise\n").unwrap();

        let reader = MockMetadataReader::new();
        let meta = reader.read_metadata(&path).unwrap().unwrap();

        assert_eq!(meta.title.as_deref(), Some("Song"));
        assert_eq!(meta.artist.as_deref(), Some("Artist"));
        assert_eq!(meta.year, Some(1999));
        assert_eq!(meta.format.as_deref(), Some(MOCK_TAG_FORMAT));
        assert_eq!(meta.file_type.as_deref(), Some("FLAC"));
        assert_eq!(reader.read_count(), 1);
    }

    #[test]
    fn test_untagged_file_has_no_metadata() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cover.jpg");
        fs::write(&path, b"\xFF\xD8\xFF").unwrap();

        let reader = MockMetadataReader::new();
        assert!(reader.read_metadata(&path).unwrap().is_none());
    }

    #[test]
    fn test_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song.mp3");
        fs::write(&path, "title=Song\n").unwrap();

        let reader = MockMetadataReader::new();
        reader.set_metadata(&path, None);
        assert!(reader.read_metadata(&path).unwrap().is_none());

        reader.fail_path(&path);
        assert!(matches!(
            reader.read_metadata(&path),
            Err(MetadataError::Malformed { .. })
        ));

        reader.fail_open(&path);
        assert!(matches!(
            reader.read_metadata(&path),
            Err(MetadataError::Io { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let reader = MockMetadataReader::new();
        let result = reader.read_metadata(Path::new("/nonexistent/song.mp3"));
        assert!(matches!(result, Err(MetadataError::Io { .. })));
    }
}
