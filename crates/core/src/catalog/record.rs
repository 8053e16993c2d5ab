//! Building catalog records from scanned files.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use super::MediaRecord;
use crate::metadata::MediaMetadata;

/// Errors deriving a servable path.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{path} is not under scan root {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("{path} contains a parent directory component")]
    ParentComponent { path: PathBuf },
}

/// Turns scanned files into [`MediaRecord`]s.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    scan_root: PathBuf,
    static_prefix: String,
}

impl RecordBuilder {
    pub fn new(scan_root: impl Into<PathBuf>, static_prefix: &str) -> Self {
        Self {
            scan_root: scan_root.into(),
            static_prefix: normalize_prefix(static_prefix),
        }
    }

    /// Build a record, or `None` if the file has no metadata.
    pub fn build(
        &self,
        path: &Path,
        identity: String,
        metadata: Option<MediaMetadata>,
    ) -> Result<Option<MediaRecord>, RecordError> {
        let Some(metadata) = metadata else {
            return Ok(None);
        };

        let servable_path = self.servable_path(path)?;

        Ok(Some(MediaRecord {
            identity,
            title: metadata.title.unwrap_or_default(),
            artist: metadata.artist,
            album: metadata.album,
            genre: metadata.genre,
            year: metadata.year,
            container_format: metadata.format,
            codec_type: metadata.file_type,
            servable_path,
        }))
    }

    /// URL path for `path`: the scan root is replaced by the static prefix and
    /// every segment is percent-encoded.
    ///
    /// `<root>/My Song.mp3` becomes `/static/My%20Song.mp3`.
    pub fn servable_path(&self, path: &Path) -> Result<String, RecordError> {
        let relative = path
            .strip_prefix(&self.scan_root)
            .map_err(|_| RecordError::OutsideRoot {
                path: path.to_path_buf(),
                root: self.scan_root.clone(),
            })?;

        let mut segments = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => segments.push(encode_segment(segment)),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(RecordError::ParentComponent {
                        path: path.to_path_buf(),
                    })
                }
            }
        }

        Ok(format!("{}{}", self.static_prefix, segments.join("/")))
    }
}

/// Percent-encode one path segment from its raw bytes, so non-UTF-8 names
/// still resolve back to the file.
#[cfg(unix)]
fn encode_segment(segment: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;
    urlencoding::encode_binary(segment.as_bytes()).into_owned()
}

#[cfg(not(unix))]
fn encode_segment(segment: &OsStr) -> String {
    urlencoding::encode(&segment.to_string_lossy()).into_owned()
}

/// Ensure the prefix starts and ends with exactly one `/`.
pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> RecordBuilder {
        RecordBuilder::new("/music", "/static/")
    }

    fn metadata() -> MediaMetadata {
        MediaMetadata {
            title: Some("One More Time".to_string()),
            artist: Some("Daft Punk".to_string()),
            album: Some("Discovery".to_string()),
            genre: None,
            year: Some(2001),
            format: Some("ID3v2".to_string()),
            file_type: Some("MP3".to_string()),
        }
    }

    #[test]
    fn test_spaces_are_percent_encoded() {
        let path = builder()
            .servable_path(Path::new("/music/My Song.mp3"))
            .unwrap();
        assert_eq!(path, "/static/My%20Song.mp3");
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let path = builder()
            .servable_path(Path::new("/music/AC#DC/What?&Why=100%.mp3"))
            .unwrap();
        assert_eq!(path, "/static/AC%23DC/What%3F%26Why%3D100%25.mp3");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_names_encode_raw_bytes() {
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/music/caf\xe9 noir.mp3"));
        let servable = builder().servable_path(path).unwrap();
        assert_eq!(servable, "/static/caf%E9%20noir.mp3");
        assert!(!servable.contains('\u{FFFD}'));
    }

    #[test]
    fn test_nested_directories_keep_separators() {
        let path = builder()
            .servable_path(Path::new("/music/Daft Punk/Discovery/01 One More Time.mp3"))
            .unwrap();
        assert_eq!(path, "/static/Daft%20Punk/Discovery/01%20One%20More%20Time.mp3");
    }

    #[test]
    fn test_redundant_segments_are_collapsed() {
        let path = builder()
            .servable_path(Path::new("/music/./Discovery//track.mp3"))
            .unwrap();
        assert_eq!(path, "/static/Discovery/track.mp3");
    }

    #[test]
    fn test_root_with_trailing_slash() {
        let builder = RecordBuilder::new("/music/", "static");
        let path = builder
            .servable_path(Path::new("/music/track.mp3"))
            .unwrap();
        assert_eq!(path, "/static/track.mp3");
    }

    #[test]
    fn test_path_outside_root_is_rejected() {
        let result = builder().servable_path(Path::new("/elsewhere/track.mp3"));
        assert!(matches!(result, Err(RecordError::OutsideRoot { .. })));
    }

    #[test]
    fn test_parent_component_is_rejected() {
        let result = builder().servable_path(Path::new("/music/../etc/passwd"));
        assert!(matches!(result, Err(RecordError::ParentComponent { .. })));
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/static/"), "/static/");
        assert_eq!(normalize_prefix("static"), "/static/");
        assert_eq!(normalize_prefix("//media/files//"), "/media/files/");
        assert_eq!(normalize_prefix(""), "/");
        assert_eq!(normalize_prefix("/"), "/");
    }

    #[test]
    fn test_build_maps_fields() {
        let record = builder()
            .build(
                Path::new("/music/Discovery/One More Time.mp3"),
                "abc123".to_string(),
                Some(metadata()),
            )
            .unwrap()
            .unwrap();

        assert_eq!(record.identity, "abc123");
        assert_eq!(record.title, "One More Time");
        assert_eq!(record.artist.as_deref(), Some("Daft Punk"));
        assert_eq!(record.album.as_deref(), Some("Discovery"));
        assert_eq!(record.genre, None);
        assert_eq!(record.year, Some(2001));
        assert_eq!(record.container_format.as_deref(), Some("ID3v2"));
        assert_eq!(record.codec_type.as_deref(), Some("MP3"));
        assert_eq!(record.servable_path, "/static/Discovery/One%20More%20Time.mp3");
    }

    #[test]
    fn test_build_skips_absent_metadata() {
        let record = builder()
            .build(Path::new("/music/track.mp3"), "abc123".to_string(), None)
            .unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn test_build_missing_title_is_empty() {
        let mut meta = metadata();
        meta.title = None;
        let record = builder()
            .build(Path::new("/music/track.mp3"), "abc123".to_string(), Some(meta))
            .unwrap()
            .unwrap();
        assert_eq!(record.title, "");
    }
}
