//! Testing utilities and mock implementations.
//!
//! This module provides a mock tag reader and fixture helpers so the scan
//! pipeline and the HTTP layer can be tested without real audio files.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediacat_core::testing::{fixtures, MockMetadataReader};
//!
//! let dir = tempfile::TempDir::new()?;
//! fixtures::write_tagged_file(dir.path(), "Album/01 Track.mp3", "Track", Some("Artist"));
//!
//! let reader = MockMetadataReader::new();
//! // Use in a ScanPipeline...
//! ```

mod mock_metadata_reader;

pub use mock_metadata_reader::{MockMetadataReader, MOCK_TAG_FORMAT};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::fs;
    use std::path::{Path, PathBuf};

    use crate::catalog::MediaRecord;
    use crate::metadata::MediaMetadata;

    /// Contents [`super::MockMetadataReader`] parses into a title and artist.
    pub fn tagged_contents(title: &str, artist: Option<&str>) -> String {
        let mut contents = format!("title={}\n", title);
        if let Some(artist) = artist {
            contents.push_str(&format!("artist={}\n", artist));
        }
        contents
    }

    /// Write a mock-tagged file at `root/relative`, creating parent dirs.
    pub fn write_tagged_file(
        root: &Path,
        relative: &str,
        title: &str,
        artist: Option<&str>,
    ) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture directory");
        }
        fs::write(&path, tagged_contents(title, artist)).expect("failed to write fixture file");
        path
    }

    /// Bytes of a minimal MP3: an ID3v2.4 tag holding `TIT2` and `TPE1`,
    /// followed by a few silent MPEG-1 Layer III frames.
    pub fn id3v2_mp3_bytes(title: &str, artist: &str) -> Vec<u8> {
        let mut frames = Vec::new();
        for (id, text) in [(b"TIT2", title), (b"TPE1", artist)] {
            frames.extend_from_slice(id);
            frames.extend_from_slice(&syncsafe(text.len() as u32 + 1));
            frames.extend_from_slice(&[0x00, 0x00]);
            frames.push(0x03); // UTF-8
            frames.extend_from_slice(text.as_bytes());
        }

        let mut bytes = b"ID3".to_vec();
        bytes.extend_from_slice(&[0x04, 0x00, 0x00]);
        bytes.extend_from_slice(&syncsafe(frames.len() as u32));
        bytes.extend_from_slice(&frames);

        // 128 kbps, 44.1 kHz, no padding: 417 bytes per frame
        for _ in 0..4 {
            bytes.extend_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
            bytes.extend(std::iter::repeat(0u8).take(413));
        }
        bytes
    }

    /// Write [`id3v2_mp3_bytes`] at `root/relative`, creating parent dirs.
    pub fn write_id3v2_mp3(root: &Path, relative: &str, title: &str, artist: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture directory");
        }
        fs::write(&path, id3v2_mp3_bytes(title, artist)).expect("failed to write fixture file");
        path
    }

    fn syncsafe(size: u32) -> [u8; 4] {
        [
            ((size >> 21) & 0x7F) as u8,
            ((size >> 14) & 0x7F) as u8,
            ((size >> 7) & 0x7F) as u8,
            (size & 0x7F) as u8,
        ]
    }

    /// Metadata with a title and optional artist.
    pub fn metadata(title: &str, artist: Option<&str>) -> MediaMetadata {
        MediaMetadata {
            title: Some(title.to_string()),
            artist: artist.map(String::from),
            format: Some("ID3v2".to_string()),
            file_type: Some("MP3".to_string()),
            ..Default::default()
        }
    }

    /// A catalog record with reasonable defaults.
    pub fn media_record(identity: &str, title: &str, artist: &str) -> MediaRecord {
        MediaRecord {
            identity: identity.to_string(),
            title: title.to_string(),
            artist: Some(artist.to_string()),
            album: Some(format!("{} Album", artist)),
            genre: Some("Electronic".to_string()),
            year: Some(2001),
            container_format: Some("ID3v2".to_string()),
            codec_type: Some("MP3".to_string()),
            servable_path: format!("/static/{}.mp3", urlencoding::encode(title)),
        }
    }
}
