//! `lofty`-backed tag reader.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use lofty::config::ParseOptions;
use lofty::error::{ErrorKind, LoftyError};
use lofty::file::{FileType, TaggedFile};
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{Tag, TagType};
use tracing::trace;

use super::{clean_text, MediaMetadata, MetadataError, MetadataReader};

/// Reads ID3, Vorbis comment, MP4 and APE tags.
///
/// The file type is sniffed from content, not from the extension. Audio
/// properties are not decoded.
#[derive(Debug, Clone, Default)]
pub struct TagMetadataReader;

impl TagMetadataReader {
    pub fn new() -> Self {
        Self
    }

    fn probe(&self, path: &Path) -> Result<TaggedFile, MetadataError> {
        let file = File::open(path).map_err(|e| MetadataError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let probe = Probe::new(BufReader::new(file))
            .options(ParseOptions::new().read_properties(false))
            .guess_file_type()
            .map_err(|e| MetadataError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        if probe.file_type().is_none() {
            return Err(MetadataError::Unsupported {
                path: path.to_path_buf(),
            });
        }

        probe.read().map_err(|e| classify(path, e))
    }
}

impl MetadataReader for TagMetadataReader {
    fn read_metadata(&self, path: &Path) -> Result<Option<MediaMetadata>, MetadataError> {
        let tagged_file = self.probe(path)?;

        let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
            trace!(path = %path.display(), "no tag present");
            return Ok(None);
        };

        Ok(Some(metadata_from_tag(tag, tagged_file.file_type())))
    }
}

fn metadata_from_tag(tag: &Tag, file_type: FileType) -> MediaMetadata {
    MediaMetadata {
        title: clean_text(tag.title()),
        artist: clean_text(tag.artist()),
        album: clean_text(tag.album()),
        genre: clean_text(tag.genre()),
        year: tag.year().filter(|y| *y > 0),
        format: Some(tag_format_name(tag.tag_type())),
        file_type: Some(file_type_name(&file_type)),
    }
}

fn classify(path: &Path, error: LoftyError) -> MetadataError {
    let path = PathBuf::from(path);
    match error.kind() {
        ErrorKind::UnknownFormat => MetadataError::Unsupported { path },
        _ => MetadataError::Malformed {
            path,
            reason: error.to_string(),
        },
    }
}

/// Name of the tag container family.
pub(crate) fn tag_format_name(tag_type: TagType) -> String {
    match tag_type {
        TagType::Id3v1 => "ID3v1".to_string(),
        TagType::Id3v2 => "ID3v2".to_string(),
        TagType::Mp4Ilst => "MP4".to_string(),
        TagType::VorbisComments => "VORBIS".to_string(),
        TagType::Ape => "APE".to_string(),
        TagType::RiffInfo => "RIFF".to_string(),
        TagType::AiffText => "AIFF".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

/// Name of the file/codec family.
pub(crate) fn file_type_name(file_type: &FileType) -> String {
    match file_type {
        FileType::Mpeg => "MP3".to_string(),
        FileType::Flac => "FLAC".to_string(),
        FileType::Mp4 => "M4A".to_string(),
        FileType::Vorbis => "OGG".to_string(),
        FileType::Opus => "OPUS".to_string(),
        FileType::Speex => "SPX".to_string(),
        FileType::Aac => "AAC".to_string(),
        FileType::Aiff => "AIFF".to_string(),
        FileType::Wav => "WAV".to_string(),
        FileType::WavPack => "WV".to_string(),
        FileType::Ape => "APE".to_string(),
        FileType::Mpc => "MPC".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_tag_format_names() {
        assert_eq!(tag_format_name(TagType::Id3v2), "ID3v2");
        assert_eq!(tag_format_name(TagType::VorbisComments), "VORBIS");
        assert_eq!(tag_format_name(TagType::Mp4Ilst), "MP4");
    }

    #[test]
    fn test_file_type_names() {
        assert_eq!(file_type_name(&FileType::Mpeg), "MP3");
        assert_eq!(file_type_name(&FileType::Flac), "FLAC");
        assert_eq!(file_type_name(&FileType::Mp4), "M4A");
    }

    #[test]
    fn test_reads_id3v2_tag_from_mp3() {
        let dir = TempDir::new().unwrap();
        let path =
            fixtures::write_id3v2_mp3(dir.path(), "song.mp3", "One More Time", "Daft Punk");

        let reader = TagMetadataReader::new();
        let meta = reader.read_metadata(&path).unwrap().expect("tag not found");

        assert_eq!(meta.title.as_deref(), Some("One More Time"));
        assert_eq!(meta.artist.as_deref(), Some("Daft Punk"));
        assert_eq!(meta.album, None);
        assert_eq!(meta.format.as_deref(), Some("ID3v2"));
        assert_eq!(meta.file_type.as_deref(), Some("MP3"));
    }

    #[test]
    fn test_type_is_sniffed_from_content_not_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mislabelled.flac");
        fs::write(&path, fixtures::id3v2_mp3_bytes("Digital Love", "Daft Punk")).unwrap();

        let reader = TagMetadataReader::new();
        let meta = reader.read_metadata(&path).unwrap().expect("tag not found");

        assert_eq!(meta.title.as_deref(), Some("Digital Love"));
        assert_eq!(meta.file_type.as_deref(), Some("MP3"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let reader = TagMetadataReader::new();
        let result = reader.read_metadata(Path::new("/nonexistent/song.mp3"));
        assert!(matches!(result, Err(MetadataError::Io { .. })));
    }

    #[test]
    fn test_plain_text_file_is_not_media() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "just some notes, definitely not audio\n").unwrap();

        let reader = TagMetadataReader::new();
        let result = reader.read_metadata(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_with_audio_extension_is_not_indexed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.mp3");
        fs::write(&path, [0x13u8, 0x37, 0x00, 0x42, 0x99, 0x01, 0x02]).unwrap();

        let reader = TagMetadataReader::new();
        let result = reader.read_metadata(&path);
        assert!(!matches!(result, Ok(Some(_))));
    }
}
