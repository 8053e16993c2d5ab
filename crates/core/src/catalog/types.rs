//! Types for the media catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One indexed media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Content-derived identity (hex digest). Primary key.
    #[serde(rename = "id")]
    pub identity: String,
    /// Track title. Empty when the tag has no title.
    #[serde(rename = "name")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Tag container family (e.g. "ID3v2").
    #[serde(rename = "format", default, skip_serializing_if = "Option::is_none")]
    pub container_format: Option<String>,
    /// File/codec type (e.g. "MP3").
    #[serde(rename = "filetype", default, skip_serializing_if = "Option::is_none")]
    pub codec_type: Option<String>,
    /// URL path under the static prefix, already percent-encoded.
    #[serde(rename = "path")]
    pub servable_path: String,
}

/// Columns a catalog query may filter on.
///
/// Parsing a caller-supplied name into this enum is the only way to reach
/// [`super::MediaCatalog::query_by_attribute`], so a column name from a request
/// never ends up in SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SongAttribute {
    Id,
    Name,
    Artist,
    Album,
    Genre,
    Year,
    Format,
    FileType,
    /// The stored servable path. It contains `/`, so an HTTP caller sends it
    /// as a single segment with `%` and `/` percent-encoded.
    Path,
}

impl SongAttribute {
    pub const ALL: [SongAttribute; 9] = [
        Self::Id,
        Self::Name,
        Self::Artist,
        Self::Album,
        Self::Genre,
        Self::Year,
        Self::Format,
        Self::FileType,
        Self::Path,
    ];

    /// Column name in the `songs` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Name => "Name",
            Self::Artist => "Artist",
            Self::Album => "Album",
            Self::Genre => "Genre",
            Self::Year => "Year",
            Self::Format => "Format",
            Self::FileType => "FileType",
            Self::Path => "Path",
        }
    }
}

impl fmt::Display for SongAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SongAttribute {
    type Err = CatalogError;

    /// Accepts column names and JSON field names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" | "identity" => Ok(Self::Id),
            "name" | "title" => Ok(Self::Name),
            "artist" => Ok(Self::Artist),
            "album" => Ok(Self::Album),
            "genre" => Ok(Self::Genre),
            "year" => Ok(Self::Year),
            "format" => Ok(Self::Format),
            "filetype" | "file_type" => Ok(Self::FileType),
            "path" => Ok(Self::Path),
            _ => Err(CatalogError::InvalidQuery(format!(
                "unknown attribute '{}'",
                s
            ))),
        }
    }
}

/// Catalog statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_records: u64,
    pub distinct_artists: u64,
    pub distinct_albums: u64,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(e: rusqlite::Error) -> Self {
        CatalogError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> MediaRecord {
        MediaRecord {
            identity: "abc123".to_string(),
            title: "One More Time".to_string(),
            artist: Some("Daft Punk".to_string()),
            album: Some("Discovery".to_string()),
            genre: None,
            year: Some(2001),
            container_format: Some("ID3v2".to_string()),
            codec_type: Some("MP3".to_string()),
            servable_path: "/static/Discovery/01%20One%20More%20Time.mp3".to_string(),
        }
    }

    #[test]
    fn test_record_json_field_names() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["id"], "abc123");
        assert_eq!(json["name"], "One More Time");
        assert_eq!(json["artist"], "Daft Punk");
        assert_eq!(json["year"], 2001);
        assert_eq!(json["format"], "ID3v2");
        assert_eq!(json["filetype"], "MP3");
        assert_eq!(json["path"], "/static/Discovery/01%20One%20More%20Time.mp3");
        // None should be skipped
        assert!(json.get("genre").is_none());
    }

    #[test]
    fn test_attribute_parsing_accepts_columns_and_fields() {
        assert_eq!("Artist".parse::<SongAttribute>().unwrap(), SongAttribute::Artist);
        assert_eq!("artist".parse::<SongAttribute>().unwrap(), SongAttribute::Artist);
        assert_eq!("FileType".parse::<SongAttribute>().unwrap(), SongAttribute::FileType);
        assert_eq!("filetype".parse::<SongAttribute>().unwrap(), SongAttribute::FileType);
        assert_eq!("ID".parse::<SongAttribute>().unwrap(), SongAttribute::Id);
        assert_eq!("name".parse::<SongAttribute>().unwrap(), SongAttribute::Name);
    }

    #[test]
    fn test_attribute_parsing_rejects_unknown() {
        for bad in ["DROP TABLE songs", "Artist; --", "", "rowid", "Artist OR 1=1"] {
            let result = bad.parse::<SongAttribute>();
            assert!(
                matches!(result, Err(CatalogError::InvalidQuery(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_attribute_column_round_trip() {
        for attribute in SongAttribute::ALL {
            assert_eq!(attribute.column().parse::<SongAttribute>().unwrap(), attribute);
        }
    }
}
