//! SQLite-backed media catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection};
use tracing::debug;

use super::{CatalogError, CatalogStats, MediaCatalog, MediaRecord, SongAttribute};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

macro_rules! select_songs {
    ($tail:literal) => {
        concat!(
            "SELECT ID, Name, Artist, Album, Genre, Year, Format, FileType, Path FROM songs",
            $tail
        )
    };
}

/// One fixed statement per filterable column.
fn attribute_query(attribute: SongAttribute) -> &'static str {
    match attribute {
        SongAttribute::Id => select_songs!(" WHERE ID = ?1 ORDER BY ID"),
        SongAttribute::Name => select_songs!(" WHERE Name = ?1 ORDER BY ID"),
        SongAttribute::Artist => select_songs!(" WHERE Artist = ?1 ORDER BY ID"),
        SongAttribute::Album => select_songs!(" WHERE Album = ?1 ORDER BY ID"),
        SongAttribute::Genre => select_songs!(" WHERE Genre = ?1 ORDER BY ID"),
        SongAttribute::Year => select_songs!(" WHERE Year = ?1 ORDER BY ID"),
        SongAttribute::Format => select_songs!(" WHERE Format = ?1 ORDER BY ID"),
        SongAttribute::FileType => select_songs!(" WHERE FileType = ?1 ORDER BY ID"),
        SongAttribute::Path => select_songs!(" WHERE Path = ?1 ORDER BY ID"),
    }
}

/// SQLite-backed media catalog.
///
/// All access goes through one connection behind a mutex, so writes are
/// serialized and a reader never observes a half-written row.
pub struct SqliteMediaCatalog {
    conn: Mutex<Connection>,
}

impl SqliteMediaCatalog {
    /// Open (or create) the catalog database and its schema.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::initialize_schema(&conn)?;
        debug!(path = %path.display(), "opened media catalog");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS songs (
                ID TEXT NOT NULL PRIMARY KEY,
                Name TEXT NOT NULL,
                Artist TEXT NULL,
                Album TEXT NULL,
                Genre TEXT NULL,
                Year INTEGER NULL,
                Format TEXT NULL,
                FileType TEXT NULL,
                Path TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_songs_artist ON songs(Artist);
            CREATE INDEX IF NOT EXISTS idx_songs_album ON songs(Album);
            CREATE INDEX IF NOT EXISTS idx_songs_genre ON songs(Genre);
            "#,
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Internal("catalog connection lock poisoned".to_string()))
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<MediaRecord> {
        Ok(MediaRecord {
            identity: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            album: row.get(3)?,
            genre: row.get(4)?,
            year: row.get(5)?,
            container_format: row.get(6)?,
            codec_type: row.get(7)?,
            servable_path: row.get(8)?,
        })
    }
}

impl MediaCatalog for SqliteMediaCatalog {
    fn ensure_schema(&self) -> Result<(), CatalogError> {
        let conn = self.conn()?;
        Self::initialize_schema(&conn)
    }

    fn upsert(&self, record: &MediaRecord) -> Result<(), CatalogError> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO songs (ID, Name, Artist, Album, Genre, Year, Format, FileType, Path)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(ID) DO UPDATE SET
                Name = excluded.Name,
                Artist = excluded.Artist,
                Album = excluded.Album,
                Genre = excluded.Genre,
                Year = excluded.Year,
                Format = excluded.Format,
                FileType = excluded.FileType,
                Path = excluded.Path",
            params![
                &record.identity,
                &record.title,
                &record.artist,
                &record.album,
                &record.genre,
                record.year,
                &record.container_format,
                &record.codec_type,
                &record.servable_path,
            ],
        )?;

        Ok(())
    }

    fn query_all(&self) -> Result<Vec<MediaRecord>, CatalogError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(select_songs!(" ORDER BY ID"))?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn query_by_attribute(
        &self,
        attribute: SongAttribute,
        value: &str,
    ) -> Result<Vec<MediaRecord>, CatalogError> {
        // Validate before taking the lock
        let year = match attribute {
            SongAttribute::Year => Some(value.trim().parse::<u32>().map_err(|_| {
                CatalogError::InvalidQuery(format!("Year must be an integer, got '{}'", value))
            })?),
            _ => None,
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(attribute_query(attribute))?;

        let records = match year {
            Some(year) => stmt
                .query_map(params![year], Self::row_to_record)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map(params![value], Self::row_to_record)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(records)
    }

    fn query_by_id(&self, identity: &str) -> Result<MediaRecord, CatalogError> {
        let conn = self.conn()?;

        conn.query_row(
            select_songs!(" WHERE ID = ?1"),
            params![identity],
            Self::row_to_record,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(identity.to_string()),
            _ => CatalogError::Database(e.to_string()),
        })
    }

    fn identities(&self) -> Result<Vec<String>, CatalogError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT ID FROM songs ORDER BY ID")?;

        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(ids)
    }

    fn remove(&self, identity: &str) -> Result<(), CatalogError> {
        let conn = self.conn()?;

        let rows_affected = conn.execute("DELETE FROM songs WHERE ID = ?1", params![identity])?;

        if rows_affected == 0 {
            return Err(CatalogError::NotFound(identity.to_string()));
        }

        Ok(())
    }

    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let conn = self.conn()?;

        let (total_records, distinct_artists, distinct_albums) = conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT Artist), COUNT(DISTINCT Album) FROM songs",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(CatalogStats {
            total_records,
            distinct_artists,
            distinct_albums,
        })
    }
}
