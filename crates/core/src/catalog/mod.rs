//! Media catalog - the persistent table of indexed files.
//!
//! The scan pipeline is the only writer; the query service only reads.

mod record;
mod sqlite;
mod types;

pub use record::{RecordBuilder, RecordError};
pub use sqlite::SqliteMediaCatalog;
pub use types::*;

/// Trait for media catalog storage.
pub trait MediaCatalog: Send + Sync {
    /// Create the backing table if it does not exist. Safe to call repeatedly.
    fn ensure_schema(&self) -> Result<(), CatalogError>;

    /// Insert a record, or replace the record with the same identity.
    ///
    /// Atomic per call: readers see either the old row or the new one.
    fn upsert(&self, record: &MediaRecord) -> Result<(), CatalogError>;

    /// All records. Order is not part of the contract.
    fn query_all(&self) -> Result<Vec<MediaRecord>, CatalogError>;

    /// Records whose `attribute` column equals `value`.
    fn query_by_attribute(
        &self,
        attribute: SongAttribute,
        value: &str,
    ) -> Result<Vec<MediaRecord>, CatalogError>;

    /// The record with this identity, or [`CatalogError::NotFound`].
    fn query_by_id(&self, identity: &str) -> Result<MediaRecord, CatalogError>;

    /// Every stored identity.
    fn identities(&self) -> Result<Vec<String>, CatalogError>;

    /// Remove one record.
    fn remove(&self, identity: &str) -> Result<(), CatalogError>;

    /// Get catalog statistics.
    fn stats(&self) -> Result<CatalogStats, CatalogError>;
}

/// Parse a caller-supplied attribute name and run the query.
///
/// Unknown names fail with [`CatalogError::InvalidQuery`] before the store is
/// touched.
pub fn query_by_attribute_name(
    catalog: &dyn MediaCatalog,
    attribute: &str,
    value: &str,
) -> Result<Vec<MediaRecord>, CatalogError> {
    let attribute: SongAttribute = attribute.parse()?;
    catalog.query_by_attribute(attribute, value)
}
