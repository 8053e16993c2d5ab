pub mod catalog;
pub mod config;
pub mod identity;
pub mod metadata;
pub mod metrics;
pub mod scanner;
pub mod testing;

pub use catalog::{
    query_by_attribute_name, CatalogError, CatalogStats, MediaCatalog, MediaRecord,
    RecordBuilder, RecordError, SongAttribute, SqliteMediaCatalog,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    LibraryConfig, ServerConfig,
};
pub use identity::{IdentityAlgorithm, IdentityError, IdentityHasher};
pub use metadata::{MediaMetadata, MetadataError, MetadataReader, TagMetadataReader};
pub use scanner::{ScanError, ScanOptions, ScanPipeline, ScanReport};
