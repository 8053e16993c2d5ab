//! Common test utilities for E2E testing.
//!
//! This module provides a test fixture that creates an in-process server
//! over a temporary music directory, indexed with the mock tag reader.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use mediacat_core::{
    testing::MockMetadataReader, Config, LibraryConfig, MediaCatalog, ScanPipeline,
    ScanReport, SqliteMediaCatalog,
};
use mediacat_server::{api::create_router, state::AppState};

/// Re-export fixtures for test convenience
pub use mediacat_core::testing::fixtures;

/// Test fixture for E2E testing.
///
/// Owns a temporary music directory and an in-memory catalog. Files written
/// with [`TestFixture::write`] use the mock `key=value` tag format and are
/// indexed by [`TestFixture::scan`].
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_list() {
///     let fixture = TestFixture::new();
///     fixture.write("song.mp3", "title=Song\n");
///     fixture.scan();
///
///     let response = fixture.get("/songs").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Catalog behind the router
    pub catalog: Arc<dyn MediaCatalog>,
    /// Library settings the router and scans use
    pub library: LibraryConfig,
    /// Temporary music directory (scan root and static file root)
    pub music_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Raw response for non-JSON endpoints
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl TestFixture {
    /// Create a fixture with an empty in-memory catalog.
    pub fn new() -> Self {
        let catalog = Arc::new(SqliteMediaCatalog::in_memory().expect("Failed to create catalog"));
        Self::with_catalog(catalog)
    }

    /// Create a fixture around a specific catalog implementation.
    pub fn with_catalog(catalog: Arc<dyn MediaCatalog>) -> Self {
        let music_dir = TempDir::new().expect("Failed to create music dir");

        let mut config = Config::default();
        config.library.music_dir = music_dir.path().to_path_buf();
        let library = config.library.clone();

        let state = Arc::new(AppState::new(config, Arc::clone(&catalog)));
        let router = create_router(state);

        Self {
            router,
            catalog,
            library,
            music_dir,
        }
    }

    /// Music directory root.
    pub fn root(&self) -> &Path {
        self.music_dir.path()
    }

    /// Write a file under the music directory, creating parent dirs.
    pub fn write(&self, relative: &str, contents: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(path, contents).expect("Failed to write file");
    }

    /// Index the music directory with the mock tag reader.
    pub fn scan(&self) -> ScanReport {
        let pipeline = ScanPipeline::from_config(
            Arc::clone(&self.catalog),
            MockMetadataReader::new(),
            &self.library,
        );
        pipeline
            .scan(self.root(), &CancellationToken::new())
            .expect("Scan failed")
    }

    /// Send a GET request and parse the body as JSON (Null if empty or not JSON).
    pub async fn get(&self, path: &str) -> TestResponse {
        let raw = self.get_raw(path).await;
        let body = serde_json::from_slice(&raw.bytes).unwrap_or(Value::Null);
        TestResponse {
            status: raw.status,
            body,
        }
    }

    /// Send a GET request and return the raw body.
    pub async fn get_raw(&self, path: &str) -> RawResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes()
            .to_vec();

        RawResponse {
            status,
            content_type,
            bytes,
        }
    }
}
