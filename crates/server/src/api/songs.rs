//! Song query handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{debug, error};
use mediacat_core::{query_by_attribute_name, CatalogError, MediaRecord};

use crate::state::AppState;

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Map a catalog error to a status and JSON body.
///
/// Storage errors are logged here and reach the client only as a generic
/// message.
pub(crate) fn catalog_error(e: CatalogError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match &e {
        CatalogError::NotFound(id) => (StatusCode::NOT_FOUND, format!("song not found: {}", id)),
        CatalogError::InvalidQuery(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        CatalogError::Database(_) | CatalogError::Internal(_) => {
            error!(error = %e, "Catalog query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "catalog unavailable".to_string(),
            )
        }
    };
    (status, Json(ErrorResponse { error: message }))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /songs
///
/// Every record in the catalog.
pub async fn list_songs(State(state): State<Arc<AppState>>) -> ApiResult<Vec<MediaRecord>> {
    state.catalog().query_all().map(Json).map_err(catalog_error)
}

/// GET /songs/{id}
pub async fn get_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<MediaRecord> {
    state.catalog().query_by_id(&id).map(Json).map_err(catalog_error)
}

/// GET /songs/{attribute}/{value}
///
/// Exact-match filter on one attribute. Unknown attributes are rejected with
/// 400 before the store is queried.
pub async fn songs_by_attribute(
    State(state): State<Arc<AppState>>,
    Path((attribute, value)): Path<(String, String)>,
) -> ApiResult<Vec<MediaRecord>> {
    debug!(%attribute, %value, "Attribute query");
    query_by_attribute_name(state.catalog(), &attribute, &value)
        .map(Json)
        .map_err(catalog_error)
}
