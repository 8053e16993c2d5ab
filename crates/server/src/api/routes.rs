use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use super::{handlers, middleware::metrics_middleware, songs};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let library = &state.config().library;

    // Files are served from the scan root under the same prefix used to build
    // record paths. Nesting at "/" is not allowed, config validation rejects it.
    let static_prefix = format!("/{}", library.static_prefix.trim_matches('/'));
    let serve_dir = ServeDir::new(&library.music_dir);

    let api_routes = Router::new()
        // Health and observability
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::get_stats))
        .route("/metrics", get(handlers::get_metrics))
        // Songs
        .route("/songs", get(songs::list_songs))
        .route("/songs/{id}", get(songs::get_song))
        .route("/songs/{attribute}/{value}", get(songs::songs_by_attribute));

    api_routes
        .nest_service(&static_prefix, serve_dir)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
