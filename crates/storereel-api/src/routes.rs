//! Route configuration.

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use storereel_core::Config;

use crate::handlers::{feed, upload, videos};
use crate::state::AppState;

/// Headroom above the payload ceiling for multipart framing and draft fields.
const BODY_LIMIT_OVERHEAD_BYTES: usize = 1024 * 1024;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn build_router(state: Arc<AppState>, config: &Config) -> Router {
    let body_limit = config.max_upload_bytes as usize + BODY_LIMIT_OVERHEAD_BYTES;

    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/v0/videos",
            get(videos::list_videos).post(videos::create_video),
        )
        .route("/api/v0/videos/upload", post(upload::upload_video))
        .route("/api/v0/videos/{id}/toggle", post(videos::toggle_video))
        .route("/api/v0/videos/{id}", delete(videos::delete_video))
        .route("/api/v0/feed", get(feed::feed))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}
