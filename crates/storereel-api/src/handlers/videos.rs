//! Admin catalog handlers: list, direct create, toggle, delete.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use storereel_core::models::{NewVideo, SourceType, VideoResponse};

use crate::error::ApiError;
use crate::handlers::ShopQuery;
use crate::state::AppState;

/// Direct record creation for a video whose URL is already known (no upload
/// pipeline involved).
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 2048, message = "Video URL must not be empty"))]
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub source_author: Option<String>,
    pub source_type: Option<SourceType>,
    pub product_id: Option<String>,
}

#[tracing::instrument(skip(state), fields(shop = %query.shop, operation = "list_videos"))]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShopQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let videos = state.store.list_for_shop(&query.shop).await?;
    let responses: Vec<VideoResponse> = videos.into_iter().map(VideoResponse::from).collect();
    Ok(Json(responses))
}

#[tracing::instrument(skip(state, payload), fields(shop = %query.shop, operation = "create_video"))]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShopQuery>,
    Json(payload): Json<CreateVideoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let record = state
        .store
        .create(
            &query.shop,
            NewVideo {
                title: payload.title,
                description: payload.description,
                video_url: payload.video_url,
                thumbnail_url: payload.thumbnail_url,
                duration_seconds: payload.duration_seconds,
                source_author: payload.source_author,
                source_type: payload.source_type,
                product_id: payload.product_id,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(VideoResponse::from(record))))
}

#[tracing::instrument(skip(state), fields(video_id = %id, operation = "toggle_video"))]
pub async fn toggle_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let record = state.store.toggle_active(id).await?;
    Ok(Json(VideoResponse::from(record)))
}

#[tracing::instrument(skip(state), fields(video_id = %id, operation = "delete_video"))]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
