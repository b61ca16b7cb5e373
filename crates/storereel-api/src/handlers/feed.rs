//! Public storefront feed: active records only, sort order ascending,
//! cacheable for 60 seconds.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use storereel_core::models::VideoResponse;

use crate::error::ApiError;
use crate::handlers::ShopQuery;
use crate::state::AppState;

pub const FEED_CACHE_CONTROL: &str = "public, max-age=60";

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedResponse {
    pub videos: Vec<VideoResponse>,
}

#[tracing::instrument(skip(state), fields(shop = %query.shop, operation = "feed"))]
pub async fn feed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShopQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let videos = state.store.list_active_for_shop(&query.shop).await?;
    let videos: Vec<VideoResponse> = videos.into_iter().map(VideoResponse::from).collect();

    Ok((
        [(header::CACHE_CONTROL, FEED_CACHE_CONTROL)],
        Json(FeedResponse { videos }),
    ))
}
