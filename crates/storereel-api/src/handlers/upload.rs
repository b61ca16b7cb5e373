//! Multipart upload endpoint: extracts the file and draft fields, then
//! drives one full ingestion session. Responds only once the record is
//! committed (or the session failed).

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use storereel_core::models::{FilePayload, VideoResponse};
use storereel_core::AppError;
use storereel_ingest::VideoDraft;

use crate::error::ApiError;
use crate::handlers::ShopQuery;
use crate::state::AppState;

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

async fn read_fields(mut multipart: Multipart) -> Result<(FilePayload, VideoDraft), AppError> {
    let mut file: Option<FilePayload> = None;
    let mut draft = VideoDraft::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("invalid multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("failed to read file field: {}", e))
                })?;
                file = Some(FilePayload::new(filename, content_type, data));
            }
            other => {
                let text = field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("failed to read field '{}': {}", other, e))
                })?;
                match other {
                    "title" => draft.title = non_empty(text),
                    "description" => draft.description = non_empty(text),
                    "duration_seconds" => draft.duration_seconds = text.trim().parse().ok(),
                    "source_author" => draft.source_author = non_empty(text),
                    "source_type" => draft.source_type = text.trim().parse().ok(),
                    "product_id" => draft.product_id = non_empty(text),
                    _ => {}
                }
            }
        }
    }

    let file = file
        .ok_or_else(|| AppError::InvalidInput("missing 'file' field in upload".to_string()))?;
    Ok((file, draft))
}

#[tracing::instrument(skip(state, multipart), fields(shop = %query.shop, operation = "upload_video"))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ShopQuery>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (file, draft) = read_fields(multipart).await?;
    let record = state.pipeline.start(&query.shop, file, draft).await?;
    Ok((StatusCode::CREATED, Json(VideoResponse::from(record))))
}
