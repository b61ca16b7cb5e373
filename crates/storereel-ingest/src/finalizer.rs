//! Record finalizer
//!
//! Commits the durable record once a playable URL is known. This is the
//! single point after which a session counts as done; a store failure here is
//! terminal and the already-uploaded remote asset is not rolled back.

use storereel_core::models::{FilePayload, NewVideo, PlayableSources, VideoRecord};
use storereel_core::PipelineError;
use storereel_db::VideoStore;

use crate::pipeline::VideoDraft;

pub async fn commit(
    store: &dyn VideoStore,
    shop: &str,
    file: &FilePayload,
    draft: VideoDraft,
    playable: PlayableSources,
) -> Result<VideoRecord, PipelineError> {
    let title = draft
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| file.title_stub().to_string());

    let record = store
        .create(
            shop,
            NewVideo {
                title,
                description: draft.description,
                video_url: playable.video_url,
                thumbnail_url: playable.thumbnail_url,
                duration_seconds: draft.duration_seconds,
                source_author: draft.source_author,
                source_type: draft.source_type,
                product_id: draft.product_id,
            },
        )
        .await
        .map_err(PipelineError::Commit)?;

    tracing::info!(
        video_id = %record.id,
        shop,
        sort_order = record.sort_order,
        "video record committed"
    );
    Ok(record)
}
