//! In-memory video store
//!
//! Backs tests and database-less development runs. Same `sort_order` and
//! toggle semantics as the Postgres store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use storereel_core::models::{NewVideo, VideoRecord};
use storereel_core::AppError;

use crate::store::VideoStore;

#[derive(Clone, Default)]
pub struct MemoryVideoStore {
    videos: Arc<Mutex<HashMap<Uuid, VideoRecord>>>,
}

impl MemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.videos.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn create(&self, shop: &str, video: NewVideo) -> Result<VideoRecord, AppError> {
        let mut videos = self.videos.lock().unwrap();
        let next_sort = videos
            .values()
            .filter(|v| v.shop == shop)
            .map(|v| v.sort_order)
            .max()
            .unwrap_or(0)
            + 1;

        let now = Utc::now();
        let record = VideoRecord {
            id: Uuid::new_v4(),
            shop: shop.to_string(),
            title: video.title,
            description: video.description,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            duration_seconds: video.duration_seconds,
            source_author: video.source_author,
            source_type: video.source_type,
            product_id: video.product_id,
            sort_order: next_sort,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        videos.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_for_shop(&self, shop: &str) -> Result<Vec<VideoRecord>, AppError> {
        let videos = self.videos.lock().unwrap();
        let mut records: Vec<VideoRecord> = videos
            .values()
            .filter(|v| v.shop == shop)
            .cloned()
            .collect();
        records.sort_by_key(|v| v.sort_order);
        Ok(records)
    }

    async fn list_active_for_shop(&self, shop: &str) -> Result<Vec<VideoRecord>, AppError> {
        let mut records = self.list_for_shop(shop).await?;
        records.retain(|v| v.is_active);
        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        Ok(self.videos.lock().unwrap().get(&id).cloned())
    }

    async fn toggle_active(&self, id: Uuid) -> Result<VideoRecord, AppError> {
        let mut videos = self.videos.lock().unwrap();
        let record = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Video not found: {}", id)))?;
        record.is_active = !record.is_active;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.videos
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Video not found: {}", id)))
    }

    async fn max_sort_order(&self, shop: &str) -> Result<Option<i32>, AppError> {
        Ok(self
            .videos
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.shop == shop)
            .map(|v| v.sort_order)
            .max())
    }
}
