use async_trait::async_trait;
use storereel_core::models::{NewVideo, VideoRecord};
use storereel_core::AppError;
use uuid::Uuid;

/// Persistence seam for shop-scoped video records.
///
/// `create` owns `sort_order` assignment: one more than the shop's current
/// maximum, or 1 when the shop has no records. Deletion never renumbers the
/// remaining records.
#[async_trait]
pub trait VideoStore: Send + Sync {
    /// Create a record for a shop. New records are active.
    async fn create(&self, shop: &str, video: NewVideo) -> Result<VideoRecord, AppError>;

    /// All records for a shop, `sort_order` ascending.
    async fn list_for_shop(&self, shop: &str) -> Result<Vec<VideoRecord>, AppError>;

    /// Active records only, `sort_order` ascending (the storefront feed).
    async fn list_active_for_shop(&self, shop: &str) -> Result<Vec<VideoRecord>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError>;

    /// Flip `is_active` on exactly the targeted record.
    async fn toggle_active(&self, id: Uuid) -> Result<VideoRecord, AppError>;

    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Highest `sort_order` for a shop, `None` when the shop has no records.
    async fn max_sort_order(&self, shop: &str) -> Result<Option<i32>, AppError>;
}
