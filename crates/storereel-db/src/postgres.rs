use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;
use uuid::Uuid;

use storereel_core::models::{NewVideo, SourceType, VideoRecord};
use storereel_core::AppError;

use crate::store::VideoStore;

const MAX_CONNECTIONS: u32 = 20;
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Postgres-backed video store.
#[derive(Clone)]
pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and run pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("migration failed: {}", e)))?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// Use dynamic SQLx queries to avoid requiring DATABASE_URL/sqlx prepare
fn map_row(row: &PgRow) -> Result<VideoRecord, sqlx::Error> {
    let source_type: Option<String> = row.try_get("source_type")?;
    Ok(VideoRecord {
        id: row.try_get("id")?,
        shop: row.try_get("shop")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        video_url: row.try_get("video_url")?,
        thumbnail_url: row.try_get("thumbnail_url")?,
        duration_seconds: row.try_get("duration_seconds")?,
        source_author: row.try_get("source_author")?,
        source_type: source_type.and_then(|s| s.parse::<SourceType>().ok()),
        product_id: row.try_get("product_id")?,
        sort_order: row.try_get("sort_order")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl VideoStore for PgVideoStore {
    async fn create(&self, shop: &str, video: NewVideo) -> Result<VideoRecord, AppError> {
        // sort_order is assigned inside the INSERT so concurrent creates for
        // the same shop cannot observe the same maximum.
        let row = sqlx::query(
            r#"
            INSERT INTO videos (
                id, shop, title, description, video_url, thumbnail_url,
                duration_seconds, source_author, source_type, product_id,
                sort_order, is_active, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                (SELECT COALESCE(MAX(sort_order), 0) + 1 FROM videos WHERE shop = $2),
                TRUE, NOW(), NOW()
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(shop)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.video_url)
        .bind(&video.thumbnail_url)
        .bind(video.duration_seconds)
        .bind(&video.source_author)
        .bind(video.source_type.map(|s| s.to_string()))
        .bind(&video.product_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_row(&row)?)
    }

    async fn list_for_shop(&self, shop: &str) -> Result<Vec<VideoRecord>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM videos
            WHERE shop = $1
            ORDER BY sort_order ASC
            "#,
        )
        .bind(shop)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| map_row(r).map_err(AppError::from))
            .collect()
    }

    async fn list_active_for_shop(&self, shop: &str) -> Result<Vec<VideoRecord>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM videos
            WHERE shop = $1 AND is_active = TRUE
            ORDER BY sort_order ASC
            "#,
        )
        .bind(shop)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|r| map_row(r).map_err(AppError::from))
            .collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<VideoRecord>, AppError> {
        let row = sqlx::query("SELECT * FROM videos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row).transpose().map_err(AppError::from)
    }

    async fn toggle_active(&self, id: Uuid) -> Result<VideoRecord, AppError> {
        let row = sqlx::query(
            r#"
            UPDATE videos
            SET is_active = NOT is_active, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video not found: {}", id)))?;

        Ok(map_row(&row)?)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video not found: {}", id)));
        }
        Ok(())
    }

    async fn max_sort_order(&self, shop: &str) -> Result<Option<i32>, AppError> {
        let row = sqlx::query("SELECT MAX(sort_order) AS max_sort FROM videos WHERE shop = $1")
            .bind(shop)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("max_sort")?)
    }
}
