use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Where a short-form clip originally came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum SourceType {
    TikTok,
    Instagram,
    YouTube,
    Original,
}

impl Display for SourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            SourceType::TikTok => write!(f, "TikTok"),
            SourceType::Instagram => write!(f, "Instagram"),
            SourceType::YouTube => write!(f, "YouTube"),
            SourceType::Original => write!(f, "Original"),
        }
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TikTok" => Ok(SourceType::TikTok),
            "Instagram" => Ok(SourceType::Instagram),
            "YouTube" => Ok(SourceType::YouTube),
            "Original" => Ok(SourceType::Original),
            other => Err(format!("unknown source type: {}", other)),
        }
    }
}

/// A shop-scoped storefront video record.
///
/// `sort_order` is assigned at creation (shop max + 1, or 1 for an empty
/// shop) and never renumbered afterwards, including on delete.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub id: Uuid,
    pub shop: String,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub source_author: Option<String>,
    pub source_type: Option<SourceType>,
    pub product_id: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a record. `sort_order` and `is_active` are assigned
/// by the store (new records are active).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<i32>,
    pub source_author: Option<String>,
    pub source_type: Option<SourceType>,
    pub product_id: Option<String>,
}

/// API-facing shape of a video record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<VideoRecord> for VideoResponse {
    fn from(record: VideoRecord) -> Self {
        VideoResponse {
            id: record.id,
            title: record.title,
            description: record.description,
            video_url: record.video_url,
            thumbnail_url: record.thumbnail_url,
            duration_seconds: record.duration_seconds,
            source_author: record.source_author,
            source_type: record.source_type,
            product_id: record.product_id,
            sort_order: record.sort_order,
            is_active: record.is_active,
            created_at: record.created_at,
        }
    }
}
