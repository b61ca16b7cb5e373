use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use storereel_core::models::{
    AssetSource, AssetStatus, FormField, RegisteredAsset, StagedTarget, StagedUploadRequest,
};
use storereel_core::PipelineError;
use storereel_platform::AssetPlatform;

/// Scripted outcome of one status poll. When the script runs out the asset
/// keeps reporting "processing".
#[derive(Debug, Clone)]
pub enum StatusScript {
    Processing,
    Ready {
        video_url: String,
        thumbnail_url: Option<String>,
    },
    TransportError(String),
}

/// Scriptable asset service.
pub struct MockPlatform {
    staging_error: Option<String>,
    register_sources: Vec<AssetSource>,
    register_thumbnail: Option<String>,
    statuses: Mutex<VecDeque<StatusScript>>,
    pub staged_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
}

impl MockPlatform {
    /// Staging succeeds, registration returns an unprocessed asset, every
    /// poll reports "processing".
    pub fn new() -> Self {
        Self {
            staging_error: None,
            register_sources: Vec::new(),
            register_thumbnail: None,
            statuses: Mutex::new(VecDeque::new()),
            staged_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
        }
    }

    /// Staging reports a structured user error.
    pub fn with_staging_error(mut self, message: &str) -> Self {
        self.staging_error = Some(message.to_string());
        self
    }

    /// Registration returns already-processed sources.
    pub fn with_register_sources(
        mut self,
        sources: Vec<AssetSource>,
        thumbnail_url: Option<&str>,
    ) -> Self {
        self.register_sources = sources;
        self.register_thumbnail = thumbnail_url.map(String::from);
        self
    }

    /// Script the poll outcomes, consumed in order.
    pub fn with_statuses(self, scripts: Vec<StatusScript>) -> Self {
        *self.statuses.lock().unwrap() = scripts.into();
        self
    }

    pub fn staged_target() -> StagedTarget {
        StagedTarget {
            target_url: "https://storage.example.com/tmp/upload-1".to_string(),
            resource_url: "https://storage.example.com/files/upload-1".to_string(),
            form_fields: vec![
                FormField {
                    name: "key".to_string(),
                    value: "tmp/upload-1".to_string(),
                },
                FormField {
                    name: "policy".to_string(),
                    value: "signed-policy".to_string(),
                },
            ],
        }
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssetPlatform for MockPlatform {
    async fn request_staged_upload(
        &self,
        _request: &StagedUploadRequest,
    ) -> Result<StagedTarget, PipelineError> {
        self.staged_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.staging_error {
            return Err(PipelineError::RemoteService(message.clone()));
        }
        Ok(Self::staged_target())
    }

    async fn register_asset(&self, _resource_url: &str) -> Result<RegisteredAsset, PipelineError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        Ok(RegisteredAsset {
            asset_id: "asset-1".to_string(),
            sources: self.register_sources.clone(),
            thumbnail_url: self.register_thumbnail.clone(),
        })
    }

    async fn get_asset_status(&self, _asset_id: &str) -> Result<AssetStatus, PipelineError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let script = self
            .statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(StatusScript::Processing);
        match script {
            StatusScript::Processing => Ok(AssetStatus {
                sources: Vec::new(),
                thumbnail_url: None,
                raw_status: Some("PROCESSING".to_string()),
            }),
            StatusScript::Ready {
                video_url,
                thumbnail_url,
            } => Ok(AssetStatus {
                sources: vec![AssetSource {
                    url: video_url,
                    mime_type: "video/mp4".to_string(),
                }],
                thumbnail_url,
                raw_status: Some("READY".to_string()),
            }),
            StatusScript::TransportError(message) => Err(PipelineError::RemoteService(message)),
        }
    }
}
