//! Domain methods for the asset service client.
//!
//! The service wraps results in envelopes that carry `user_errors` alongside
//! the payload; a populated `user_errors` list is surfaced as
//! [`PipelineError::RemoteService`] with the first message.

use async_trait::async_trait;
use serde::Deserialize;

use storereel_core::models::{AssetStatus, RegisteredAsset, StagedTarget, StagedUploadRequest};
use storereel_core::PipelineError;

use crate::PlatformClient;

/// API version prefix for the asset service.
pub const API_PREFIX: &str = "/api/v1";

/// Structured error reported by the asset service for a syntactically valid
/// but rejected request.
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct StagedUploadEnvelope {
    target: Option<StagedTarget>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

#[derive(Debug, Deserialize)]
struct RegisterEnvelope {
    asset: Option<RegisteredAsset>,
    #[serde(default)]
    user_errors: Vec<UserError>,
}

/// Remote operations of the asset service the ingestion pipeline depends on.
///
/// No retries at this layer; retry policy, if any, belongs to the caller.
#[async_trait]
pub trait AssetPlatform: Send + Sync {
    /// Obtain a short-lived upload target for a file of the given name, MIME
    /// type, and byte length.
    async fn request_staged_upload(
        &self,
        request: &StagedUploadRequest,
    ) -> Result<StagedTarget, PipelineError>;

    /// Register an uploaded object as a managed video asset. The returned
    /// asset may already carry processed sources.
    async fn register_asset(&self, resource_url: &str) -> Result<RegisteredAsset, PipelineError>;

    /// Query the transcoding status of a registered asset.
    async fn get_asset_status(&self, asset_id: &str) -> Result<AssetStatus, PipelineError>;
}

/// HTTP implementation of [`AssetPlatform`].
#[derive(Clone, Debug)]
pub struct HttpAssetPlatform {
    client: PlatformClient,
}

impl HttpAssetPlatform {
    pub fn new(client: PlatformClient) -> Self {
        Self { client }
    }
}

fn reject_user_errors(user_errors: &[UserError]) -> Result<(), PipelineError> {
    match user_errors.first() {
        Some(err) => Err(PipelineError::RemoteService(err.message.clone())),
        None => Ok(()),
    }
}

#[async_trait]
impl AssetPlatform for HttpAssetPlatform {
    async fn request_staged_upload(
        &self,
        request: &StagedUploadRequest,
    ) -> Result<StagedTarget, PipelineError> {
        let envelope: StagedUploadEnvelope = self
            .client
            .post_json(&format!("{}/staged-uploads", API_PREFIX), request)
            .await?;

        reject_user_errors(&envelope.user_errors)?;
        envelope.target.ok_or_else(|| {
            PipelineError::RemoteService("asset service returned no staged target".to_string())
        })
    }

    async fn register_asset(&self, resource_url: &str) -> Result<RegisteredAsset, PipelineError> {
        let body = serde_json::json!({ "resource_url": resource_url });
        let envelope: RegisterEnvelope = self
            .client
            .post_json(&format!("{}/assets", API_PREFIX), &body)
            .await?;

        reject_user_errors(&envelope.user_errors)?;
        envelope.asset.ok_or_else(|| {
            PipelineError::RemoteService("asset service returned no asset".to_string())
        })
    }

    async fn get_asset_status(&self, asset_id: &str) -> Result<AssetStatus, PipelineError> {
        self.client
            .get_json(&format!("{}/assets/{}", API_PREFIX, asset_id))
            .await
    }
}
