//! HTTP client for the remote asset service.
//!
//! Provides a minimal client with configurable auth (Bearer token or
//! X-API-Key), JSON GET/POST helpers that map transport failures to
//! [`PipelineError::RemoteService`], and the domain seams the ingestion
//! pipeline depends on: [`AssetPlatform`] and [`Transferer`].

pub mod api;
pub mod transfer;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use storereel_core::PipelineError;

pub use api::{AssetPlatform, HttpAssetPlatform};
pub use transfer::{HttpTransferer, ProgressFn, Transferer};

/// Authentication strategy for the asset service.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

/// Shared HTTP client for the asset service.
#[derive(Clone, Debug)]
pub struct PlatformClient {
    client: Client,
    base_url: String,
    auth: Option<Auth>,
}

impl PlatformClient {
    pub fn new(base_url: String, auth: Option<Auth>) -> Result<Self, anyhow::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Some(Auth::Bearer(token)) => {
                request.header("Authorization", format!("Bearer {}", token))
            }
            Some(Auth::XApiKey(key)) => request.header("X-API-Key", key.as_str()),
            None => request,
        }
    }

    /// Raw client, shared with the transferer.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GET request, deserializing the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, PipelineError> {
        let request = self.apply_auth(self.client.get(self.build_url(path)));
        Self::read_json(request.send().await).await
    }

    /// POST a JSON body, deserializing the JSON response.
    pub(crate) async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PipelineError> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).json(body));
        Self::read_json(request.send().await).await
    }

    async fn read_json<T: DeserializeOwned>(
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<T, PipelineError> {
        let response =
            result.map_err(|e| PipelineError::RemoteService(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::RemoteService(format!(
                "asset service returned status {}: {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            PipelineError::RemoteService(format!("unexpected response from asset service: {}", e))
        })
    }
}
