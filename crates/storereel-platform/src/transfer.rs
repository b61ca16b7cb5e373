//! Byte transfer to the staged upload target.
//!
//! One multipart POST: the staging form fields as text parts in the exact
//! order the asset service returned them, then the raw payload as the
//! terminal `file` part. The payload streams in fixed-size chunks so progress
//! can be reported proportionally to the bytes handed to the transport.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use std::sync::Arc;

use storereel_core::models::{FilePayload, StagedTarget};
use storereel_core::{PipelineError, TransferFailure};

/// Chunk size for the streaming request body.
const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Progress callback: cumulative percent of bytes sent, 0-100,
/// monotonically non-decreasing.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Transfers a payload to a staged target. The only stage allowed to report
/// sub-stage progress percentages.
#[async_trait]
pub trait Transferer: Send + Sync {
    async fn send(
        &self,
        target: &StagedTarget,
        payload: &FilePayload,
        on_progress: ProgressFn,
    ) -> Result<(), PipelineError>;
}

/// HTTP implementation of [`Transferer`].
#[derive(Clone, Debug)]
pub struct HttpTransferer {
    client: Client,
}

impl HttpTransferer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransferer {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

/// Split the payload into chunks paired with the cumulative percentage that
/// is complete once the chunk has been handed to the transport.
fn progress_chunks(bytes: &Bytes, chunk_size: usize) -> Vec<(Bytes, u8)> {
    let total = bytes.len();
    if total == 0 {
        return Vec::new();
    }
    let mut chunks = Vec::with_capacity(total.div_ceil(chunk_size));
    let mut offset = 0;
    while offset < total {
        let end = (offset + chunk_size).min(total);
        let percent = (end as u64 * 100 / total as u64) as u8;
        chunks.push((bytes.slice(offset..end), percent));
        offset = end;
    }
    chunks
}

#[async_trait]
impl Transferer for HttpTransferer {
    async fn send(
        &self,
        target: &StagedTarget,
        payload: &FilePayload,
        on_progress: ProgressFn,
    ) -> Result<(), PipelineError> {
        on_progress(0);

        let mut form = Form::new();
        for field in &target.form_fields {
            form = form.text(field.name.clone(), field.value.clone());
        }

        let total = payload.byte_size();
        let chunks = progress_chunks(&payload.bytes, UPLOAD_CHUNK_BYTES);
        let progress = on_progress.clone();
        let stream = futures_util::stream::iter(chunks.into_iter().map(move |(chunk, percent)| {
            // called as the transport pulls each chunk off the body
            progress(percent);
            Ok::<Bytes, std::io::Error>(chunk)
        }));

        let part = Part::stream_with_length(Body::wrap_stream(stream), total)
            .file_name(payload.filename.clone())
            .mime_str(&payload.content_type)
            .map_err(|e| PipelineError::Validation(format!("invalid content type: {}", e)))?;
        form = form.part("file", part);

        tracing::debug!(
            target_url = %target.target_url,
            bytes = total,
            "uploading payload to staged target"
        );

        let response = self
            .client
            .post(&target.target_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PipelineError::Transfer(TransferFailure::Network(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Transfer(TransferFailure::Status(
                status.as_u16(),
            )));
        }

        on_progress(100);
        Ok(())
    }
}
