//! Upload session state machine
//!
//! [`UploadPipeline`] owns the session state and drives the stages strictly
//! in sequence: Staging → Transferring → Registering → [Polling]* →
//! Finalizing. Polling is skipped when registration already reports playable
//! sources. The pipeline enforces single-flight with a reject-on-entry
//! guard, independent of any caller lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use storereel_core::models::{
    FilePayload, SourceType, StagedUploadRequest, UploadStage, UploadStatus, VideoRecord,
};
use storereel_core::{validation, Config, PipelineError};
use storereel_db::VideoStore;
use storereel_platform::{AssetPlatform, ProgressFn, Transferer};

use crate::finalizer;
use crate::poller::ReadinessPoller;

/// Notification emitted while a session runs: a discrete status token, or a
/// transfer progress percentage (only during the transferring stage).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadEvent {
    Status(UploadStatus),
    Progress(u8),
}

pub type UploadEventSender = mpsc::UnboundedSender<UploadEvent>;

/// Limits and timing for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_upload_bytes: u64,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: validation::MAX_UPLOAD_BYTES,
            poll_interval: Duration::from_millis(3000),
            max_poll_attempts: 60,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_poll_attempts: config.max_poll_attempts,
        }
    }
}

/// Operator-entered metadata accompanying an upload. A missing title falls
/// back to the file name with its extension stripped.
#[derive(Debug, Clone, Default)]
pub struct VideoDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_seconds: Option<i32>,
    pub source_author: Option<String>,
    pub source_type: Option<SourceType>,
    pub product_id: Option<String>,
}

pub struct UploadPipeline {
    platform: Arc<dyn AssetPlatform>,
    transferer: Arc<dyn Transferer>,
    store: Arc<dyn VideoStore>,
    config: PipelineConfig,
    events: Option<UploadEventSender>,
    active: AtomicBool,
    stage: Mutex<UploadStage>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl UploadPipeline {
    pub fn new(
        platform: Arc<dyn AssetPlatform>,
        transferer: Arc<dyn Transferer>,
        store: Arc<dyn VideoStore>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            platform,
            transferer,
            store,
            config,
            events: None,
            active: AtomicBool::new(false),
            stage: Mutex::new(UploadStage::Idle),
            cancel: Mutex::new(None),
        }
    }

    /// Attach an event sink receiving status tokens and transfer progress.
    pub fn with_events(mut self, events: UploadEventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn current_stage(&self) -> UploadStage {
        *self.stage.lock().unwrap()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Signal cooperative cancellation to the active session, if any. The
    /// flag is honored at the polling checkpoints; an already-dispatched
    /// network call is not aborted, its result is discarded.
    pub fn cancel_active(&self) {
        if let Some(token) = self.cancel.lock().unwrap().as_ref() {
            token.cancel();
        }
    }

    /// Run one full ingestion session. Local validation runs before the
    /// single-flight guard is taken, so repeated invalid input never blocks
    /// and never reaches the network. A second call while a session is
    /// active fails synchronously with `SessionActive`.
    pub async fn start(
        &self,
        shop: &str,
        file: FilePayload,
        draft: VideoDraft,
    ) -> Result<VideoRecord, PipelineError> {
        validation::validate_upload(&file, self.config.max_upload_bytes)?;

        let _guard = SessionGuard::acquire(self)?;
        let cancel = CancellationToken::new();
        *self.cancel.lock().unwrap() = Some(cancel.clone());

        tracing::info!(
            shop,
            filename = %file.filename,
            bytes = file.byte_size(),
            "upload session started"
        );

        let result = self.run(shop, &file, draft, &cancel).await;
        match &result {
            Ok(record) => {
                self.set_stage(UploadStage::Done);
                self.emit(UploadEvent::Status(UploadStatus::Done));
                tracing::info!(shop, video_id = %record.id, "upload session finished");
            }
            Err(e) => {
                self.set_stage(UploadStage::Failed);
                self.emit(UploadEvent::Status(UploadStatus::Failed));
                tracing::warn!(shop, error = %e, "upload session failed");
            }
        }
        // guard drop resets the session to Idle
        result
    }

    async fn run(
        &self,
        shop: &str,
        file: &FilePayload,
        draft: VideoDraft,
        cancel: &CancellationToken,
    ) -> Result<VideoRecord, PipelineError> {
        self.enter(UploadStage::Staging, UploadStatus::Staging);
        let target = self
            .platform
            .request_staged_upload(&StagedUploadRequest {
                filename: file.filename.clone(),
                mime_type: file.content_type.clone(),
                byte_size: file.byte_size(),
            })
            .await?;

        self.enter(UploadStage::Transferring, UploadStatus::Uploading);
        self.transferer
            .send(&target, file, self.progress_fn())
            .await?;

        self.enter(UploadStage::Registering, UploadStatus::Creating);
        let registered = self.platform.register_asset(&target.resource_url).await?;

        let playable = match registered.playable() {
            // processed synchronously: the polling phase is never entered
            Some(playable) => playable,
            None => {
                self.enter(UploadStage::Polling, UploadStatus::Polling);
                let poller =
                    ReadinessPoller::new(self.config.poll_interval, self.config.max_poll_attempts);
                poller
                    .wait_for_sources(self.platform.as_ref(), &registered.asset_id, cancel)
                    .await?
            }
        };

        self.set_stage(UploadStage::Finalizing);
        finalizer::commit(self.store.as_ref(), shop, file, draft, playable).await
    }

    fn progress_fn(&self) -> ProgressFn {
        match &self.events {
            Some(tx) => {
                let tx = tx.clone();
                Arc::new(move |percent| {
                    let _ = tx.send(UploadEvent::Progress(percent));
                })
            }
            None => Arc::new(|_| {}),
        }
    }

    fn enter(&self, stage: UploadStage, status: UploadStatus) {
        self.set_stage(stage);
        self.emit(UploadEvent::Status(status));
    }

    fn set_stage(&self, stage: UploadStage) {
        *self.stage.lock().unwrap() = stage;
    }

    fn emit(&self, event: UploadEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

/// Single-flight guard. Acquired after local validation, released (back to
/// `Idle`) when the session ends, on every path.
struct SessionGuard<'a> {
    pipeline: &'a UploadPipeline,
}

impl<'a> SessionGuard<'a> {
    fn acquire(pipeline: &'a UploadPipeline) -> Result<Self, PipelineError> {
        if pipeline
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PipelineError::SessionActive);
        }
        Ok(Self { pipeline })
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        *self.pipeline.cancel.lock().unwrap() = None;
        self.pipeline.set_stage(UploadStage::Idle);
        self.pipeline.active.store(false, Ordering::SeqCst);
    }
}
