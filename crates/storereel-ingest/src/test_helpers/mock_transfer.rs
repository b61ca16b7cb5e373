use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use storereel_core::models::{FilePayload, StagedTarget};
use storereel_core::{PipelineError, TransferFailure};
use storereel_platform::{ProgressFn, Transferer};

/// Scriptable transferer. By default it reports progress 0, 50, 100 and
/// succeeds.
pub struct MockTransferer {
    fail_status: Option<u16>,
    hold: Option<Arc<Notify>>,
    progress_steps: Vec<u8>,
    pub calls: AtomicUsize,
}

impl MockTransferer {
    pub fn new() -> Self {
        Self {
            fail_status: None,
            hold: None,
            progress_steps: vec![0, 50, 100],
            calls: AtomicUsize::new(0),
        }
    }

    /// The storage endpoint rejects the upload with this HTTP status.
    pub fn with_failure_status(mut self, status: u16) -> Self {
        self.fail_status = Some(status);
        self
    }

    /// Block inside `send` until the notify fires; lets tests observe an
    /// in-flight session.
    pub fn with_hold(mut self, hold: Arc<Notify>) -> Self {
        self.hold = Some(hold);
        self
    }
}

impl Default for MockTransferer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transferer for MockTransferer {
    async fn send(
        &self,
        _target: &StagedTarget,
        _payload: &FilePayload,
        on_progress: ProgressFn,
    ) -> Result<(), PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(hold) = &self.hold {
            hold.notified().await;
        }
        if let Some(status) = self.fail_status {
            return Err(PipelineError::Transfer(TransferFailure::Status(status)));
        }
        for percent in &self.progress_steps {
            on_progress(*percent);
        }
        Ok(())
    }
}
