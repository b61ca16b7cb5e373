//! Readiness polling
//!
//! Bounded periodic querying of an asset's transcoding status: a fixed
//! interval with an initial delay of the same length (the poller never
//! queries immediately after registration), a hard attempt ceiling, and
//! cooperative cancellation checked before each round is scheduled and
//! before a round's result is acted on. An in-flight query is never aborted;
//! its result is discarded when cancellation landed meanwhile.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use storereel_core::models::PlayableSources;
use storereel_core::PipelineError;
use storereel_platform::AssetPlatform;

use crate::sequence::SequenceGate;

pub struct ReadinessPoller {
    interval: Duration,
    max_attempts: u32,
}

impl ReadinessPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Poll until the asset reports a playable source, the attempt ceiling
    /// is reached (`Timeout`), a transport error surfaces (`RemoteService`,
    /// not retried), or cancellation is observed (`Cancelled`).
    pub async fn wait_for_sources(
        &self,
        platform: &dyn AssetPlatform,
        asset_id: &str,
        cancel: &CancellationToken,
    ) -> Result<PlayableSources, PipelineError> {
        let mut gate = SequenceGate::new();
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            tokio::time::sleep(self.interval).await;
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }

            attempt += 1;
            let seq = gate.issue();
            let status = platform.get_asset_status(asset_id).await?;

            // discard the in-flight result when cancellation landed mid-round
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }

            if gate.accept(seq) {
                tracing::debug!(
                    asset_id,
                    attempt,
                    raw_status = ?status.raw_status,
                    "asset status checked"
                );
                if let Some(playable) = status.playable() {
                    tracing::info!(asset_id, attempt, "asset reported playable sources");
                    return Ok(playable);
                }
            }

            if attempt >= self.max_attempts {
                tracing::warn!(asset_id, attempt, "polling ceiling reached");
                return Err(PipelineError::Timeout { attempts: attempt });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockPlatform, StatusScript};
    use std::sync::atomic::Ordering;

    const INTERVAL: Duration = Duration::from_millis(3000);

    fn poller() -> ReadinessPoller {
        ReadinessPoller::new(INTERVAL, 60)
    }

    #[tokio::test(start_paused = true)]
    async fn first_query_waits_the_initial_delay() {
        let platform = MockPlatform::new().with_statuses(vec![StatusScript::Ready {
            video_url: "https://cdn/v.mp4".into(),
            thumbnail_url: None,
        }]);
        let cancel = CancellationToken::new();

        let started = tokio::time::Instant::now();
        let playable = poller()
            .wait_for_sources(&platform, "asset-1", &cancel)
            .await
            .unwrap();

        assert_eq!(playable.video_url, "https://cdn/v.mp4");
        assert_eq!(platform.status_calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() >= INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn resolves_on_second_round() {
        let platform = MockPlatform::new().with_statuses(vec![
            StatusScript::Processing,
            StatusScript::Ready {
                video_url: "https://cdn/v.mp4".into(),
                thumbnail_url: Some("https://cdn/t.jpg".into()),
            },
        ]);
        let cancel = CancellationToken::new();

        let started = tokio::time::Instant::now();
        let playable = poller()
            .wait_for_sources(&platform, "asset-1", &cancel)
            .await
            .unwrap();

        assert_eq!(platform.status_calls.load(Ordering::SeqCst), 2);
        assert_eq!(playable.thumbnail_url.as_deref(), Some("https://cdn/t.jpg"));
        assert!(started.elapsed() >= INTERVAL * 2);
    }

    #[tokio::test(start_paused = true)]
    async fn ceiling_yields_timeout_after_sixty_rounds() {
        let platform = MockPlatform::new(); // never ready
        let cancel = CancellationToken::new();

        let err = poller()
            .wait_for_sources(&platform, "asset-1", &cancel)
            .await
            .unwrap_err();

        match err {
            PipelineError::Timeout { attempts } => assert_eq!(attempts, 60),
            other => panic!("expected Timeout, got {:?}", other),
        }
        assert_eq!(platform.status_calls.load(Ordering::SeqCst), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_surfaces_immediately() {
        let platform = MockPlatform::new().with_statuses(vec![StatusScript::TransportError(
            "connection reset".into(),
        )]);
        let cancel = CancellationToken::new();

        let err = poller()
            .wait_for_sources(&platform, "asset-1", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::RemoteService(_)));
        assert_eq!(platform.status_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_before_the_first_round_issues_no_query() {
        let platform = MockPlatform::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = poller()
            .wait_for_sources(&platform, "asset-1", &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Cancelled));
        assert_eq!(platform.status_calls.load(Ordering::SeqCst), 0);
    }
}
