//! Ingestion pipeline error types
//!
//! Every pipeline error is terminal for the session that raised it: the
//! session moves to its failed state, resets, and the error surfaces once to
//! the caller. No stage retries on its own.

use std::fmt;

use crate::error::AppError;

/// Why a byte transfer to the staged target failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferFailure {
    /// The storage endpoint answered with a non-2xx status.
    Status(u16),
    /// The request never completed (connection reset, DNS, timeout).
    Network(String),
}

impl fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferFailure::Status(code) => write!(f, "upload target returned status {}", code),
            TransferFailure::Network(msg) => write!(f, "network failure: {}", msg),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The local file failed validation; nothing was sent over the network.
    #[error("invalid upload: {0}")]
    Validation(String),

    /// The asset service reported a structured user error, or the call to it
    /// failed outright (network, timeout, non-2xx). Carries the remote
    /// message when one was available.
    #[error("asset service error: {0}")]
    RemoteService(String),

    /// The byte transfer to the staged target failed.
    #[error("transfer failed: {0}")]
    Transfer(TransferFailure),

    /// The polling ceiling was reached before the asset reported a playable
    /// source. The asset may still finish processing out-of-band.
    #[error("video processing timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// Another upload session is active; the request was rejected before any
    /// network call.
    #[error("an upload is already in progress")]
    SessionActive,

    /// Cancellation was observed at a checkpoint; no further remote call was
    /// issued for this session.
    #[error("upload cancelled")]
    Cancelled,

    /// The durable record commit failed. Terminal: the uploaded and
    /// registered remote asset is not rolled back.
    #[error("record commit failed: {0}")]
    Commit(#[source] AppError),
}

impl PipelineError {
    /// True when the failure was purely local and no remote side effect can
    /// exist (safe to re-invoke immediately).
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            PipelineError::Validation(_) | PipelineError::SessionActive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_failure_display() {
        assert_eq!(
            TransferFailure::Status(403).to_string(),
            "upload target returned status 403"
        );
        assert!(TransferFailure::Network("connection reset".into())
            .to_string()
            .contains("connection reset"));
    }

    #[test]
    fn timeout_reports_attempts() {
        let err = PipelineError::Timeout { attempts: 60 };
        assert!(err.to_string().contains("60"));
    }

    #[test]
    fn local_errors_are_flagged() {
        assert!(PipelineError::Validation("not a video".into()).is_local());
        assert!(PipelineError::SessionActive.is_local());
        assert!(!PipelineError::RemoteService("boom".into()).is_local());
        assert!(!PipelineError::Timeout { attempts: 60 }.is_local());
    }

    #[test]
    fn commit_preserves_source() {
        use std::error::Error;
        let err = PipelineError::Commit(AppError::Internal("pool exhausted".into()));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("record commit failed"));
    }
}
