//! Upload pipeline models: the local payload handle, the staged-upload wire
//! shapes exchanged with the remote asset service, and the session stage set.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Handle to the local binary payload for one ingestion session.
///
/// Immutable for the session lifetime; the byte length is derived from the
/// payload itself.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FilePayload {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Filename with its final extension stripped; used as the default title
    /// when the operator did not enter one.
    pub fn title_stub(&self) -> &str {
        match self.filename.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.filename,
        }
    }
}

/// Parameters sent to the asset service when requesting a staged upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedUploadRequest {
    pub filename: String,
    pub mime_type: String,
    pub byte_size: u64,
}

/// One form field the staged target requires; order matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

/// A time-boxed, pre-authorized upload target returned by the asset service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedTarget {
    /// URL the multipart POST goes to.
    pub target_url: String,
    /// Identifier for the uploaded object, used for asset registration.
    pub resource_url: String,
    /// Form fields the storage endpoint requires, in the exact order they
    /// must appear in the multipart body.
    pub form_fields: Vec<FormField>,
}

/// One encoded variant of a processed video asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSource {
    pub url: String,
    pub mime_type: String,
}

/// Result of registering an uploaded object as a managed video asset.
///
/// `sources` may already be populated when the platform finished processing
/// synchronously; the session then skips polling entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredAsset {
    pub asset_id: String,
    #[serde(default)]
    pub sources: Vec<AssetSource>,
    pub thumbnail_url: Option<String>,
}

impl RegisteredAsset {
    pub fn playable(&self) -> Option<PlayableSources> {
        select_playable(&self.sources, self.thumbnail_url.clone())
    }
}

/// Snapshot of an asset's transcoding state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetStatus {
    #[serde(default)]
    pub sources: Vec<AssetSource>,
    pub thumbnail_url: Option<String>,
    /// Status string as reported by the platform (e.g. "PROCESSING").
    pub raw_status: Option<String>,
}

impl AssetStatus {
    pub fn playable(&self) -> Option<PlayableSources> {
        select_playable(&self.sources, self.thumbnail_url.clone())
    }
}

/// The resolved playable pair a session commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayableSources {
    pub video_url: String,
    pub thumbnail_url: Option<String>,
}

/// Pick the playable source from a set of encoded variants: the variant whose
/// MIME type is exactly `video/mp4` wins, otherwise the first in returned
/// order. Returns `None` when no variants exist yet.
pub fn select_playable(
    sources: &[AssetSource],
    thumbnail_url: Option<String>,
) -> Option<PlayableSources> {
    let chosen = sources
        .iter()
        .find(|s| s.mime_type == "video/mp4")
        .or_else(|| sources.first())?;
    Some(PlayableSources {
        video_url: chosen.url.clone(),
        thumbnail_url,
    })
}

/// Stages of an upload session. Transitions are monotonic along the happy
/// path; any stage may move directly to `Failed`; `Done` and `Failed` return
/// only to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStage {
    Idle,
    Staging,
    Transferring,
    Registering,
    Polling,
    Finalizing,
    Done,
    Failed,
}

impl UploadStage {
    /// A session in any working stage blocks new `start` calls.
    pub fn is_active(&self) -> bool {
        !matches!(
            self,
            UploadStage::Idle | UploadStage::Done | UploadStage::Failed
        )
    }
}

/// Discrete status tokens emitted for UI consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Staging,
    Uploading,
    Creating,
    Polling,
    Done,
    Failed,
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            UploadStatus::Staging => write!(f, "staging"),
            UploadStatus::Uploading => write!(f, "uploading"),
            UploadStatus::Creating => write!(f, "creating"),
            UploadStatus::Polling => write!(f, "polling"),
            UploadStatus::Done => write!(f, "done"),
            UploadStatus::Failed => write!(f, "failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(url: &str, mime: &str) -> AssetSource {
        AssetSource {
            url: url.to_string(),
            mime_type: mime.to_string(),
        }
    }

    #[test]
    fn title_stub_strips_final_extension() {
        let p = FilePayload::new("clip.mp4", "video/mp4", Bytes::from_static(b"x"));
        assert_eq!(p.title_stub(), "clip");

        let p = FilePayload::new("clip.v2.final.mov", "video/quicktime", Bytes::new());
        assert_eq!(p.title_stub(), "clip.v2.final");

        let p = FilePayload::new("noextension", "video/mp4", Bytes::new());
        assert_eq!(p.title_stub(), "noextension");

        // hidden-file style name keeps its full form
        let p = FilePayload::new(".webm", "video/webm", Bytes::new());
        assert_eq!(p.title_stub(), ".webm");
    }

    #[test]
    fn select_playable_prefers_exact_mp4() {
        let sources = vec![
            src("https://cdn/v.webm", "video/webm"),
            src("https://cdn/v.mp4", "video/mp4"),
        ];
        let picked = select_playable(&sources, Some("https://cdn/t.jpg".into())).unwrap();
        assert_eq!(picked.video_url, "https://cdn/v.mp4");
        assert_eq!(picked.thumbnail_url.as_deref(), Some("https://cdn/t.jpg"));
    }

    #[test]
    fn select_playable_falls_back_to_first_variant() {
        let sources = vec![
            src("https://cdn/v.webm", "video/webm"),
            src("https://cdn/v.mov", "video/quicktime"),
        ];
        let picked = select_playable(&sources, None).unwrap();
        assert_eq!(picked.video_url, "https://cdn/v.webm");
    }

    #[test]
    fn select_playable_ignores_mp4_prefix_lookalikes() {
        // only the exact type wins the preference rule
        let sources = vec![
            src("https://cdn/a", "video/mp4; codecs=avc1"),
            src("https://cdn/b", "video/mp4"),
        ];
        let picked = select_playable(&sources, None).unwrap();
        assert_eq!(picked.video_url, "https://cdn/b");
    }

    #[test]
    fn select_playable_empty_is_none() {
        assert!(select_playable(&[], None).is_none());
    }

    #[test]
    fn working_stages_are_active() {
        assert!(!UploadStage::Idle.is_active());
        assert!(!UploadStage::Done.is_active());
        assert!(!UploadStage::Failed.is_active());
        for stage in [
            UploadStage::Staging,
            UploadStage::Transferring,
            UploadStage::Registering,
            UploadStage::Polling,
            UploadStage::Finalizing,
        ] {
            assert!(stage.is_active());
        }
    }

    #[test]
    fn status_tokens_render_lowercase() {
        assert_eq!(UploadStatus::Staging.to_string(), "staging");
        assert_eq!(UploadStatus::Uploading.to_string(), "uploading");
        assert_eq!(UploadStatus::Creating.to_string(), "creating");
        assert_eq!(UploadStatus::Polling.to_string(), "polling");
        assert_eq!(UploadStatus::Done.to_string(), "done");
        assert_eq!(UploadStatus::Failed.to_string(), "failed");
        assert_eq!(
            serde_json::to_string(&UploadStatus::Uploading).unwrap(),
            "\"uploading\""
        );
    }
}
