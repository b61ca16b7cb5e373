//! Domain models

pub mod upload;
pub mod video;

pub use upload::{
    select_playable, AssetSource, AssetStatus, FilePayload, FormField, PlayableSources,
    RegisteredAsset, StagedTarget, StagedUploadRequest, UploadStage, UploadStatus,
};
pub use video::{NewVideo, SourceType, VideoRecord, VideoResponse};
