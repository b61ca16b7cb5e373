//! Media ingestion pipeline
//!
//! Drives one end-to-end attempt to turn a local video file into a persisted
//! storefront record: request a staged upload target, transfer the payload,
//! register the uploaded object as a managed asset, wait (bounded polling)
//! for transcoding, then commit the durable record. One session at a time;
//! every failure is terminal for its session.

pub mod finalizer;
pub mod pipeline;
pub mod poller;
pub mod sequence;
pub mod test_helpers;

pub use pipeline::{
    PipelineConfig, UploadEvent, UploadEventSender, UploadPipeline, VideoDraft,
};
pub use poller::ReadinessPoller;
pub use sequence::SequenceGate;
