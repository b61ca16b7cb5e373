//! Local upload validation
//!
//! These checks run before any guard is taken or network call issued, and
//! they are idempotent: repeated invalid input never reaches the network.

use crate::models::FilePayload;
use crate::pipeline_error::PipelineError;

/// Hard ceiling on upload payload size: 250 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 250 * 1024 * 1024;

/// Accepted MIME type prefix for uploads.
pub const VIDEO_MIME_PREFIX: &str = "video/";

/// The MIME type must begin with `video/`.
pub fn validate_mime_type(content_type: &str) -> Result<(), PipelineError> {
    if content_type.starts_with(VIDEO_MIME_PREFIX) {
        Ok(())
    } else {
        Err(PipelineError::Validation(format!(
            "unsupported content type '{}': expected a video/* file",
            content_type
        )))
    }
}

/// The payload must not exceed `max_bytes`.
pub fn validate_byte_size(byte_size: u64, max_bytes: u64) -> Result<(), PipelineError> {
    if byte_size <= max_bytes {
        Ok(())
    } else {
        Err(PipelineError::Validation(format!(
            "file size {} bytes exceeds the {} byte limit",
            byte_size, max_bytes
        )))
    }
}

/// Validate a payload against both local constraints.
pub fn validate_upload(payload: &FilePayload, max_bytes: u64) -> Result<(), PipelineError> {
    validate_mime_type(&payload.content_type)?;
    validate_byte_size(payload.byte_size(), max_bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn video_mime_types_pass() {
        for mime in ["video/mp4", "video/quicktime", "video/webm", "video/x-m4v"] {
            assert!(validate_mime_type(mime).is_ok());
        }
    }

    #[test]
    fn non_video_mime_types_fail() {
        for mime in ["image/png", "audio/mp4", "application/octet-stream", "", "video"] {
            let err = validate_mime_type(mime).unwrap_err();
            assert!(matches!(err, PipelineError::Validation(_)));
        }
    }

    #[test]
    fn byte_ceiling_is_inclusive() {
        assert!(validate_byte_size(MAX_UPLOAD_BYTES, MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_byte_size(MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES).is_err());
        assert!(validate_byte_size(0, MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn validate_upload_checks_both_constraints() {
        let ok = FilePayload::new("a.mp4", "video/mp4", Bytes::from_static(b"data"));
        assert!(validate_upload(&ok, MAX_UPLOAD_BYTES).is_ok());

        let wrong_type = FilePayload::new("a.png", "image/png", Bytes::from_static(b"data"));
        assert!(validate_upload(&wrong_type, MAX_UPLOAD_BYTES).is_err());

        let too_big = FilePayload::new("a.mp4", "video/mp4", Bytes::from(vec![0u8; 16]));
        assert!(validate_upload(&too_big, 15).is_err());
    }

    #[test]
    fn repeated_validation_is_stable() {
        let bad = FilePayload::new("a.png", "image/png", Bytes::new());
        for _ in 0..3 {
            assert!(validate_upload(&bad, MAX_UPLOAD_BYTES).is_err());
        }
    }
}
