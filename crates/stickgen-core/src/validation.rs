//! Upload input validation.
//!
//! Mirrors the backend's allowlist so obviously rejected files never leave
//! the client.

use crate::error::ClientError;

/// Content types the backend accepts for upload.
pub const ALLOWED_UPLOAD_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "video/mp4"];

/// Validate a content type against the upload allowlist.
pub fn validate_upload_content_type(content_type: &str) -> Result<(), ClientError> {
    if ALLOWED_UPLOAD_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(ClientError::InvalidInput(
            "File type not allowed. Please upload an image or video file.".to_string(),
        ))
    }
}

/// Validate a bare filename: non-empty and without path separators. Used
/// for both upload selections and local save targets.
pub fn validate_filename(filename: &str) -> Result<(), ClientError> {
    if filename.trim().is_empty() {
        return Err(ClientError::InvalidInput(
            "Filename must not be empty".to_string(),
        ));
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err(ClientError::InvalidInput(format!(
            "Invalid filename: {}",
            filename
        )));
    }
    Ok(())
}
