//! Error types module
//!
//! This module provides the core error types used throughout the StickGen
//! client. All failures are unified under the `ClientError` enum: auth
//! gating, gallery reads, payload decoding, uploads, and the clipboard leg
//! of the share action.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like transient network failures
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error presentation - defines how an error should surface to
/// the user. Every failure carries a user-visible message; nothing is
/// swallowed silently.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g. "FETCH_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (the operation can be retried)
    fn is_recoverable(&self) -> bool;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No session, expired session, or session resolution failure. All
    /// three fail closed: the caller redirects to login and aborts.
    #[error("Not authenticated")]
    AuthMissing,

    /// Network error or non-2xx response on a read endpoint.
    #[error("Fetch failed{}: {message}", status.map(|s| format!(" ({})", s)).unwrap_or_default())]
    FetchFailed {
        status: Option<u16>,
        message: String,
    },

    /// Malformed base64 payload. No partial file is produced.
    #[error("Failed to decode media payload: {0}")]
    DecodeFailed(String),

    /// Upload rejected by the backend. Carries the backend's `detail`
    /// verbatim when present, otherwise a generic message.
    #[error("Upload failed: {0}")]
    UploadRejected(String),

    /// Clipboard copy failed. Independent of share-link construction.
    #[error("Failed to copy to clipboard: {0}")]
    ClipboardFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::FetchFailed {
            status: None,
            message: format!("JSON parsing error: {}", err),
        }
    }
}

impl From<base64::DecodeError> for ClientError {
    fn from(err: base64::DecodeError) -> Self {
        ClientError::DecodeFailed(err.to_string())
    }
}

impl From<uuid::Error> for ClientError {
    fn from(err: uuid::Error) -> Self {
        ClientError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, log_level).
/// client_message stays per-variant for dynamic content.
fn client_error_static_metadata(err: &ClientError) -> (&'static str, bool, LogLevel) {
    match err {
        ClientError::AuthMissing => ("AUTH_MISSING", false, LogLevel::Debug),
        ClientError::FetchFailed { .. } => ("FETCH_FAILED", true, LogLevel::Warn),
        ClientError::DecodeFailed(_) => ("DECODE_FAILED", false, LogLevel::Warn),
        ClientError::UploadRejected(_) => ("UPLOAD_REJECTED", true, LogLevel::Warn),
        ClientError::ClipboardFailed(_) => ("CLIPBOARD_FAILED", true, LogLevel::Warn),
        ClientError::InvalidInput(_) => ("INVALID_INPUT", false, LogLevel::Debug),
        ClientError::Internal(_) => ("INTERNAL_ERROR", true, LogLevel::Error),
        ClientError::InternalWithSource { .. } => ("INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl ClientError {
    /// Get the error type name for diagnostics
    pub fn error_type(&self) -> &str {
        match self {
            ClientError::AuthMissing => "AuthMissing",
            ClientError::FetchFailed { .. } => "FetchFailed",
            ClientError::DecodeFailed(_) => "DecodeFailed",
            ClientError::UploadRejected(_) => "UploadRejected",
            ClientError::ClipboardFailed(_) => "ClipboardFailed",
            ClientError::InvalidInput(_) => "InvalidInput",
            ClientError::Internal(_) => "Internal",
            ClientError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including the error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for ClientError {
    fn error_code(&self) -> &'static str {
        client_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        client_error_static_metadata(self).1
    }

    fn log_level(&self) -> LogLevel {
        client_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            ClientError::AuthMissing => "Please log in to continue".to_string(),
            ClientError::FetchFailed { .. } => {
                "Error fetching your gallery. Please try again later.".to_string()
            }
            ClientError::DecodeFailed(_) => {
                "Failed to download image. Please try again later.".to_string()
            }
            ClientError::UploadRejected(ref msg) => msg.clone(),
            ClientError::ClipboardFailed(_) => {
                "Failed to copy share link. Please try again later.".to_string()
            }
            ClientError::InvalidInput(ref msg) => msg.clone(),
            ClientError::Internal(_) => "An unexpected error occurred".to_string(),
            ClientError::InternalWithSource { .. } => "An unexpected error occurred".to_string(),
        }
    }
}
