//! Base64 payload decoding and revocable download handles.
//!
//! Gallery listings carry each item's payload as standard-alphabet base64.
//! Decoding produces a `MediaHandle`: an ephemeral, revocable reference to
//! the decoded bytes plus the declared MIME type, used to trigger a local
//! "save as" under the item's original filename. Handles are scoped
//! resources: created immediately before the save interaction and revoked
//! immediately afterward on every exit path, so repeated downloads do not
//! accumulate decoded payloads.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;

use stickgen_core::validation::validate_filename;
use stickgen_core::ClientError;

/// Ephemeral, revocable reference to decoded binary data.
#[derive(Debug)]
pub struct MediaHandle {
    bytes: Option<Bytes>,
    content_type: String,
}

impl MediaHandle {
    fn new(bytes: Bytes, content_type: impl Into<String>) -> Self {
        Self {
            bytes: Some(bytes),
            content_type: content_type.into(),
        }
    }

    /// Decoded bytes, or an error if the handle was revoked.
    pub fn bytes(&self) -> Result<&[u8], ClientError> {
        self.bytes
            .as_deref()
            .ok_or_else(|| ClientError::Internal("Media handle already revoked".to_string()))
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.as_ref().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_revoked(&self) -> bool {
        self.bytes.is_none()
    }

    /// Release the decoded bytes. Idempotent; Drop revokes as well.
    pub fn revoke(&mut self) {
        self.bytes = None;
    }

    /// Write the decoded bytes into `dir` under `filename` (the item's
    /// original filename). The payload is fully decoded before this point,
    /// so no partial file is ever produced.
    pub fn save_as(&self, dir: &Path, filename: &str) -> Result<PathBuf, ClientError> {
        validate_filename(filename)?;
        let bytes = self.bytes()?;
        let target = dir.join(filename);
        std::fs::write(&target, bytes)?;
        Ok(target)
    }
}

/// Converts between base64 payloads and local binary handles.
pub struct MediaCodec;

impl MediaCodec {
    /// Decode a standard-alphabet base64 payload into a revocable handle
    /// carrying the declared MIME type. Malformed input is `DecodeFailed`.
    pub fn decode(payload: &str, content_type: &str) -> Result<MediaHandle, ClientError> {
        let bytes = BASE64.decode(payload.trim())?;
        Ok(MediaHandle::new(Bytes::from(bytes), content_type))
    }

    /// Encode bytes back to the wire representation.
    pub fn encode(bytes: &[u8]) -> String {
        BASE64.encode(bytes)
    }

    /// Run `f` against a freshly decoded handle, revoking it on every exit
    /// path (success or error).
    pub fn with_decoded<T>(
        payload: &str,
        content_type: &str,
        f: impl FnOnce(&MediaHandle) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let mut handle = Self::decode(payload, content_type)?;
        let result = f(&handle);
        handle.revoke();
        result
    }
}
