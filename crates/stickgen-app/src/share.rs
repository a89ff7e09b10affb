//! Share-link construction and the clipboard leg of the share action.
//!
//! URL construction is pure; clipboard access can fail independently, so
//! the two outcomes are reported separately (`ClipboardFailed` vs success).

use uuid::Uuid;

use stickgen_core::ClientError;

/// Build the shareable URL for one media item. Pure and deterministic:
/// identical inputs always produce an identical string.
pub fn build_share_url(origin: &str, owner_id: Uuid, media_id: Uuid) -> String {
    format!(
        "{}/gallery/{}/{}",
        origin.trim_end_matches('/'),
        owner_id,
        media_id
    )
}

/// Seam to the system clipboard.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClientError>;
}

/// In-memory clipboard for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClientError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// OS clipboard backed by `arboard`.
#[cfg(feature = "system-clipboard")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Result<Self, ClientError> {
        let inner = arboard::Clipboard::new()
            .map_err(|e| ClientError::ClipboardFailed(e.to_string()))?;
        Ok(Self { inner })
    }
}

#[cfg(feature = "system-clipboard")]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClientError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ClientError::ClipboardFailed(e.to_string()))
    }
}
