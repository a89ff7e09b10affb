//! Detail view state and its Download/Share actions.
//!
//! At most one media item is under inspection at a time. The full payload
//! arrived with the gallery listing, so both actions work from data already
//! in memory; no further network fetch is needed.

use std::path::{Path, PathBuf};

use stickgen_core::models::Animation;
use stickgen_core::ClientError;

use crate::codec::MediaCodec;
use crate::share::{build_share_url, Clipboard};

/// Tracks the single selected media item (modal-equivalent state).
#[derive(Debug, Default)]
pub struct DetailViewController {
    selected: Option<Animation>,
}

impl DetailViewController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an item for inspection. Opening while another is open simply
    /// replaces it; no stacking.
    pub fn open(&mut self, item: Animation) {
        self.selected = Some(item);
    }

    /// Close the detail view. Clears the selection unconditionally.
    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Animation> {
        self.selected.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }

    /// Download the selected item into `dir` under its original filename.
    ///
    /// The decoded payload lives in a scoped handle that is revoked on
    /// every exit path; malformed base64 is `DecodeFailed` and produces no
    /// partial file.
    pub fn download_to(&self, dir: &Path) -> Result<PathBuf, ClientError> {
        let item = self.require_selection()?;
        MediaCodec::with_decoded(&item.image_data, &item.content_type, |handle| {
            handle.save_as(dir, &item.filename)
        })
    }

    /// Build the share URL for the selected item and copy it to the
    /// clipboard. URL construction is pure; the clipboard copy can fail
    /// independently and is reported as `ClipboardFailed`.
    pub fn share(
        &self,
        origin: &str,
        clipboard: &mut dyn Clipboard,
    ) -> Result<String, ClientError> {
        let item = self.require_selection()?;
        let url = build_share_url(origin, item.user_id, item.animation_id);
        clipboard.set_text(&url)?;
        Ok(url)
    }

    fn require_selection(&self) -> Result<&Animation, ClientError> {
        self.selected.as_ref().ok_or_else(|| {
            ClientError::InvalidInput("No media item is selected".to_string())
        })
    }
}
