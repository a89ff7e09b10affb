use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Upload draft state machine.
///
/// Idle -> FileSelected -> Submitting -> { success -> Idle | Failed -> retains file }.
/// `Failed` keeps the selection so the user can retry without reselecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    Idle,
    FileSelected,
    Submitting,
    Failed,
}

impl UploadState {
    /// Whether a new submission may start from this state.
    pub fn can_submit(&self) -> bool {
        matches!(self, UploadState::FileSelected | UploadState::Failed)
    }
}

/// A locally selected file awaiting submission. Transient, client-only;
/// destroyed on successful submit or explicit reset.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
