use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ClientError;

/// One server-generated artifact record, as returned by the gallery listing.
///
/// Immutable from the client's perspective. The full payload travels with
/// the listing, so detail views, downloads, and shares need no further
/// network fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    pub user_id: Uuid,
    pub animation_id: Uuid,
    pub filename: String,
    pub content_type: String,
    /// Base64-encoded payload (standard alphabet).
    pub image_data: String,
    pub created_at: DateTime<Utc>,
}

impl Animation {
    /// Check listing invariants: non-empty filename and a content type.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.filename.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "Animation filename must not be empty".to_string(),
            ));
        }
        if self.content_type.trim().is_empty() {
            return Err(ClientError::InvalidInput(
                "Animation content type must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Single-item detail variant returned by `GET /gallery/{owner}/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelDetail {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub description: String,
}
