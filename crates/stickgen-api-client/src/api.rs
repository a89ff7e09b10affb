//! Domain methods for the StickGen API client.
//!
//! Endpoint shapes follow the backend contract: the gallery listing returns
//! the owner's entire collection in one response; uploads are multipart
//! `{file, user_id}`; downloads are raw binary.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stickgen_core::models::{Animation, PanelDetail, SelectedFile};
use stickgen_core::{ClientError, Session};

use crate::ApiClient;

/// Gallery listing response: `{status, animations}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct GalleryResponse {
    pub status: String,
    pub animations: Vec<Animation>,
}

/// Successful upload response.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub animation_id: Uuid,
    pub filename: String,
    pub original_name: String,
    pub content_type: String,
    pub s3_url: String,
}

/// Backend failure payload: `{detail}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ApiClient {
    /// Fetch the owner's full media collection.
    ///
    /// `limit`/`offset` are sent as query hints for a backend that windows
    /// server-side; the observed backend ignores them and returns the whole
    /// collection, so callers window client-side regardless.
    pub async fn fetch_gallery(
        &self,
        session: &Session,
        owner_id: Uuid,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Animation>, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(l) = limit {
            query.push(("limit", l.to_string()));
        }
        if let Some(o) = offset {
            query.push(("offset", o.to_string()));
        }

        let response: GalleryResponse = self
            .get_json(&format!("/gallery/{}", owner_id), session, &query)
            .await?;

        Ok(response.animations)
    }

    /// Fetch the single-item detail variant.
    pub async fn get_panel(
        &self,
        session: &Session,
        owner_id: Uuid,
        panel_id: Uuid,
    ) -> Result<PanelDetail, ClientError> {
        self.get_json(&format!("/gallery/{}/{}", owner_id, panel_id), session, &[])
            .await
    }

    /// Upload a selected file as multipart `{file, user_id}`.
    pub async fn upload_animation(
        &self,
        session: &Session,
        owner_id: Uuid,
        file: &SelectedFile,
    ) -> Result<UploadResponse, ClientError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ClientError::InvalidInput(format!("Invalid content type: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("user_id", owner_id.to_string());

        self.post_multipart(&format!("/upload/{}", owner_id), session, form)
            .await
    }

    /// Download the raw binary for one media item.
    pub async fn download_animation(
        &self,
        session: &Session,
        owner_id: Uuid,
        animation_id: Uuid,
    ) -> Result<Bytes, ClientError> {
        self.get_bytes(&format!("/download/{}/{}", owner_id, animation_id), session)
            .await
    }
}
