//! HTTP client for the StickGen backend API.
//!
//! Provides a minimal client with per-request bearer auth (the token is
//! owned by the external auth collaborator and travels with the Session),
//! generic GET/POST helpers, and domain methods (gallery, upload, download).
//! The app layer and CLI use this client directly.

pub mod api;

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;

use stickgen_core::{ClientConfig, ClientError, Session};

/// HTTP client for the StickGen API. Auth is applied per request from the
/// caller's session; the client itself never stores a credential.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the environment (STICKGEN_API_URL, defaults
    /// to http://127.0.0.1:8000).
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(&ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(
        &self,
        request: reqwest::RequestBuilder,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        request.header(
            "Authorization",
            format!("Bearer {}", session.access_token),
        )
    }

    fn transport_error(err: reqwest::Error) -> ClientError {
        ClientError::FetchFailed {
            status: err.status().map(|s| s.as_u16()),
            message: format!("Failed to send request: {}", err),
        }
    }

    /// GET request with optional query parameters. Deserializes JSON.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &Session,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);
        request = self.apply_auth(request, session);

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!(%status, %url, "gallery read rejected");
            return Err(ClientError::FetchFailed {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        let body: T = response.json().await.map_err(|e| ClientError::FetchFailed {
            status: None,
            message: format!("Failed to parse response as JSON: {}", e),
        })?;

        Ok(body)
    }

    /// GET request returning the raw binary body.
    pub async fn get_bytes(&self, path: &str, session: &Session) -> Result<Bytes, ClientError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.get(&url), session);

        let response = request.send().await.map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::FetchFailed {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        response.bytes().await.map_err(|e| ClientError::FetchFailed {
            status: None,
            message: format!("Failed to read response body: {}", e),
        })
    }

    /// POST a multipart form and deserialize the response. A non-success
    /// response surfaces the backend's `detail` field verbatim when
    /// present, otherwise a generic upload-failure message.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &Session,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form), session);

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::UploadRejected(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<api::ErrorDetail>(&error_text)
                .map(|d| d.detail)
                .unwrap_or_else(|_| "Upload failed".to_string());
            tracing::debug!(%status, %url, "upload rejected");
            return Err(ClientError::UploadRejected(detail));
        }

        let body: T = response
            .json()
            .await
            .map_err(|e| ClientError::UploadRejected(format!(
                "Failed to parse response as JSON: {}",
                e
            )))?;

        Ok(body)
    }

    /// Raw client for custom requests. Caller must apply auth itself.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

// Re-export domain response types for convenience.
pub use api::{ErrorDetail, GalleryResponse, UploadResponse};
pub use stickgen_core::models::{Animation, PanelDetail};
