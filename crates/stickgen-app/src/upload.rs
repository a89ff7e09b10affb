//! Upload pipeline: file selection, preview generation, and submission.
//!
//! State machine: Idle -> FileSelected -> Submitting -> {Idle on success |
//! Failed, retaining the file, on rejection}. One submission in flight per
//! instance; submitting without both a valid session and a selected file
//! aborts before any network call.

use std::path::Path;

use chrono::Utc;
use tokio::sync::watch;

use stickgen_api_client::{ApiClient, UploadResponse};
use stickgen_core::models::SelectedFile;
use stickgen_core::validation::{validate_filename, validate_upload_content_type};
use stickgen_core::{ClientError, Session, UploadState};

use crate::codec::MediaCodec;

pub struct UploadPipeline {
    api: ApiClient,
    state: UploadState,
    file: Option<SelectedFile>,
    preview_tx: watch::Sender<Option<String>>,
}

impl UploadPipeline {
    pub fn new(api: ApiClient) -> Self {
        let (preview_tx, _) = watch::channel(None);
        Self {
            api,
            state: UploadState::Idle,
            file: None,
            preview_tx,
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    /// Subscribe to the preview. Selection and preview-ready are distinct
    /// moments: the data-URL appears here only once the asynchronous
    /// conversion resolves.
    pub fn subscribe_preview(&self) -> watch::Receiver<Option<String>> {
        self.preview_tx.subscribe()
    }

    /// Latest resolved preview, if the conversion has completed.
    pub fn preview(&self) -> Option<String> {
        self.preview_tx.borrow().clone()
    }

    /// Select a file for upload. Rejects with no state change when the file
    /// is absent or its type is outside the backend's allowlist. On
    /// success the draft moves to `FileSelected` and preview conversion
    /// starts in the background.
    pub async fn select_file(&mut self, path: &Path) -> Result<(), ClientError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .ok_or_else(|| {
                ClientError::InvalidInput("Please select a file before uploading".to_string())
            })?;
        validate_filename(&filename)?;

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        validate_upload_content_type(&content_type)?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ClientError::InvalidInput(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        self.file = Some(SelectedFile {
            path: path.to_path_buf(),
            filename,
            content_type: content_type.clone(),
            bytes: bytes.clone(),
        });
        self.state = UploadState::FileSelected;
        self.preview_tx.send_replace(None);

        // Non-blocking preview conversion; the preview becomes observable
        // only once this resolves.
        let tx = self.preview_tx.clone();
        tokio::spawn(async move {
            let data_url = format!(
                "data:{};base64,{}",
                content_type,
                MediaCodec::encode(&bytes)
            );
            tx.send_replace(Some(data_url));
        });

        Ok(())
    }

    /// Submit the selected file with the owning identity as a multipart
    /// payload under the session's bearer credential.
    ///
    /// Aborts with no network call when no file is selected, when the
    /// session is absent or expired, or when a submission is already in
    /// flight. Rejection keeps the selected file so the user can retry
    /// without reselecting.
    pub async fn submit(
        &mut self,
        session: Option<&Session>,
    ) -> Result<UploadResponse, ClientError> {
        if self.state == UploadState::Submitting {
            return Err(ClientError::InvalidInput(
                "An upload is already in progress".to_string(),
            ));
        }

        let file = match self.file.as_ref() {
            Some(file) => file.clone(),
            None => {
                return Err(ClientError::InvalidInput(
                    "Please select a file before uploading".to_string(),
                ))
            }
        };

        let session = match session {
            Some(session) if session.is_valid(Utc::now()) => session,
            _ => return Err(ClientError::AuthMissing),
        };

        self.state = UploadState::Submitting;
        tracing::debug!(user = %session.user_id, filename = %file.filename, "submitting upload");

        // If this future is dropped mid-flight (caller timeout/select), the
        // guard moves the draft to Failed so the file is retained and a
        // later submit is not rejected as already in progress.
        let api = self.api.clone();
        let result = {
            let guard = SubmitGuard::new(&mut self.state);
            let result = api.upload_animation(session, session.user_id, &file).await;
            guard.disarm();
            result
        };

        match result {
            Ok(response) => {
                // Success destroys the draft; the gallery view is not
                // refreshed automatically.
                self.reset();
                Ok(response)
            }
            Err(err) => {
                self.state = UploadState::Failed;
                Err(err)
            }
        }
    }

    /// Clear the draft: no file, no preview, `Idle`.
    pub fn reset(&mut self) {
        self.file = None;
        self.preview_tx.send_replace(None);
        self.state = UploadState::Idle;
    }
}

/// Restores a cancelled in-flight submission to `Failed` on drop.
struct SubmitGuard<'a> {
    state: &'a mut UploadState,
    armed: bool,
}

impl<'a> SubmitGuard<'a> {
    fn new(state: &'a mut UploadState) -> Self {
        Self { state, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            *self.state = UploadState::Failed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use chrono::Duration;
    use uuid::Uuid;

    use stickgen_core::ClientConfig;

    fn api_for(server: &mockito::ServerGuard) -> ApiClient {
        let config = ClientConfig {
            api_base_url: server.url(),
            ..ClientConfig::default()
        };
        ApiClient::new(&config).unwrap()
    }

    fn write_temp_png(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("figure.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"\x89PNG\r\n\x1a\nfake").unwrap();
        path
    }

    /// Wait until the background preview conversion has resolved, so later
    /// assertions about a cleared preview cannot race it.
    async fn wait_for_preview(pipeline: &UploadPipeline) {
        let mut rx = pipeline.subscribe_preview();
        while rx.borrow_and_update().is_none() {
            rx.changed().await.unwrap();
        }
    }

    fn upload_success_body(owner: Uuid) -> String {
        let animation_id = Uuid::new_v4();
        serde_json::json!({
            "status": "success",
            "animation_id": animation_id,
            "filename": format!("{animation_id}.png"),
            "original_name": "figure.png",
            "content_type": "image/png",
            "s3_url": format!("https://bucket.s3.amazonaws.com/animations/{owner}/x.png")
        })
        .to_string()
    }

    #[tokio::test]
    async fn select_file_sets_state_and_resolves_preview() {
        let server = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp_png(&dir);

        let mut pipeline = UploadPipeline::new(api_for(&server));
        assert_eq!(pipeline.state(), UploadState::Idle);

        let mut rx = pipeline.subscribe_preview();
        pipeline.select_file(&path).await.unwrap();
        assert_eq!(pipeline.state(), UploadState::FileSelected);
        assert_eq!(
            pipeline.selected_file().unwrap().content_type,
            "image/png"
        );

        // Preview resolves asynchronously, after selection.
        while rx.borrow_and_update().is_none() {
            rx.changed().await.unwrap();
        }
        let preview = pipeline.preview().unwrap();
        assert!(preview.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn select_missing_file_leaves_state_unchanged() {
        let server = mockito::Server::new_async().await;
        let mut pipeline = UploadPipeline::new(api_for(&server));

        let err = pipeline
            .select_file(Path::new("/nonexistent/figure.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert_eq!(pipeline.state(), UploadState::Idle);
        assert!(pipeline.selected_file().is_none());
    }

    #[tokio::test]
    async fn select_disallowed_type_is_rejected() {
        let server = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let mut pipeline = UploadPipeline::new(api_for(&server));
        let err = pipeline.select_file(&path).await.unwrap_err();
        assert!(err.to_string().contains("File type not allowed"));
        assert_eq!(pipeline.state(), UploadState::Idle);
    }

    #[tokio::test]
    async fn submit_without_file_makes_no_network_call() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let mut pipeline = UploadPipeline::new(api_for(&server));
        let session = Session::new(Uuid::new_v4(), "token");
        let err = pipeline.submit(Some(&session)).await.unwrap_err();

        assert!(matches!(err, ClientError::InvalidInput(_)));
        assert_eq!(pipeline.state(), UploadState::Idle);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn submit_with_expired_session_aborts_before_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = write_temp_png(&dir);
        let mut pipeline = UploadPipeline::new(api_for(&server));
        pipeline.select_file(&path).await.unwrap();

        let expired = Session::new(Uuid::new_v4(), "token")
            .with_expiry(Utc::now() - Duration::minutes(1));
        let err = pipeline.submit(Some(&expired)).await.unwrap_err();

        assert!(matches!(err, ClientError::AuthMissing));
        // The draft is untouched: still FileSelected, file retained.
        assert_eq!(pipeline.state(), UploadState::FileSelected);
        assert!(pipeline.selected_file().is_some());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn submit_without_session_aborts_before_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = write_temp_png(&dir);
        let mut pipeline = UploadPipeline::new(api_for(&server));
        pipeline.select_file(&path).await.unwrap();

        let err = pipeline.submit(None).await.unwrap_err();
        assert!(matches!(err, ClientError::AuthMissing));
        assert_eq!(pipeline.state(), UploadState::FileSelected);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn successful_submit_resets_to_idle() {
        let mut server = mockito::Server::new_async().await;
        let session = Session::new(Uuid::new_v4(), "token");
        let owner = session.user_id;

        server
            .mock("POST", format!("/upload/{}", owner).as_str())
            .match_header("Authorization", "Bearer token")
            .with_status(200)
            .with_body(upload_success_body(owner))
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = write_temp_png(&dir);
        let mut pipeline = UploadPipeline::new(api_for(&server));
        pipeline.select_file(&path).await.unwrap();
        wait_for_preview(&pipeline).await;

        let response = pipeline.submit(Some(&session)).await.unwrap();
        assert_eq!(response.status, "success");

        // Draft destroyed: no file, no preview, Idle.
        assert_eq!(pipeline.state(), UploadState::Idle);
        assert!(pipeline.selected_file().is_none());
        assert!(pipeline.preview().is_none());
    }

    #[tokio::test]
    async fn failed_submit_retains_file_for_retry() {
        let mut server = mockito::Server::new_async().await;
        let session = Session::new(Uuid::new_v4(), "token");
        let owner = session.user_id;

        server
            .mock("POST", format!("/upload/{}", owner).as_str())
            .with_status(400)
            .with_body(r#"{"detail":"File type not allowed. Please upload an image or video file."}"#)
            .expect(1)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let path = write_temp_png(&dir);
        let mut pipeline = UploadPipeline::new(api_for(&server));
        pipeline.select_file(&path).await.unwrap();

        let err = pipeline.submit(Some(&session)).await.unwrap_err();
        match err {
            ClientError::UploadRejected(detail) => {
                assert!(detail.contains("File type not allowed"))
            }
            other => panic!("expected UploadRejected, got {:?}", other),
        }

        assert_eq!(pipeline.state(), UploadState::Failed);
        assert!(pipeline.selected_file().is_some());
        assert!(pipeline.state().can_submit());

        // Retry succeeds without reselecting.
        server
            .mock("POST", format!("/upload/{}", owner).as_str())
            .with_status(200)
            .with_body(upload_success_body(owner))
            .create_async()
            .await;

        pipeline.submit(Some(&session)).await.unwrap();
        assert_eq!(pipeline.state(), UploadState::Idle);
    }

    #[tokio::test]
    async fn cancelled_submit_leaves_retryable_failed_state() {
        // A listener that accepts but never answers, so the submission is
        // still in flight when the timeout drops the future.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                if let Ok((stream, _)) = listener.accept().await {
                    held.push(stream);
                }
            }
        });

        let config = ClientConfig {
            api_base_url: format!("http://{}", addr),
            ..ClientConfig::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp_png(&dir);
        let mut pipeline = UploadPipeline::new(ApiClient::new(&config).unwrap());
        pipeline.select_file(&path).await.unwrap();

        let session = Session::new(Uuid::new_v4(), "token");
        let cancelled = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            pipeline.submit(Some(&session)),
        )
        .await;
        assert!(cancelled.is_err());

        // Not wedged at Submitting: the draft is Failed with the file
        // retained, so the user can retry without reselecting.
        assert_eq!(pipeline.state(), UploadState::Failed);
        assert!(pipeline.selected_file().is_some());
        assert!(pipeline.state().can_submit());
    }

    #[tokio::test]
    async fn reset_clears_draft() {
        let server = mockito::Server::new_async().await;
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp_png(&dir);

        let mut pipeline = UploadPipeline::new(api_for(&server));
        pipeline.select_file(&path).await.unwrap();
        wait_for_preview(&pipeline).await;
        pipeline.reset();

        assert_eq!(pipeline.state(), UploadState::Idle);
        assert!(pipeline.selected_file().is_none());
        assert!(pipeline.preview().is_none());
    }
}
