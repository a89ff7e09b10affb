//! Paginated gallery retrieval.
//!
//! The backend returns the owner's entire collection in one response; the
//! data source windows it into fixed-size pages client-side. The read call
//! carries limit/offset hints so a backend that learns to window
//! server-side can be adopted behind the same interface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use stickgen_api_client::ApiClient;
use stickgen_core::{ClientError, GalleryPage};

use crate::session::SessionGate;

pub struct GalleryDataSource {
    api: ApiClient,
    gate: SessionGate,
    page_size: usize,
}

impl GalleryDataSource {
    pub fn new(api: ApiClient, gate: SessionGate, page_size: usize) -> Self {
        Self {
            api,
            gate,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch one window of the owner's collection.
    ///
    /// Requires a valid session; fails closed with `AuthMissing` before any
    /// request otherwise. A page index beyond the available data yields an
    /// empty page with `has_more = false`; a failed read is `FetchFailed`.
    pub async fn fetch_page(
        &self,
        owner_id: Uuid,
        page_index: usize,
    ) -> Result<GalleryPage, ClientError> {
        if page_index == 0 {
            return Err(ClientError::InvalidInput(
                "Page index must be at least 1".to_string(),
            ));
        }
        let offset = (page_index - 1)
            .checked_mul(self.page_size)
            .ok_or_else(|| ClientError::InvalidInput("Page index out of range".to_string()))?;

        let session = self.gate.require_session().await?;
        let collection = self
            .api
            .fetch_gallery(&session, owner_id, Some(self.page_size), Some(offset))
            .await?;

        tracing::debug!(
            owner = %owner_id,
            total = collection.len(),
            page_index,
            "windowing gallery collection"
        );

        GalleryPage::window(collection, page_index, self.page_size)
    }
}

/// State of the visible gallery view.
#[derive(Debug, Default)]
struct BrowserState {
    current: Option<GalleryPage>,
    loading: bool,
}

/// Holds the visible page with single-writer discipline.
///
/// Each load is fenced by a monotonically increasing generation number: a
/// request superseded by a newer one has its result discarded instead of
/// overwriting the view with stale data. A failed load clears the visible
/// page and surfaces the error; it does not silently keep stale content.
pub struct GalleryBrowser {
    source: GalleryDataSource,
    generation: AtomicU64,
    state: Mutex<BrowserState>,
}

impl GalleryBrowser {
    pub fn new(source: GalleryDataSource) -> Arc<Self> {
        Arc::new(Self {
            source,
            generation: AtomicU64::new(0),
            state: Mutex::new(BrowserState::default()),
        })
    }

    /// Load a page into the view. Returns `Ok(None)` when the result was
    /// superseded by a newer load and therefore discarded.
    pub async fn load_page(
        &self,
        owner_id: Uuid,
        page_index: usize,
    ) -> Result<Option<GalleryPage>, ClientError> {
        let generation = self.begin_generation().await;
        let result = self.source.fetch_page(owner_id, page_index).await;
        self.apply(generation, result).await
    }

    /// Re-fetch the currently visible page index, or page 1 when nothing is
    /// visible. Never triggered automatically by an upload; callers invoke
    /// it on explicit navigation.
    pub async fn refresh(&self, owner_id: Uuid) -> Result<Option<GalleryPage>, ClientError> {
        let page_index = {
            let state = self.state.lock().await;
            state.current.as_ref().map(|p| p.page_index).unwrap_or(1)
        };
        self.load_page(owner_id, page_index).await
    }

    pub async fn current_page(&self) -> Option<GalleryPage> {
        self.state.lock().await.current.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Start a new load generation, superseding any in-flight one.
    async fn begin_generation(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().await.loading = true;
        generation
    }

    /// Apply a load result if its generation is still current.
    async fn apply(
        &self,
        generation: u64,
        result: Result<GalleryPage, ClientError>,
    ) -> Result<Option<GalleryPage>, ClientError> {
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding superseded gallery load");
            return Ok(None);
        }

        let mut state = self.state.lock().await;
        state.loading = false;
        match result {
            Ok(page) => {
                state.current = Some(page.clone());
                Ok(Some(page))
            }
            Err(err) => {
                // The error state replaces the view; the last good page is
                // intentionally not preserved.
                state.current = None;
                Err(err)
            }
        }
    }
}
