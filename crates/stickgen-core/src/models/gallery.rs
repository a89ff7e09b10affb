use serde::{Deserialize, Serialize};

use super::animation::Animation;
use crate::error::ClientError;

/// One fixed-size window over an owner's full media collection.
///
/// Ordered, non-persisted view: recomputed on every page-index change or
/// explicit refresh, never cached across sessions. A page index beyond the
/// available data yields an empty page with `has_more = false`, which is
/// distinguishable from a fetch error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryPage {
    pub items: Vec<Animation>,
    /// 1-based page index.
    pub page_index: usize,
    pub page_size: usize,
    /// Size of the full collection the window was computed from.
    pub total_count: usize,
    pub has_more: bool,
}

impl GalleryPage {
    /// Compute the window for `page_index` over the full collection.
    ///
    /// start = (page_index - 1) * page_size, end = start + page_size,
    /// has_more = end < total_count.
    pub fn window(
        collection: Vec<Animation>,
        page_index: usize,
        page_size: usize,
    ) -> Result<Self, ClientError> {
        if page_index == 0 {
            return Err(ClientError::InvalidInput(
                "Page index must be at least 1".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(ClientError::InvalidInput(
                "Page size must be greater than zero".to_string(),
            ));
        }

        let total_count = collection.len();
        let start = (page_index - 1)
            .checked_mul(page_size)
            .ok_or_else(|| ClientError::InvalidInput("Page index out of range".to_string()))?;
        let end = start
            .checked_add(page_size)
            .ok_or_else(|| ClientError::InvalidInput("Page index out of range".to_string()))?;

        let items: Vec<Animation> = if start >= total_count {
            Vec::new()
        } else {
            collection
                .into_iter()
                .skip(start)
                .take(page_size)
                .collect()
        };

        Ok(Self {
            items,
            page_index,
            page_size,
            total_count,
            has_more: end < total_count,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
