//! Mock search index for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::search_index::{IndexSearch, SearchHitDocument, SearchIndex, SearchIndexError};

/// A recorded search for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSearch {
    /// The request the engine sent.
    pub request: IndexSearch,
    /// When the search was made.
    pub timestamp: Instant,
}

/// Mock implementation of the SearchIndex trait.
///
/// Returns the configured hits for every search (the window is recorded but
/// not applied), records each request, and can fail the next search on demand.
///
/// # Example
///
/// ```rust,ignore
/// use nyaa_core::testing::{MockSearchIndex, fixtures};
///
/// let index = MockSearchIndex::new();
/// index.set_hits(vec![fixtures::search_hit(1, "Some Show - 01")]).await;
///
/// let hits = index.search(&request).await?;
/// assert_eq!(hits.len(), 1);
/// assert_eq!(index.search_count().await, 1);
/// ```
#[derive(Debug, Default)]
pub struct MockSearchIndex {
    /// Configured hits to return.
    hits: Arc<RwLock<Vec<SearchHitDocument>>>,
    /// Recorded search requests.
    searches: Arc<RwLock<Vec<RecordedSearch>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<SearchIndexError>>>,
}

impl MockSearchIndex {
    /// Create a new mock index with no hits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hits to return for subsequent searches.
    pub async fn set_hits(&self, hits: Vec<SearchHitDocument>) {
        *self.hits.write().await = hits;
    }

    /// Add a single hit.
    pub async fn add_hit(&self, hit: SearchHitDocument) {
        self.hits.write().await.push(hit);
    }

    /// Get recorded search requests.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.searches.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.searches.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: SearchIndexError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl SearchIndex for MockSearchIndex {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, request: &IndexSearch) -> Result<Vec<SearchHitDocument>, SearchIndexError> {
        self.searches.write().await.push(RecordedSearch {
            request: request.clone(),
            timestamp: Instant::now(),
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.hits.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryKey;
    use crate::pagination::PageWindow;
    use crate::query::{SortKey, SortOrder};
    use crate::testing::fixtures;

    fn request() -> IndexSearch {
        IndexSearch {
            term: "show".to_string(),
            category: CategoryKey::ALL,
            quality_filter: "0".to_string(),
            sort: SortKey::Id,
            order: SortOrder::Desc,
            user_id: None,
            window: PageWindow::new(1, 75),
            max_search_results: 1000,
            include_deleted: false,
        }
    }

    #[tokio::test]
    async fn test_returns_configured_hits_and_records() {
        let index = MockSearchIndex::new();
        index.add_hit(fixtures::search_hit(1, "A")).await;
        index.add_hit(fixtures::search_hit(2, "B")).await;

        let hits = index.search(&request()).await.unwrap();
        assert_eq!(hits.len(), 2);

        let searches = index.recorded_searches().await;
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].request.term, "show");
    }

    #[tokio::test]
    async fn test_next_error_fires_once() {
        let index = MockSearchIndex::new();
        index.set_next_error(SearchIndexError::Timeout).await;

        assert!(index.search(&request()).await.is_err());
        assert!(index.search(&request()).await.is_ok());
        assert_eq!(index.search_count().await, 2);
    }
}
