use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::{BackendKind, SourceRecord, TorrentQueryBackend};
use crate::error::BrowseError;
use crate::pagination::PageWindow;
use crate::query::QuerySpec;
use crate::search_index::{IndexSearch, SearchIndex};

/// Executes queries against the external search index.
pub struct SearchIndexBackend {
    index: Arc<dyn SearchIndex>,
    max_search_results: u32,
}

impl SearchIndexBackend {
    pub fn new(index: Arc<dyn SearchIndex>, max_search_results: u32) -> Self {
        Self {
            index,
            max_search_results,
        }
    }
}

#[async_trait]
impl TorrentQueryBackend for SearchIndexBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::SearchIndex
    }

    async fn execute(
        &self,
        spec: &QuerySpec,
        window: PageWindow,
        include_deleted: bool,
    ) -> Result<Vec<SourceRecord>, BrowseError> {
        let request = IndexSearch {
            term: spec.term.clone(),
            category: spec.category,
            quality_filter: spec.quality_filter.clone(),
            sort: spec.sort_key,
            order: spec.sort_order,
            user_id: spec.user_id,
            window,
            max_search_results: self.max_search_results,
            include_deleted,
        };

        let hits = self.index.search(&request).await.map_err(|e| {
            warn!(index = self.index.name(), error = %e, "Search index query failed");
            BrowseError::from(e)
        })?;

        Ok(hits
            .into_iter()
            .map(|hit| SourceRecord::SearchHit(Box::new(hit)))
            .collect())
    }
}
