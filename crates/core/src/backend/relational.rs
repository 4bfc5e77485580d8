use std::sync::Arc;

use async_trait::async_trait;

use super::{BackendKind, SourceRecord, TorrentQueryBackend};
use crate::catalog::{RelationalSearch, TorrentRecordStore};
use crate::error::BrowseError;
use crate::pagination::PageWindow;
use crate::query::QuerySpec;

/// Executes queries against the relational catalog.
pub struct RelationalBackend {
    store: Arc<dyn TorrentRecordStore>,
}

impl RelationalBackend {
    pub fn new(store: Arc<dyn TorrentRecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TorrentQueryBackend for RelationalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Relational
    }

    async fn execute(
        &self,
        spec: &QuerySpec,
        window: PageWindow,
        include_deleted: bool,
    ) -> Result<Vec<SourceRecord>, BrowseError> {
        let query = RelationalSearch {
            term: spec.term.clone(),
            user_id: spec.user_id,
            category: spec.category,
            quality_filter: spec.quality_filter.clone(),
            sort: spec.sort_key,
            order: spec.sort_order,
            window,
            include_deleted,
        };

        let records = self.store.search(&query)?;
        Ok(records
            .into_iter()
            .map(|record| SourceRecord::Relational(Box::new(record)))
            .collect())
    }
}
