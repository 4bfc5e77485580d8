//! Backend selection and the query interface both backends implement.
//!
//! A request is routed once: to the search index when it is enabled and the
//! query carries a term, otherwise to the relational catalog. A failing
//! backend is reported as is; the other backend is never tried.

mod relational;
mod search;

pub use relational::RelationalBackend;
pub use search::SearchIndexBackend;

use async_trait::async_trait;
use serde::Serialize;

use crate::catalog::RelationalTorrentRecord;
use crate::error::BrowseError;
use crate::pagination::PageWindow;
use crate::query::QuerySpec;
use crate::search_index::SearchHitDocument;

/// Which backend executes a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Relational,
    SearchIndex,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Relational => "relational",
            BackendKind::SearchIndex => "search_index",
        }
    }
}

/// Pick the backend for a query.
pub fn select_backend(term: &str, search_index_enabled: bool) -> BackendKind {
    if search_index_enabled && !term.is_empty() {
        BackendKind::SearchIndex
    } else {
        BackendKind::Relational
    }
}

/// A backend-native record, before projection.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    Relational(Box<RelationalTorrentRecord>),
    SearchHit(Box<SearchHitDocument>),
}

/// One query, executed by whichever backend was selected.
#[async_trait]
pub trait TorrentQueryBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Fetch the records inside `window`, ordered per `spec`.
    ///
    /// `include_deleted` is set only for superadmin viewers.
    async fn execute(
        &self,
        spec: &QuerySpec,
        window: PageWindow,
        include_deleted: bool,
    ) -> Result<Vec<SourceRecord>, BrowseError>;
}
