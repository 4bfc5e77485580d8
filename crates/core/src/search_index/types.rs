//! Types for the external full-text search index.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::category::CategoryKey;
use crate::pagination::PageWindow;
use crate::query::{SortKey, SortOrder};

/// Errors from the search index.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    #[error("Search index request timed out")]
    Timeout,

    #[error("Search index connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Search index API error: {0}")]
    ApiError(String),

    #[error("Failed to parse search index response: {0}")]
    Parse(String),
}

/// A search request as the index sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSearch {
    pub term: String,
    pub category: CategoryKey,
    pub quality_filter: String,
    pub sort: SortKey,
    pub order: SortOrder,
    pub user_id: Option<i64>,
    pub window: PageWindow,
    pub max_search_results: u32,
    /// Superadmin requests also match deleted documents.
    pub include_deleted: bool,
}

/// One hit as stored in the index.
///
/// The index keeps a flat, possibly partial copy of each torrent. Every field
/// except the id may be missing and stays missing through projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHitDocument {
    pub id: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Copied through as stored.
    #[serde(default)]
    pub created_time: Option<String>,
    /// 40-character hex.
    #[serde(default)]
    pub info_hash: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub main_category_id: Option<u32>,
    #[serde(default)]
    pub sub_category_id: Option<u32>,
    #[serde(default)]
    pub trusted: Option<bool>,
    #[serde(default)]
    pub complete: Option<bool>,
    #[serde(default)]
    pub remake: Option<bool>,
    #[serde(default)]
    pub anonymous: Option<bool>,
    #[serde(default)]
    pub deleted: Option<bool>,
    #[serde(default)]
    pub uploader_id: Option<i64>,
    #[serde(default)]
    pub uploader_name: Option<String>,
    #[serde(default)]
    pub seed_count: Option<u32>,
    #[serde(default)]
    pub leech_count: Option<u32>,
    #[serde(default)]
    pub download_count: Option<u32>,
    #[serde(default)]
    pub comment_count: Option<u32>,
}

/// Full-text search over the torrent index.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Name of this index backend, for logs.
    fn name(&self) -> &str;

    /// Return the hits inside `request.window`, already ordered.
    async fn search(&self, request: &IndexSearch) -> Result<Vec<SearchHitDocument>, SearchIndexError>;
}
