//! Relational torrent catalog.
//!
//! Holds the authoritative torrent records, their categories and tracker
//! stats. Browsing without a search term (or with the search index disabled)
//! is served from here.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

use crate::db::StoreError;

/// Read access to torrent records.
pub trait TorrentRecordStore: Send + Sync {
    /// Run a paged browse/search query.
    ///
    /// Deleted torrents are excluded unless `query.include_deleted` is set.
    fn search(&self, query: &RelationalSearch) -> Result<Vec<RelationalTorrentRecord>, StoreError>;

    /// Fetch one torrent by id, deleted or not. Visibility is the caller's job.
    fn by_id(&self, id: i64) -> Result<Option<RelationalTorrentRecord>, StoreError>;

    /// All main categories with their sub categories, ordered by id.
    fn categories(&self) -> Result<Vec<MainCategory>, StoreError>;
}
