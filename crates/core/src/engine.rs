//! The browse/search pipeline.
//!
//! normalize -> select backend -> govern pagination -> execute -> project.
//! The response envelope carries the query as it was actually executed.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::auth::Viewer;
use crate::backend::{
    select_backend, BackendKind, RelationalBackend, SearchIndexBackend, TorrentQueryBackend,
};
use crate::catalog::{MainCategory, TorrentRecordStore};
use crate::config::BrowseConfig;
use crate::error::{parse_record_id, BrowseError, INVALID_TORRENT_ID, TORRENT_NOT_FOUND};
use crate::metrics::{BROWSE_QUERIES, BROWSE_QUERY_DURATION, HIDDEN_RECORDS};
use crate::pagination::govern;
use crate::projector::{CanonicalTorrent, Projector};
use crate::query::{normalize, QueryParams, QuerySpec};
use crate::search_index::SearchIndex;
use crate::users::UserDirectory;

/// Body of a browse response.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseResponse {
    pub torrents: Vec<CanonicalTorrent>,
    pub args: QuerySpec,
}

/// Serves browse, info and category requests.
pub struct BrowseEngine {
    config: BrowseConfig,
    users: Arc<dyn UserDirectory>,
    torrents: Arc<dyn TorrentRecordStore>,
    relational: RelationalBackend,
    search: Option<SearchIndexBackend>,
    projector: Projector,
}

impl BrowseEngine {
    /// Build the engine. The search index is used only when `config` enables it.
    pub fn new(
        config: BrowseConfig,
        users: Arc<dyn UserDirectory>,
        torrents: Arc<dyn TorrentRecordStore>,
        search_index: Option<Arc<dyn SearchIndex>>,
    ) -> Self {
        let search = match (config.use_search_index, search_index) {
            (true, Some(index)) => Some(SearchIndexBackend::new(index, config.max_search_results)),
            (true, None) => {
                warn!("Search index enabled but not configured, using relational store only");
                None
            }
            (false, _) => None,
        };

        Self {
            projector: Projector::new(config.trackers.clone()),
            relational: RelationalBackend::new(Arc::clone(&torrents)),
            config,
            users,
            torrents,
            search,
        }
    }

    pub fn search_index_enabled(&self) -> bool {
        self.search.is_some()
    }

    fn backend(&self, kind: BackendKind) -> &dyn TorrentQueryBackend {
        match (kind, &self.search) {
            (BackendKind::SearchIndex, Some(search)) => search as &dyn TorrentQueryBackend,
            _ => &self.relational,
        }
    }

    /// Run a browse/search request.
    pub async fn browse(
        &self,
        params: &QueryParams,
        viewer: Option<&Viewer>,
    ) -> Result<BrowseResponse, BrowseError> {
        let mut spec = normalize(params, self.config.per_page, self.users.as_ref())?;

        let kind = select_backend(&spec.term, self.search_index_enabled());
        let window = govern(kind, spec.page, spec.per_page, self.config.max_search_results);
        spec.page = window.page;
        if kind == BackendKind::SearchIndex {
            spec.max_search_results = Some(self.config.max_search_results);
        }

        let include_deleted = viewer.is_some_and(|v| v.is_superadmin);
        let backend = self.backend(kind);
        debug!(
            backend = backend.kind().as_str(),
            page = window.page,
            offset = window.offset,
            limit = window.limit,
            "Dispatching browse query"
        );

        let timer = BROWSE_QUERY_DURATION
            .with_label_values(&[kind.as_str()])
            .start_timer();
        let result = backend.execute(&spec, window, include_deleted).await;
        timer.observe_duration();

        let records = match result {
            Ok(records) => {
                BROWSE_QUERIES.with_label_values(&[kind.as_str(), "ok"]).inc();
                records
            }
            Err(e) => {
                BROWSE_QUERIES.with_label_values(&[kind.as_str(), "error"]).inc();
                warn!(backend = kind.as_str(), error = %e, "Browse query failed");
                return Err(e);
            }
        };

        let fetched = records.len();
        let torrents: Vec<CanonicalTorrent> = records
            .into_iter()
            .filter_map(|record| self.projector.project(record, viewer))
            .collect();

        let hidden = fetched - torrents.len();
        if hidden > 0 {
            HIDDEN_RECORDS
                .with_label_values(&[kind.as_str()])
                .inc_by(hidden as u64);
        }

        Ok(BrowseResponse {
            torrents,
            args: spec,
        })
    }

    /// Fetch one torrent for `GET /info/{id}`.
    ///
    /// Missing and hidden torrents give the same not-found error.
    pub fn torrent_info(
        &self,
        raw_id: &str,
        viewer: Option<&Viewer>,
    ) -> Result<CanonicalTorrent, BrowseError> {
        let id = parse_record_id(raw_id, INVALID_TORRENT_ID)?;
        self.torrents
            .by_id(id)?
            .and_then(|record| self.projector.project_relational(record, viewer))
            .ok_or_else(|| BrowseError::NotFound(TORRENT_NOT_FOUND.to_string()))
    }

    pub fn categories(&self) -> Result<Vec<MainCategory>, BrowseError> {
        Ok(self.torrents.categories()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{NewTorrent, SqliteCatalog};
    use crate::category::CategoryKey;
    use crate::db::Database;
    use crate::error::{RSS_NOT_ALLOWED, USER_NOT_FOUND};
    use crate::search_index::{SearchHitDocument, SearchIndexError};
    use crate::testing::{fixtures, MockSearchIndex};
    use crate::users::{SqliteUserDirectory, UserLevel};

    struct Fixture {
        engine: BrowseEngine,
        catalog: SqliteCatalog,
        users: SqliteUserDirectory,
        index: Arc<MockSearchIndex>,
    }

    fn fixture(use_search_index: bool) -> Fixture {
        let db = Database::in_memory().unwrap();
        let users = SqliteUserDirectory::new(db.clone());
        let catalog = SqliteCatalog::new(db);
        let index = Arc::new(MockSearchIndex::new());

        let config = BrowseConfig {
            per_page: 40,
            use_search_index,
            max_search_results: 100,
            trackers: vec!["http://t.example/announce".to_string()],
        };
        let engine = BrowseEngine::new(
            config,
            Arc::new(users.clone()),
            Arc::new(catalog.clone()),
            Some(index.clone() as Arc<dyn SearchIndex>),
        );

        Fixture {
            engine,
            catalog,
            users,
            index,
        }
    }

    fn insert(catalog: &SqliteCatalog, name: &str, hash: char) -> i64 {
        catalog
            .insert(&NewTorrent {
                info_hash: hash.to_string().repeat(40),
                display_name: name.to_string(),
                category: CategoryKey::new(1, 2),
                ..Default::default()
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_browse_relational_envelope() {
        let f = fixture(false);
        insert(&f.catalog, "First", 'a');
        insert(&f.catalog, "Second", 'b');

        let params = QueryParams::new().with("p", "abc");
        let response = f.engine.browse(&params, None).await.unwrap();

        assert_eq!(response.torrents.len(), 2);
        assert_eq!(response.torrents[0].display_name.as_deref(), Some("Second"));
        assert_eq!(response.args.page, 1);
        assert_eq!(response.args.per_page, 40);
        assert_eq!(response.args.max_search_results, None);
        assert_eq!(f.index.search_count().await, 0);
    }

    #[tokio::test]
    async fn test_browse_no_matches_is_empty_list() {
        let f = fixture(false);
        let params = QueryParams::new().with("q", "nothing");
        let response = f.engine.browse(&params, None).await.unwrap();
        assert!(response.torrents.is_empty());
        assert_eq!(response.args.term, "nothing");
    }

    #[tokio::test]
    async fn test_browse_with_term_uses_search_index_and_caps_page() {
        let f = fixture(true);
        f.index
            .set_hits(vec![fixtures::search_hit(1, "Hit One")])
            .await;

        let params = QueryParams::new().with("q", "hit").with("p", "5");
        let response = f.engine.browse(&params, None).await.unwrap();

        assert_eq!(response.torrents.len(), 1);
        assert_eq!(response.args.page, 3);
        assert_eq!(response.args.max_search_results, Some(100));

        let searches = f.index.recorded_searches().await;
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].request.window.page, 3);
        assert_eq!(searches[0].request.window.offset, 80);
        assert_eq!(searches[0].request.window.limit, 20);
    }

    #[tokio::test]
    async fn test_browse_without_term_stays_relational() {
        let f = fixture(true);
        insert(&f.catalog, "Local", 'a');

        let response = f.engine.browse(&QueryParams::new(), None).await.unwrap();
        assert_eq!(response.torrents.len(), 1);
        assert_eq!(f.index.search_count().await, 0);
    }

    #[tokio::test]
    async fn test_search_index_failure_is_not_retried() {
        let f = fixture(true);
        insert(&f.catalog, "hit in catalog", 'a');
        f.index.set_next_error(SearchIndexError::Timeout).await;

        let params = QueryParams::new().with("q", "hit");
        let result = f.engine.browse(&params, None).await;
        assert!(matches!(result, Err(BrowseError::Backend(_))));
    }

    #[tokio::test]
    async fn test_rss_rejected_before_backend() {
        let f = fixture(true);
        let params = QueryParams::new().with("q", "x").with("page", "rss");
        match f.engine.browse(&params, None).await {
            Err(BrowseError::Validation(msg)) => assert_eq!(msg, RSS_NOT_ALLOWED),
            other => panic!("expected validation error, got {:?}", other.map(|r| r.args)),
        }
        assert_eq!(f.index.search_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let f = fixture(false);
        let params = QueryParams::new().with("u", "ghost");
        match f.engine.browse(&params, None).await {
            Err(BrowseError::NotFound(msg)) => assert_eq!(msg, USER_NOT_FOUND),
            other => panic!("expected not found, got {:?}", other.map(|r| r.args)),
        }
    }

    #[tokio::test]
    async fn test_deleted_hidden_from_browse_except_superadmin() {
        let f = fixture(false);
        let id = insert(&f.catalog, "Deleted", 'a');
        f.catalog.mark_deleted(id).unwrap();
        let admin = f.users.create_user("root", UserLevel::Superadmin, None).unwrap();

        let response = f.engine.browse(&QueryParams::new(), None).await.unwrap();
        assert!(response.torrents.is_empty());

        let response = f
            .engine
            .browse(&QueryParams::new(), Some(&Viewer::from(&admin)))
            .await
            .unwrap();
        assert_eq!(response.torrents.len(), 1);
    }

    #[tokio::test]
    async fn test_superadmin_search_includes_deleted_hits() {
        let f = fixture(true);
        let admin = f.users.create_user("root", UserLevel::Superadmin, None).unwrap();
        let params = QueryParams::new().with("q", "x");

        f.engine.browse(&params, None).await.unwrap();
        f.engine
            .browse(&params, Some(&Viewer::from(&admin)))
            .await
            .unwrap();

        let searches = f.index.recorded_searches().await;
        assert!(!searches[0].request.include_deleted);
        assert!(searches[1].request.include_deleted);
    }

    #[tokio::test]
    async fn test_hits_keep_partial_shape() {
        let f = fixture(true);
        f.index
            .set_hits(vec![SearchHitDocument {
                id: 9,
                display_name: Some("Partial".to_string()),
                leech_count: Some(2),
                ..Default::default()
            }])
            .await;

        let params = QueryParams::new().with("q", "partial");
        let response = f.engine.browse(&params, None).await.unwrap();
        let torrent = &response.torrents[0];

        assert_eq!(torrent.id, 9);
        assert!(torrent.information.is_none());
        assert!(torrent.magnet_uri.is_none());
        assert_eq!(torrent.stats.unwrap().leechers, Some(2));
        assert_eq!(torrent.stats.unwrap().seeders, None);
    }

    #[test]
    fn test_torrent_info() {
        let f = fixture(false);
        let id = insert(&f.catalog, "Info", 'a');

        let torrent = f.engine.torrent_info(&id.to_string(), None).unwrap();
        assert_eq!(torrent.display_name.as_deref(), Some("Info"));
        assert!(torrent.magnet_uri.unwrap().contains("&tr="));

        match f.engine.torrent_info("abc", None) {
            Err(BrowseError::Validation(msg)) => assert_eq!(msg, INVALID_TORRENT_ID),
            other => panic!("expected validation error, got {:?}", other),
        }
        match f.engine.torrent_info("999", None) {
            Err(BrowseError::NotFound(msg)) => assert_eq!(msg, TORRENT_NOT_FOUND),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn test_deleted_info_matches_missing() {
        let f = fixture(false);
        let id = insert(&f.catalog, "Gone", 'a');
        f.catalog.mark_deleted(id).unwrap();
        let moderator = f.users.create_user("mod", UserLevel::Moderator, None).unwrap();
        let admin = f.users.create_user("root", UserLevel::Superadmin, None).unwrap();

        let hidden = f
            .engine
            .torrent_info(&id.to_string(), Some(&Viewer::from(&moderator)))
            .unwrap_err();
        let missing = f.engine.torrent_info("999", None).unwrap_err();
        assert_eq!(hidden.to_string(), missing.to_string());

        let visible = f
            .engine
            .torrent_info(&id.to_string(), Some(&Viewer::from(&admin)))
            .unwrap();
        assert_eq!(visible.display_name.as_deref(), Some("Gone"));
    }

    #[test]
    fn test_search_index_requires_configuration() {
        let db = Database::in_memory().unwrap();
        let engine = BrowseEngine::new(
            BrowseConfig {
                use_search_index: true,
                ..Default::default()
            },
            Arc::new(SqliteUserDirectory::new(db.clone())),
            Arc::new(SqliteCatalog::new(db)),
            None,
        );
        assert!(!engine.search_index_enabled());
    }
}
