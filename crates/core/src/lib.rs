pub mod auth;
pub mod backend;
pub mod catalog;
pub mod category;
pub mod comments;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod pagination;
pub mod projector;
pub mod query;
pub mod search_index;
pub mod testing;
pub mod users;

pub use auth::{
    create_authenticator, digest_api_key, ApiKeyAuthenticator, AuthError, AuthRequest,
    Authenticator, NoneAuthenticator, Viewer,
};
pub use backend::{select_backend, BackendKind, SourceRecord, TorrentQueryBackend};
pub use catalog::{
    MainCategory, NewTorrent, RelationalTorrentRecord, SqliteCatalog, StatsRow, SubCategory,
    TorrentRecordStore,
};
pub use category::CategoryKey;
pub use comments::{Comment, CommentPage, CommentService, CommentStore, SqliteCommentStore};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, AuthMethod, BrowseConfig,
    CommentsConfig, Config, ConfigError, DatabaseConfig, SanitizedConfig, SearchIndexConfig,
    ServerConfig,
};
pub use db::{Database, StoreError};
pub use engine::{BrowseEngine, BrowseResponse};
pub use error::BrowseError;
pub use pagination::{govern, max_reachable_page, PageWindow};
pub use projector::{CanonicalTorrent, Projector};
pub use query::{normalize, parse_page, QueryParams, QuerySpec, SortKey, SortOrder};
pub use search_index::{
    ElasticSearchIndex, IndexSearch, SearchHitDocument, SearchIndex, SearchIndexError,
};
pub use users::{SqliteUserDirectory, User, UserDirectory, UserLevel};
