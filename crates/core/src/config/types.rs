use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
    #[serde(default)]
    pub comments: CommentsConfig,
    #[serde(default)]
    pub search_index: Option<SearchIndexConfig>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Every request is served as an anonymous viewer.
    None,
    /// Per-user API keys, resolved through the user directory.
    ApiKey,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("nyaa.db")
}

/// Browse/search configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowseConfig {
    /// Results per page for both backends.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Route queries with a search term to the external search index.
    #[serde(default)]
    pub use_search_index: bool,
    /// Hard ceiling on results retrievable from the search index.
    #[serde(default = "default_max_search_results")]
    pub max_search_results: u32,
    /// Announce URLs appended to generated magnet links.
    #[serde(default)]
    pub trackers: Vec<String>,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            use_search_index: false,
            max_search_results: default_max_search_results(),
            trackers: Vec::new(),
        }
    }
}

fn default_per_page() -> u32 {
    75
}

fn default_max_search_results() -> u32 {
    1000
}

/// Comment listing and editing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommentsConfig {
    #[serde(default = "default_comments_per_page")]
    pub per_page: u32,
    /// Highest page number accepted by the comment listing.
    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: u32,
    /// Seconds after creation during which the author may edit (0 = no limit).
    #[serde(default = "default_editing_time_limit")]
    pub editing_time_limit_secs: u64,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            per_page: default_comments_per_page(),
            max_page_limit: default_max_page_limit(),
            editing_time_limit_secs: default_editing_time_limit(),
        }
    }
}

fn default_comments_per_page() -> u32 {
    50
}

fn default_max_page_limit() -> u32 {
    100
}

fn default_editing_time_limit() -> u64 {
    3600
}

/// External full-text search index configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchIndexConfig {
    /// Base URL of the index server (e.g., "http://localhost:9200")
    pub url: String,
    /// Name of the torrent index
    #[serde(default = "default_index_name")]
    pub index: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_index_name() -> String {
    "nyaa".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Sanitized config for API responses
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub browse: SanitizedBrowseConfig,
    pub comments: CommentsConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_index: Option<SanitizedSearchIndexConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
}

/// Browse config without the tracker list
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedBrowseConfig {
    pub per_page: u32,
    pub use_search_index: bool,
    pub max_search_results: u32,
    pub trackers_configured: usize,
}

/// Search index config with the URL hidden (it may carry credentials)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSearchIndexConfig {
    pub index: String,
    pub url_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: match config.auth.method {
                    AuthMethod::None => "none".to_string(),
                    AuthMethod::ApiKey => "api_key".to_string(),
                },
            },
            server: config.server.clone(),
            browse: SanitizedBrowseConfig {
                per_page: config.browse.per_page,
                use_search_index: config.browse.use_search_index,
                max_search_results: config.browse.max_search_results,
                trackers_configured: config.browse.trackers.len(),
            },
            comments: config.comments.clone(),
            search_index: config
                .search_index
                .as_ref()
                .map(|s| SanitizedSearchIndexConfig {
                    index: s.index.clone(),
                    url_configured: !s.url.is_empty(),
                    timeout_secs: s.timeout_secs,
                }),
        }
    }
}
