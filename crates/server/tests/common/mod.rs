//! Common test utilities for E2E testing with mocks.
//!
//! The fixture builds the full router in-process over a seeded SQLite
//! database and a mock search index, so no external services are needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use nyaa_core::{
    create_authenticator, testing::MockSearchIndex, AuthConfig, AuthMethod, BrowseConfig,
    BrowseEngine, CommentService, CommentsConfig, Config, DatabaseConfig, SearchIndex,
    ServerConfig, SqliteCommentStore,
};

/// Re-export fixtures for test convenience
pub use nyaa_core::testing::fixtures;
use fixtures::SeededDatabase;

/// Test fixture for E2E testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_browse() {
///     let fixture = TestFixture::new();
///     let response = fixture.get("/api/v3/browse?q=show").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock search index - configure hits, inspect requests
    pub search_index: Arc<MockSearchIndex>,
    /// Seeded users and torrents
    pub seeded: SeededDatabase,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default settings.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(test_config: TestConfig) -> Self {
        let seeded = fixtures::seeded_database();
        let search_index = Arc::new(MockSearchIndex::new());

        let config = Config {
            auth: AuthConfig {
                method: AuthMethod::ApiKey,
            },
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig::default(),
            browse: BrowseConfig {
                per_page: test_config.per_page,
                use_search_index: test_config.use_search_index,
                max_search_results: test_config.max_search_results,
                trackers: vec!["http://tracker.example/announce".to_string()],
            },
            comments: CommentsConfig {
                per_page: 2,
                max_page_limit: 5,
                editing_time_limit_secs: test_config.editing_time_limit_secs,
            },
            search_index: None,
        };

        let users = Arc::new(seeded.users.clone());
        let catalog = Arc::new(seeded.catalog.clone());

        let authenticator = Arc::from(create_authenticator(&config.auth, users.clone()));
        let engine = BrowseEngine::new(
            config.browse.clone(),
            users,
            catalog.clone(),
            Some(Arc::clone(&search_index) as Arc<dyn SearchIndex>),
        );
        let comments = CommentService::new(
            catalog,
            Arc::new(SqliteCommentStore::new(seeded.db.clone())),
            config.comments.clone(),
        );

        let state = Arc::new(nyaa_server::state::AppState::new(
            config,
            authenticator,
            engine,
            comments,
        ));
        let router = nyaa_server::api::create_router(state);

        Self {
            router,
            search_index,
            seeded,
        }
    }

    /// Send an anonymous GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, None).await
    }

    /// Send a GET request with an API key.
    pub async fn get_as(&self, path: &str, api_key: &str) -> TestResponse {
        self.request("GET", path, None, Some(api_key)).await
    }

    /// Send an anonymous POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), None).await
    }

    /// Send a POST request with JSON body and an API key.
    pub async fn post_as(&self, path: &str, body: Value, api_key: &str) -> TestResponse {
        self.request("POST", path, Some(body), Some(api_key)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw_as(&self, path: &str, body: &str, api_key: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .header("X-API-Key", api_key)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a form-encoded POST request with an API key.
    pub async fn post_form_as(&self, path: &str, body: &str, api_key: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("X-API-Key", api_key)
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        api_key: Option<&str>,
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        if let Some(key) = api_key {
            request_builder = request_builder.header("Authorization", format!("Bearer {}", key));
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub per_page: u32,
    pub use_search_index: bool,
    pub max_search_results: u32,
    pub editing_time_limit_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            per_page: 75,
            use_search_index: false,
            max_search_results: 1000,
            editing_time_limit_secs: 3600,
        }
    }
}

impl TestConfig {
    /// Route term queries to the mock search index.
    pub fn with_search_index(max_search_results: u32, per_page: u32) -> Self {
        Self {
            per_page,
            use_search_index: true,
            max_search_results,
            ..Default::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert the response is an error envelope with one message.
#[macro_export]
macro_rules! assert_error {
    ($response:expr, $status:expr, $message:expr) => {
        assert_status!($response, $status);
        assert_eq!(
            $response.body,
            serde_json::json!({ "errors": [$message] }),
            "Unexpected error body"
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
