//! Authentication and metrics middleware for API routes.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use nyaa_core::{AuthError, AuthRequest, BrowseError, Viewer};

use super::error::ApiError;
use crate::metrics::{
    normalize_path, AUTH_FAILURES_TOTAL, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL,
    HTTP_REQUEST_DURATION,
};
use crate::state::AppState;

/// Metrics middleware that tracks HTTP request duration and counts.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

/// Resolves the viewer for every request.
///
/// Requests without credentials continue as anonymous. Credentials that do
/// not match a user are rejected with 401 before reaching any handler.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let headers: HashMap<String, String> = request
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_lowercase(), v.to_string()))
        })
        .collect();

    // Get source IP (default to localhost if not available)
    let source_ip = request
        .extensions()
        .get::<std::net::SocketAddr>()
        .map(|addr| addr.ip())
        .unwrap_or(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST));

    let auth_request = AuthRequest { headers, source_ip };

    match state.authenticator().authenticate(&auth_request).await {
        Ok(viewer) => {
            debug!(
                viewer = viewer.as_ref().map(|v| v.username.as_str()).unwrap_or("anonymous"),
                "Resolved viewer"
            );
            request.extensions_mut().insert(viewer);
            Ok(next.run(request).await)
        }
        Err(e) => {
            let reason = match &e {
                AuthError::InvalidCredentials(_) => "invalid_credentials",
                AuthError::ServiceUnavailable(_) => "internal_error",
            };
            AUTH_FAILURES_TOTAL.with_label_values(&[reason]).inc();
            Err(BrowseError::from(e).into())
        }
    }
}

/// Extractor for the viewer resolved by [`auth_middleware`].
///
/// `None` is the anonymous viewer, which is also what routes outside the
/// middleware see.
#[derive(Debug, Clone)]
pub struct CurrentViewer(pub Option<Viewer>);

impl<S> FromRequestParts<S> for CurrentViewer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let viewer = parts
            .extensions
            .get::<Option<Viewer>>()
            .cloned()
            .flatten();
        std::future::ready(Ok(CurrentViewer(viewer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use http_body_util::BodyExt;
    use nyaa_core::{
        create_authenticator, testing::fixtures, AuthConfig, AuthMethod, BrowseConfig,
        BrowseEngine, CommentService, CommentsConfig, Config, DatabaseConfig, ServerConfig,
        SqliteCommentStore,
    };
    use tower::ServiceExt;

    async fn viewer_handler(CurrentViewer(viewer): CurrentViewer) -> String {
        viewer
            .map(|v| v.username)
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn create_test_state(method: AuthMethod) -> Arc<AppState> {
        let seeded = fixtures::seeded_database();
        let users = Arc::new(seeded.users.clone());
        let catalog = Arc::new(seeded.catalog.clone());

        let config = Config {
            auth: AuthConfig { method },
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            browse: BrowseConfig::default(),
            comments: CommentsConfig::default(),
            search_index: None,
        };
        let authenticator = Arc::from(create_authenticator(&config.auth, users.clone()));
        let engine = BrowseEngine::new(config.browse.clone(), users, catalog.clone(), None);
        let comments = CommentService::new(
            catalog,
            Arc::new(SqliteCommentStore::new(seeded.db.clone())),
            config.comments.clone(),
        );

        Arc::new(AppState::new(config, authenticator, engine, comments))
    }

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/test", get(viewer_handler))
            .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_none_auth_is_anonymous() {
        let app = app(create_test_state(AuthMethod::None));
        let request = Request::builder()
            .uri("/test")
            .header("X-API-Key", fixtures::REGULAR_KEY)
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn test_api_key_bearer_resolves_user() {
        let app = app(create_test_state(AuthMethod::ApiKey));
        let request = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, format!("Bearer {}", fixtures::MODERATOR_KEY))
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "moderator");
    }

    #[tokio::test]
    async fn test_x_api_key_header() {
        let app = app(create_test_state(AuthMethod::ApiKey));
        let request = Request::builder()
            .uri("/test")
            .header("X-API-Key", fixtures::REGULAR_KEY)
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "regular");
    }

    #[tokio::test]
    async fn test_missing_key_is_anonymous() {
        let app = app(create_test_state(AuthMethod::ApiKey));
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn test_invalid_key_is_rejected_with_envelope() {
        let app = app(create_test_state(AuthMethod::ApiKey));
        let request = Request::builder()
            .uri("/test")
            .header(header::AUTHORIZATION, "Bearer wrong-key")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(json["errors"][0].as_str().unwrap().contains("Invalid credentials"));
    }
}
