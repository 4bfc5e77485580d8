use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::middleware::{auth_middleware, metrics_middleware};
use super::{browse, comments, handlers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Operational
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Browse and info
        .route("/browse", get(browse::browse))
        .route("/categories", get(browse::categories))
        .route("/info/{id}", get(browse::torrent_info))
        // Comments
        .route("/info/{id}/comments", get(comments::list_comments))
        .route(
            "/info/{id}/comments/add",
            get(comments::list_comments_reserved).post(comments::add_comment),
        )
        // `{n}` is a page number here and a comment id below; the router
        // requires one name per segment position.
        .route("/info/{id}/comments/{n}", get(comments::list_comments_page))
        .route("/info/{id}/comments/{n}/edit", post(comments::edit_comment))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state);

    Router::new()
        .nest("/api/v3", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
