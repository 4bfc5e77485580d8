//! Browse, torrent info and category handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use nyaa_core::{BrowseResponse, CanonicalTorrent, MainCategory, QueryParams};

use super::error::ApiError;
use super::middleware::CurrentViewer;
use crate::state::AppState;

/// `GET /browse`
///
/// Parameters are kept as ordered pairs so repeated keys and aliases resolve
/// the same way regardless of how the client spelled them.
pub async fn browse(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<BrowseResponse>, ApiError> {
    let params = QueryParams::from_pairs(pairs);
    let response = state.engine().browse(&params, viewer.as_ref()).await?;
    Ok(Json(response))
}

/// `GET /info/{id}`
pub async fn torrent_info(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Path(id): Path<String>,
) -> Result<Json<CanonicalTorrent>, ApiError> {
    let torrent = state.engine().torrent_info(&id, viewer.as_ref())?;
    Ok(Json(torrent))
}

/// `GET /categories`
pub async fn categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MainCategory>>, ApiError> {
    Ok(Json(state.engine().categories()?))
}
