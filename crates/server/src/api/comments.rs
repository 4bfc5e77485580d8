//! Comment handlers.

use axum::{
    extract::{FromRequest, Path, Request, State},
    http::{header, StatusCode},
    Form, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use nyaa_core::Comment;

use super::error::ApiError;
use super::middleware::CurrentViewer;
use crate::state::AppState;

/// Request body for posting or editing a comment
#[derive(Debug, Deserialize)]
pub struct CommentBody {
    /// A missing field is treated like empty text.
    #[serde(default)]
    pub text: String,
}

/// Comment text from a form or JSON body, picked by `Content-Type`.
#[derive(Debug)]
pub struct CommentText(pub String);

impl<S> FromRequest<S> for CommentText
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = request
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let body = if is_form {
            let Form(body) = Form::<CommentBody>::from_request(request, state).await?;
            body
        } else {
            let Json(body) = Json::<CommentBody>::from_request(request, state).await?;
            body
        };
        Ok(CommentText(body.text))
    }
}

/// `GET /info/{id}/comments`
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state.comments().list(&id, None, viewer.as_ref())?;
    Ok(Json(comments))
}

/// `GET /info/{id}/comments/{page}`
pub async fn list_comments_page(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Path((id, page)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state.comments().list(&id, Some(&page), viewer.as_ref())?;
    Ok(Json(comments))
}

/// `GET /info/{id}/comments/add`
///
/// `add` shares the page segment, so it is answered as an invalid page.
pub async fn list_comments_reserved(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let comments = state.comments().list(&id, Some("add"), viewer.as_ref())?;
    Ok(Json(comments))
}

/// `POST /info/{id}/comments/add`
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Path(id): Path<String>,
    CommentText(text): CommentText,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.comments().add(&id, &text, viewer.as_ref())?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// `POST /info/{id}/comments/{comment_id}/edit`
pub async fn edit_comment(
    State(state): State<Arc<AppState>>,
    CurrentViewer(viewer): CurrentViewer,
    Path((id, comment_id)): Path<(String, String)>,
    CommentText(text): CommentText,
) -> Result<Json<Comment>, ApiError> {
    let comment = state
        .comments()
        .edit(&id, &comment_id, &text, viewer.as_ref())?;
    Ok(Json(comment))
}
