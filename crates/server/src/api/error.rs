//! JSON error envelope shared by every API route.

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use nyaa_core::BrowseError;

/// Body of every error response: `{"errors": [message, ...]}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

/// A failed request, rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<BrowseError> for ApiError {
    fn from(e: BrowseError) -> Self {
        let status = match &e {
            BrowseError::Validation(_) => StatusCode::BAD_REQUEST,
            BrowseError::NotFound(_) | BrowseError::EmptyResult(_) => StatusCode::NOT_FOUND,
            BrowseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            BrowseError::Forbidden(_) => StatusCode::FORBIDDEN,
            BrowseError::Backend(_) => {
                error!(error = %e, "Backend failure");
                StatusCode::BAD_GATEWAY
            }
        };
        Self::new(status, e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                errors: vec![self.message],
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(error: BrowseError) -> (StatusCode, serde_json::Value) {
        let response = ApiError::from(error).into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let cases = [
            (BrowseError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (BrowseError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (BrowseError::EmptyResult("none".into()), StatusCode::NOT_FOUND),
            (BrowseError::Unauthorized("who".into()), StatusCode::UNAUTHORIZED),
            (BrowseError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (BrowseError::Backend("down".into()), StatusCode::BAD_GATEWAY),
        ];

        for (error, expected) in cases {
            let (status, _) = render(error).await;
            assert_eq!(status, expected);
        }
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let (_, body) = render(BrowseError::Validation("Page Number was not a valid integer.".into())).await;
        assert_eq!(
            body,
            serde_json::json!({"errors": ["Page Number was not a valid integer."]})
        );
    }
}
