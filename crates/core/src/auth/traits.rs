use async_trait::async_trait;
use thiserror::Error;

use super::types::{AuthRequest, Viewer};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Authentication service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Resolve the viewer behind a request.
    ///
    /// Requests without credentials resolve to `Ok(None)` (anonymous);
    /// credentials that do not match anyone are an error.
    async fn authenticate(&self, request: &AuthRequest) -> Result<Option<Viewer>, AuthError>;

    /// Name of this authentication method
    fn method_name(&self) -> &'static str;
}
