//! Per-user API key authentication.

use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{AuthError, AuthRequest, Authenticator, Viewer};
use crate::users::UserDirectory;

/// SHA-256 hex digest under which API keys are stored.
pub fn digest_api_key(key: &str) -> String {
    format!("{:x}", Sha256::digest(key.as_bytes()))
}

/// Authenticator that resolves API keys to users in the user directory.
///
/// Accepts the key in either:
/// - `Authorization: Bearer <key>` header
/// - `X-API-Key: <key>` header
pub struct ApiKeyAuthenticator {
    users: Arc<dyn UserDirectory>,
}

impl ApiKeyAuthenticator {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// Extract API key from request headers.
    fn extract_key<'a>(&self, request: &'a AuthRequest) -> Option<&'a str> {
        if let Some(auth_header) = request.headers.get("authorization") {
            if let Some(key) = auth_header
                .strip_prefix("Bearer ")
                .or_else(|| auth_header.strip_prefix("bearer "))
            {
                return Some(key.trim());
            }
        }

        request.headers.get("x-api-key").map(|key| key.trim())
    }
}

#[async_trait]
impl Authenticator for ApiKeyAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Option<Viewer>, AuthError> {
        let Some(key) = self.extract_key(request) else {
            return Ok(None);
        };

        let user = self
            .users
            .by_api_key_digest(&digest_api_key(key))
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?
            .ok_or_else(|| AuthError::InvalidCredentials("Invalid API key".to_string()))?;

        Ok(Some(Viewer::from(&user)))
    }

    fn method_name(&self) -> &'static str {
        "api_key"
    }
}
