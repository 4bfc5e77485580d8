use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Viewer};

/// Authenticator that serves every request as an anonymous viewer.
pub struct NoneAuthenticator;

impl NoneAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoneAuthenticator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Authenticator for NoneAuthenticator {
    async fn authenticate(&self, _request: &AuthRequest) -> Result<Option<Viewer>, AuthError> {
        Ok(None)
    }

    fn method_name(&self) -> &'static str {
        "none"
    }
}
