mod api_key;
mod none;
mod traits;
mod types;

pub use api_key::*;
pub use none::*;
pub use traits::*;
pub use types::*;

use std::sync::Arc;

use crate::config::{AuthConfig, AuthMethod};
use crate::users::UserDirectory;

/// Factory function to create authenticator from config
pub fn create_authenticator(
    config: &AuthConfig,
    users: Arc<dyn UserDirectory>,
) -> Box<dyn Authenticator> {
    match config.method {
        AuthMethod::None => Box::new(NoneAuthenticator::new()),
        AuthMethod::ApiKey => Box::new(ApiKeyAuthenticator::new(users)),
    }
}
