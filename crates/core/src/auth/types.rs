use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

use crate::users::User;

/// Request information for authentication
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub headers: HashMap<String, String>,
    pub source_ip: IpAddr,
}

/// The identity performing a request, with its privilege flags.
///
/// Handlers receive `Option<Viewer>`; `None` is an anonymous visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub user_id: i64,
    pub username: String,
    pub is_moderator: bool,
    pub is_superadmin: bool,
}

impl Viewer {
    /// Whether this viewer is the given user.
    pub fn is_user(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_moderator: user.is_moderator(),
            is_superadmin: user.is_superadmin(),
        }
    }
}
