//! User directory: username/id/API-key lookups used by the normalizer,
//! the authenticator and comment projection.

mod sqlite;
mod types;

pub use sqlite::SqliteUserDirectory;
pub use types::*;

use crate::db::StoreError;

/// Read access to registered users.
pub trait UserDirectory: Send + Sync {
    /// Look up a user by username (case-insensitive).
    fn by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Look up a user by id.
    fn by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Look up the user owning an API key, by the key's SHA-256 digest.
    fn by_api_key_digest(&self, digest: &str) -> Result<Option<User>, StoreError>;
}
