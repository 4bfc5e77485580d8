//! Request-level errors shared by browse, info and comment operations.

use thiserror::Error;

use crate::auth::AuthError;
use crate::db::StoreError;
use crate::search_index::SearchIndexError;

/// Message used for both absent and hidden torrents, so a deleted record
/// cannot be told apart from one that never existed.
pub const TORRENT_NOT_FOUND: &str = "Query was not a valid id or hash.";
pub const INVALID_TORRENT_ID: &str = "Torrent id was not a valid id.";
pub const RSS_NOT_ALLOWED: &str = "RSS is not allowed from this API.";
pub const USER_NOT_FOUND: &str = "User not found.";
pub const NOT_ALLOWED: &str = "Not allowed.";

#[derive(Debug, Error)]
pub enum BrowseError {
    /// User input has the wrong shape.
    #[error("{0}")]
    Validation(String),

    /// Id or username does not resolve, or the record is hidden from the viewer.
    #[error("{0}")]
    NotFound(String),

    /// Credentials were supplied but did not check out.
    #[error("{0}")]
    Unauthorized(String),

    /// The action needs an identity or privilege the caller lacks.
    #[error("{0}")]
    Forbidden(String),

    /// The query ran but matched nothing.
    #[error("{0}")]
    EmptyResult(String),

    /// The selected backend failed. Never retried on the other backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for BrowseError {
    fn from(e: StoreError) -> Self {
        BrowseError::Backend(e.to_string())
    }
}

impl From<AuthError> for BrowseError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials(_) => BrowseError::Unauthorized(e.to_string()),
            AuthError::ServiceUnavailable(_) => BrowseError::Backend(e.to_string()),
        }
    }
}

impl From<SearchIndexError> for BrowseError {
    fn from(e: SearchIndexError) -> Self {
        BrowseError::Backend(e.to_string())
    }
}

/// Parse a record id from a path segment (`^[0-9]+$`).
pub fn parse_record_id(raw: &str, message: &str) -> Result<i64, BrowseError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BrowseError::Validation(message.to_string()));
    }
    raw.parse::<i64>()
        .map_err(|_| BrowseError::Validation(message.to_string()))
}
