use chrono::{DateTime, Utc};
use serde::Serialize;

/// A comment on a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub torrent_id: i64,
    pub author_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub text: String,
    pub created_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_time: Option<DateTime<Utc>>,
}

/// Which part of a comment list to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPage {
    /// Every comment, unpaged.
    All,
    /// One 1-based page.
    Page(u32),
}
