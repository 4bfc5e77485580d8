//! Comment listing, posting and editing.
//!
//! Comments are ordered by id, newest first. A comment list is only served
//! for a torrent the viewer can see, and edits are gated on authorship and
//! the configured editing window, both checked on every request.

mod pager;
mod sqlite;
mod types;

pub use pager::{editing_limit_exceeded, parse_comment_page};
pub use sqlite::SqliteCommentStore;
pub use types::*;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::auth::Viewer;
use crate::catalog::{RelationalTorrentRecord, TorrentRecordStore};
use crate::config::CommentsConfig;
use crate::db::StoreError;
use crate::error::{parse_record_id, BrowseError, INVALID_TORRENT_ID, NOT_ALLOWED, TORRENT_NOT_FOUND};
use crate::pagination::PageWindow;
use crate::projector::can_view;

pub const INVALID_PAGE: &str = "Page Number was not a valid integer.";
pub const MAX_PAGE_REACHED: &str = "Maximum pagination limit reached.";
pub const NO_DATA: &str = "No data found";
pub const TORRENT_MISSING: &str = "Torrent not found.";
pub const COMMENT_NOT_FOUND: &str = "Comment not found.";
pub const INVALID_COMMENT_ID: &str = "Comment id was not a valid id.";
pub const EMPTY_COMMENT: &str = "Comment can't be empty.";
pub const EDIT_LIMIT_EXCEEDED: &str = "Editing time limit exceeded.";

/// Persistence for comments.
pub trait CommentStore: Send + Sync {
    /// Comments on a torrent, newest first; `None` returns all of them.
    fn list(&self, torrent_id: i64, window: Option<PageWindow>) -> Result<Vec<Comment>, StoreError>;

    fn get(&self, comment_id: i64) -> Result<Option<Comment>, StoreError>;

    /// Insert a comment and refresh the torrent's comment count atomically.
    fn add(&self, torrent_id: i64, author_id: i64, text: &str) -> Result<Comment, StoreError>;

    /// Replace the text and stamp `edited_time`.
    fn update_text(
        &self,
        comment_id: i64,
        text: &str,
        edited_at: DateTime<Utc>,
    ) -> Result<Comment, StoreError>;
}

/// Comment operations with visibility and edit rules applied.
pub struct CommentService {
    torrents: Arc<dyn TorrentRecordStore>,
    comments: Arc<dyn CommentStore>,
    config: CommentsConfig,
}

impl CommentService {
    pub fn new(
        torrents: Arc<dyn TorrentRecordStore>,
        comments: Arc<dyn CommentStore>,
        config: CommentsConfig,
    ) -> Self {
        Self {
            torrents,
            comments,
            config,
        }
    }

    /// The torrent, if it exists and the viewer may see it.
    fn visible_torrent(
        &self,
        torrent_id: i64,
        viewer: Option<&Viewer>,
        message: &str,
    ) -> Result<RelationalTorrentRecord, BrowseError> {
        match self.torrents.by_id(torrent_id)? {
            Some(torrent) if can_view(torrent.deleted, viewer) => Ok(torrent),
            _ => Err(BrowseError::NotFound(message.to_string())),
        }
    }

    /// List comments for `GET /info/{id}/comments[/{page}]`.
    pub fn list(
        &self,
        raw_torrent_id: &str,
        raw_page: Option<&str>,
        viewer: Option<&Viewer>,
    ) -> Result<Vec<Comment>, BrowseError> {
        let torrent_id = parse_record_id(raw_torrent_id, INVALID_TORRENT_ID)?;
        self.visible_torrent(torrent_id, viewer, TORRENT_NOT_FOUND)?;

        let window = match parse_comment_page(raw_page, self.config.max_page_limit)? {
            CommentPage::All => None,
            CommentPage::Page(page) => Some(PageWindow::new(page, self.config.per_page)),
        };

        let comments = self.comments.list(torrent_id, window)?;
        debug!(torrent_id, count = comments.len(), "Listed comments");

        if comments.is_empty() {
            return Err(BrowseError::EmptyResult(NO_DATA.to_string()));
        }
        Ok(comments)
    }

    /// Post a comment as `viewer`.
    pub fn add(
        &self,
        raw_torrent_id: &str,
        text: &str,
        viewer: Option<&Viewer>,
    ) -> Result<Comment, BrowseError> {
        let viewer = viewer.ok_or_else(|| BrowseError::Forbidden(NOT_ALLOWED.to_string()))?;
        let torrent_id = parse_record_id(raw_torrent_id, INVALID_TORRENT_ID)?;
        self.visible_torrent(torrent_id, Some(viewer), TORRENT_MISSING)?;

        if text.is_empty() {
            return Err(BrowseError::Validation(EMPTY_COMMENT.to_string()));
        }

        let comment = self.comments.add(torrent_id, viewer.user_id, text)?;
        info!(
            torrent_id,
            comment_id = comment.id,
            author = %viewer.username,
            "Comment added"
        );
        Ok(comment)
    }

    /// Edit a comment as `viewer`, checking the window against the current time.
    pub fn edit(
        &self,
        raw_torrent_id: &str,
        raw_comment_id: &str,
        text: &str,
        viewer: Option<&Viewer>,
    ) -> Result<Comment, BrowseError> {
        self.edit_at(raw_torrent_id, raw_comment_id, text, viewer, Utc::now())
    }

    /// Edit a comment, checking the window against `now`.
    pub fn edit_at(
        &self,
        raw_torrent_id: &str,
        raw_comment_id: &str,
        text: &str,
        viewer: Option<&Viewer>,
        now: DateTime<Utc>,
    ) -> Result<Comment, BrowseError> {
        let viewer = viewer.ok_or_else(|| BrowseError::Forbidden(NOT_ALLOWED.to_string()))?;
        let torrent_id = parse_record_id(raw_torrent_id, INVALID_TORRENT_ID)?;
        let comment_id = parse_record_id(raw_comment_id, INVALID_COMMENT_ID)?;
        self.visible_torrent(torrent_id, Some(viewer), TORRENT_MISSING)?;

        let comment = self
            .comments
            .get(comment_id)?
            .filter(|c| c.torrent_id == torrent_id)
            .ok_or_else(|| BrowseError::NotFound(COMMENT_NOT_FOUND.to_string()))?;

        if !viewer.is_user(comment.author_id) {
            return Err(BrowseError::Forbidden(NOT_ALLOWED.to_string()));
        }

        if editing_limit_exceeded(comment.created_time, now, self.config.editing_time_limit_secs) {
            return Err(BrowseError::Validation(EDIT_LIMIT_EXCEEDED.to_string()));
        }

        if text.is_empty() {
            return Err(BrowseError::Validation(EMPTY_COMMENT.to_string()));
        }

        let edited = self.comments.update_text(comment_id, text, now)?;
        info!(torrent_id, comment_id, "Comment edited");
        Ok(edited)
    }
}
