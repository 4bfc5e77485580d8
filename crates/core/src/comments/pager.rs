//! Strict comment page parsing and the edit window.
//!
//! Unlike browse pages, a comment page that is not a plain non-negative
//! integer, or that is past the configured ceiling, is an error.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::{CommentPage, INVALID_PAGE, MAX_PAGE_REACHED};
use crate::error::BrowseError;

static PAGE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Parse the optional `{page}` path segment.
///
/// Missing and `0` both mean the whole list.
pub fn parse_comment_page(raw: Option<&str>, max_page_limit: u32) -> Result<CommentPage, BrowseError> {
    let Some(raw) = raw else {
        return Ok(CommentPage::All);
    };

    if !PAGE_NUMBER.is_match(raw) {
        return Err(BrowseError::Validation(INVALID_PAGE.to_string()));
    }

    // Digits only, so a parse failure can only be overflow.
    let page = match raw.parse::<u64>() {
        Ok(page) => page,
        Err(_) => return Err(BrowseError::Validation(MAX_PAGE_REACHED.to_string())),
    };

    if page > u64::from(max_page_limit) {
        return Err(BrowseError::Validation(MAX_PAGE_REACHED.to_string()));
    }

    Ok(match page {
        0 => CommentPage::All,
        page => CommentPage::Page(page as u32),
    })
}

/// Whether a comment created at `created` can no longer be edited at `now`.
///
/// A limit of 0 disables the window.
pub fn editing_limit_exceeded(created: DateTime<Utc>, now: DateTime<Utc>, limit_secs: u64) -> bool {
    if limit_secs == 0 {
        return false;
    }
    let elapsed = now.signed_duration_since(created).num_seconds();
    elapsed > i64::try_from(limit_secs).unwrap_or(i64::MAX)
}
