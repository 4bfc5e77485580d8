//! Page bounds per backend.
//!
//! The relational store paginates natively and takes the requested page as
//! is. The search index can only return hits inside a fixed retrievable
//! window of `max_search_results`, so the page is capped to the last page
//! that still starts inside that window.

use serde::Serialize;

use crate::backend::BackendKind;

/// Page bounds handed to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// 1-based page actually executed.
    pub page: u32,
    pub per_page: u32,
    /// Rows to skip.
    pub offset: u64,
    /// Rows to fetch; smaller than `per_page` on a truncated last page.
    pub limit: u32,
}

impl PageWindow {
    /// Plain `(page - 1) * per_page` window.
    pub fn new(page: u32, per_page: u32) -> Self {
        let page = page.max(1);
        Self {
            page,
            per_page,
            offset: u64::from(page - 1) * u64::from(per_page),
            limit: per_page,
        }
    }
}

/// Last page of the search index's retrievable window: `ceil(max / per_page)`.
pub fn max_reachable_page(max_search_results: u32, per_page: u32) -> u32 {
    if per_page == 0 {
        return 1;
    }
    max_search_results.div_ceil(per_page).max(1)
}

/// Compute the window a backend executes for the requested page.
pub fn govern(
    kind: BackendKind,
    requested_page: u32,
    per_page: u32,
    max_search_results: u32,
) -> PageWindow {
    match kind {
        BackendKind::Relational => PageWindow::new(requested_page, per_page),
        BackendKind::SearchIndex => {
            let page = requested_page.min(max_reachable_page(max_search_results, per_page));
            let mut window = PageWindow::new(page, per_page);
            let remaining = u64::from(max_search_results).saturating_sub(window.offset);
            window.limit = u64::from(per_page).min(remaining) as u32;
            window
        }
    }
}
