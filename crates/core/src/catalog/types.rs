//! Types for the relational torrent catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::CategoryKey;
use crate::pagination::PageWindow;
use crate::query::{SortKey, SortOrder};

/// The user who uploaded a torrent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploader {
    pub id: i64,
    pub name: String,
}

/// Tracker counters for a torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRow {
    pub seed_count: u32,
    pub leech_count: u32,
    pub download_count: u32,
}

/// A torrent row joined with its categories, uploader and stats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalTorrentRecord {
    pub id: i64,
    /// 40-character lowercase hex.
    pub info_hash: String,
    pub display_name: String,
    pub information: String,
    pub description: String,
    pub filesize: u64,
    pub main_category_id: u32,
    pub main_category_name: Option<String>,
    pub sub_category_id: u32,
    pub sub_category_name: Option<String>,
    pub trusted: bool,
    pub complete: bool,
    pub remake: bool,
    pub anonymous: bool,
    pub deleted: bool,
    pub uploader: Option<Uploader>,
    /// Absent until the tracker scraper has written a stats row.
    pub stats: Option<StatsRow>,
    pub comment_count: u32,
    pub created_time: DateTime<Utc>,
}

/// A search request as the relational store sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationalSearch {
    pub term: String,
    pub user_id: Option<i64>,
    pub category: CategoryKey,
    pub quality_filter: String,
    pub sort: SortKey,
    pub order: SortOrder,
    pub window: PageWindow,
    pub include_deleted: bool,
}

/// Fields for inserting a torrent.
#[derive(Debug, Clone, Default)]
pub struct NewTorrent {
    pub info_hash: String,
    pub display_name: String,
    pub information: String,
    pub description: String,
    pub filesize: u64,
    pub category: CategoryKey,
    pub trusted: bool,
    pub complete: bool,
    pub remake: bool,
    pub anonymous: bool,
    pub uploader_id: Option<i64>,
}

/// A sub category as listed by `GET /categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubCategory {
    pub name: String,
    pub id_as_string: String,
}

/// A main category and its sub categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainCategory {
    pub name: String,
    pub id_as_string: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_categories: Vec<SubCategory>,
}
