use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::category::CategoryKey;

/// Quality filter used when the request does not name one.
pub const DEFAULT_QUALITY_FILTER: &str = "0";

/// Column a browse result is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Id,
    Size,
    Name,
    Seeders,
    Leechers,
    Downloads,
    Comments,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Size => "size",
            SortKey::Name => "name",
            SortKey::Seeders => "seeders",
            SortKey::Leechers => "leechers",
            SortKey::Downloads => "downloads",
            SortKey::Comments => "comments",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "size" => Ok(SortKey::Size),
            "name" => Ok(SortKey::Name),
            "seeders" => Ok(SortKey::Seeders),
            "leechers" => Ok(SortKey::Leechers),
            "downloads" => Ok(SortKey::Downloads),
            "comments" => Ok(SortKey::Comments),
            _ => Err(format!("Unknown sort key: {}", s)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

/// Canonical description of one browse/search request.
///
/// Built once per request by [`normalize`](super::normalize); `page` is
/// always at least 1. The serialized form is the `args` member of the
/// browse response and reflects what was actually executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySpec {
    pub term: String,
    pub category: CategoryKey,
    /// Opaque filter code, forwarded verbatim to the executing backend.
    pub quality_filter: String,
    #[serde(rename = "sort")]
    pub sort_key: SortKey,
    #[serde(rename = "order")]
    pub sort_order: SortOrder,
    #[serde(rename = "user")]
    pub user_id: Option<i64>,
    pub page: u32,
    pub per_page: u32,
    /// Set only when the query ran against the search index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_search_results: Option<u32>,
}

impl QuerySpec {
    /// Unfiltered first page, newest first.
    pub fn new(per_page: u32) -> Self {
        Self {
            term: String::new(),
            category: CategoryKey::ALL,
            quality_filter: DEFAULT_QUALITY_FILTER.to_string(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
            user_id: None,
            page: 1,
            per_page,
            max_search_results: None,
        }
    }
}
