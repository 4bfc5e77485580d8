use tracing::debug;

use super::params::{aliases, QueryParams};
use super::spec::{QuerySpec, SortKey, SortOrder, DEFAULT_QUALITY_FILTER};
use crate::category::CategoryKey;
use crate::error::{BrowseError, RSS_NOT_ALLOWED, USER_NOT_FOUND};
use crate::users::UserDirectory;

/// Page value that asks for the RSS feed, which this API does not serve.
const RSS_PAGE: &str = "rss";

/// Lenient page parsing: anything that is not an integer >= 1 becomes 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|page| *page >= 1)
        .map(|page| u32::try_from(page).unwrap_or(u32::MAX))
        .unwrap_or(1)
}

/// Build the canonical query for a browse request.
///
/// Only three things fail: an RSS page request (checked before anything
/// else), an unknown sort key/order, and a username that does not resolve.
/// Every other field falls back to its default.
pub fn normalize(
    params: &QueryParams,
    per_page: u32,
    users: &dyn UserDirectory,
) -> Result<QuerySpec, BrowseError> {
    if params
        .all_of(aliases::PAGE)
        .any(|page| page.eq_ignore_ascii_case(RSS_PAGE))
    {
        return Err(BrowseError::Validation(RSS_NOT_ALLOWED.to_string()));
    }

    let sort_key = match params.non_empty(aliases::SORT) {
        Some(raw) => raw.parse::<SortKey>().map_err(BrowseError::Validation)?,
        None => SortKey::default(),
    };

    let sort_order = match params.non_empty(aliases::ORDER) {
        Some(raw) => raw.parse::<SortOrder>().map_err(BrowseError::Validation)?,
        None => SortOrder::default(),
    };

    let user_id = match params.non_empty(aliases::USER) {
        Some(username) => {
            let user = users
                .by_username(username)?
                .ok_or_else(|| BrowseError::NotFound(USER_NOT_FOUND.to_string()))?;
            Some(user.id)
        }
        None => None,
    };

    let spec = QuerySpec {
        term: params
            .first_of(aliases::TERM)
            .map(|t| t.trim().to_string())
            .unwrap_or_default(),
        category: params
            .non_empty(aliases::CATEGORY)
            .map(CategoryKey::decode)
            .unwrap_or_default(),
        quality_filter: params
            .non_empty(aliases::FILTER)
            .unwrap_or(DEFAULT_QUALITY_FILTER)
            .to_string(),
        sort_key,
        sort_order,
        user_id,
        page: parse_page(params.first_of(aliases::PAGE)),
        per_page,
        max_search_results: None,
    };

    debug!(
        term = %spec.term,
        category = %spec.category,
        page = spec.page,
        user = ?spec.user_id,
        "Normalized browse query"
    );

    Ok(spec)
}
