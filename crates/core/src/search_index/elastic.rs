//! Elasticsearch-compatible search index client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::{IndexSearch, SearchHitDocument, SearchIndex, SearchIndexError};
use crate::config::SearchIndexConfig;
use crate::query::{SortKey, SortOrder};

/// Search index backed by an Elasticsearch `_search` endpoint.
pub struct ElasticSearchIndex {
    client: Client,
    search_url: String,
}

impl ElasticSearchIndex {
    pub fn new(config: &SearchIndexConfig) -> Result<Self, SearchIndexError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SearchIndexError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            search_url: format!(
                "{}/{}/_search",
                config.url.trim_end_matches('/'),
                urlencoding::encode(&config.index)
            ),
        })
    }

    /// Build the `_search` request body.
    pub fn build_query(request: &IndexSearch) -> Value {
        let mut filters = Vec::new();

        if !request.include_deleted {
            filters.push(json!({ "term": { "deleted": false } }));
        }
        if let Some(main_id) = request.category.main_filter() {
            filters.push(json!({ "term": { "main_category_id": main_id } }));
        }
        if let Some(sub_id) = request.category.sub_filter() {
            filters.push(json!({ "term": { "sub_category_id": sub_id } }));
        }
        match request.quality_filter.as_str() {
            "1" => filters.push(json!({ "term": { "remake": false } })),
            "2" => filters.push(json!({ "term": { "trusted": true } })),
            _ => {}
        }
        if let Some(user_id) = request.user_id {
            filters.push(json!({ "term": { "uploader_id": user_id } }));
        }

        json!({
            "from": request.window.offset,
            "size": request.window.limit,
            "query": {
                "bool": {
                    "must": [{
                        "simple_query_string": {
                            "query": request.term,
                            "fields": ["display_name"],
                            "default_operator": "AND",
                        }
                    }],
                    "filter": filters,
                }
            },
            "sort": [{ sort_field(request.sort): { "order": order_str(request.order) } }],
        })
    }
}

fn sort_field(key: SortKey) -> &'static str {
    match key {
        SortKey::Id => "id",
        SortKey::Size => "filesize",
        SortKey::Name => "display_name.keyword",
        SortKey::Seeders => "seed_count",
        SortKey::Leechers => "leech_count",
        SortKey::Downloads => "download_count",
        SortKey::Comments => "comment_count",
    }
}

fn order_str(order: SortOrder) -> &'static str {
    order.as_str()
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id", default)]
    doc_id: Option<String>,
    #[serde(rename = "_source", default)]
    source: Map<String, Value>,
}

/// Decode one raw hit, taking the id from `_id` when the source lacks one.
fn decode_hit(hit: RawHit) -> Result<SearchHitDocument, SearchIndexError> {
    let mut source = hit.source;
    if !source.contains_key("id") {
        let id = hit
            .doc_id
            .as_deref()
            .and_then(|id| id.parse::<i64>().ok())
            .ok_or_else(|| SearchIndexError::Parse("hit without a numeric id".to_string()))?;
        source.insert("id".to_string(), Value::from(id));
    }
    serde_json::from_value(Value::Object(source)).map_err(|e| SearchIndexError::Parse(e.to_string()))
}

/// Decode a full `_search` response body.
pub fn parse_response(body: Value) -> Result<Vec<SearchHitDocument>, SearchIndexError> {
    let response: SearchResponse =
        serde_json::from_value(body).map_err(|e| SearchIndexError::Parse(e.to_string()))?;
    response.hits.hits.into_iter().map(decode_hit).collect()
}

#[async_trait]
impl SearchIndex for ElasticSearchIndex {
    fn name(&self) -> &str {
        "elasticsearch"
    }

    async fn search(&self, request: &IndexSearch) -> Result<Vec<SearchHitDocument>, SearchIndexError> {
        let body = Self::build_query(request);
        debug!(
            term = %request.term,
            from = request.window.offset,
            size = request.window.limit,
            "Querying search index"
        );

        let response = self
            .client
            .post(&self.search_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchIndexError::Timeout
                } else if e.is_connect() {
                    SearchIndexError::ConnectionFailed(e.to_string())
                } else {
                    SearchIndexError::ApiError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchIndexError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::Parse(e.to_string()))?;

        let hits = parse_response(body)?;
        debug!(hits = hits.len(), "Search index query complete");
        Ok(hits)
    }
}
