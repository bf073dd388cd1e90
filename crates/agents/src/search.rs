//! Web search backends used by the research agent.

use alchemy_common::{AlchemyError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One organic search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Return at most `limit` results for `query`.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;
}

/// Deterministic stand-in sources, used when no search key is configured.
pub struct PlaceholderSearch;

#[async_trait]
impl SearchProvider for PlaceholderSearch {
    fn name(&self) -> &str {
        "placeholder"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        Ok((1..=limit)
            .map(|i| SearchResult {
                title: format!("Research Source {i}"),
                link: format!("https://example.com/article{i}"),
                snippet: format!("Relevant information about {query}..."),
            })
            .collect())
    }
}

#[derive(Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SearchResult>,
}

/// SerpAPI over HTTP.
pub struct SerpApiSearch {
    endpoint: String,
    api_key: String,
    http_client: reqwest::Client,
}

impl SerpApiSearch {
    pub fn new(endpoint: Option<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.unwrap_or_else(|| SERPAPI_ENDPOINT.to_string()),
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SearchProvider for SerpApiSearch {
    fn name(&self) -> &str {
        "serpapi"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        debug!(endpoint = %self.endpoint, limit, "Querying SerpAPI");

        let num = limit.to_string();
        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("q", query), ("api_key", &self.api_key), ("num", &num)])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| AlchemyError::Search(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AlchemyError::Search(format!("SerpAPI returned {status}: {body}")));
        }

        let parsed: SerpApiResponse = response
            .json()
            .await
            .map_err(|e| AlchemyError::Search(format!("invalid response body: {e}")))?;

        let mut results = parsed.organic_results;
        results.truncate(limit);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_sources_are_numbered_from_one() {
        let results = PlaceholderSearch.search("rust async", 3).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Research Source 1");
        assert_eq!(results[2].link, "https://example.com/article3");
        assert_eq!(results[1].snippet, "Relevant information about rust async...");
    }

    #[test]
    fn serpapi_payload_tolerates_missing_fields() {
        let body = r#"{"organic_results": [{"title": "Only a title", "position": 1}]}"#;
        let parsed: SerpApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.organic_results[0].title, "Only a title");
        assert!(parsed.organic_results[0].snippet.is_empty());

        let empty: SerpApiResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.organic_results.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_search_error() {
        let search = SerpApiSearch::new(Some("http://127.0.0.1:1/search".into()), "key");
        let err = search.search("anything", 5).await.unwrap_err();
        assert!(matches!(err, AlchemyError::Search(_)));
    }
}
