//! DuckDuckGo Instant Answer search gateway
//!
//! The Instant Answer API needs no API key. It answers with an abstract for
//! well-known entities, a list of related topics (possibly grouped), and a
//! short list of official results.

use async_trait::async_trait;
use brief_core::{GatewayError, Result, SearchGateway, SearchHit};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_BASE_URL: &str = "https://api.duckduckgo.com/";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("market-brief/", env!("CARGO_PKG_VERSION"));

/// Search gateway backed by the DuckDuckGo Instant Answer API
#[derive(Debug, Clone)]
pub struct DuckDuckGoSearch {
    client: Client,
    base_url: String,
}

impl DuckDuckGoSearch {
    /// Create a client with the default 10 second request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::search(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (e.g. a local mirror)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchGateway for DuckDuckGoSearch {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn search(&self, keyword: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", keyword),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = GatewayError::search(format!("DuckDuckGo API error {status}: {body}"));
            return Err(if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                err.retryable()
            } else {
                err
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            GatewayError::search(format!("Failed to parse DuckDuckGo response: {e}"))
        })?;

        let hits = parse_instant_answer(&body, max_results);
        debug!(hits = hits.len(), "search completed");
        Ok(hits)
    }
}

fn request_error(e: reqwest::Error) -> GatewayError {
    let err = GatewayError::search(format!("DuckDuckGo request failed: {e}"));
    if e.is_timeout() || e.is_connect() {
        err.retryable()
    } else {
        err
    }
}

/// Extract ranked hits from an Instant Answer response body
///
/// Order: the abstract, then related topics (topic groups are flattened in
/// place), then official results. Entries without text are skipped, and at
/// most `max_results` hits are returned.
pub fn parse_instant_answer(body: &Value, max_results: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    if let Some(text) = non_empty_str(body, "AbstractText") {
        let mut hit = SearchHit::new(text);
        if let Some(heading) = non_empty_str(body, "Heading") {
            hit = hit.with_title(heading);
        }
        if let Some(url) = non_empty_str(body, "AbstractURL") {
            hit = hit.with_url(url);
        }
        hits.push(hit);
    }

    if let Some(topics) = body.get("RelatedTopics").and_then(Value::as_array) {
        for topic in topics {
            match topic.get("Topics").and_then(Value::as_array) {
                Some(group) => hits.extend(group.iter().filter_map(topic_hit)),
                None => hits.extend(topic_hit(topic)),
            }
        }
    }

    if let Some(results) = body.get("Results").and_then(Value::as_array) {
        hits.extend(results.iter().filter_map(topic_hit));
    }

    hits.truncate(max_results);
    hits
}

fn topic_hit(entry: &Value) -> Option<SearchHit> {
    let text = non_empty_str(entry, "Text")?;
    let hit = SearchHit::new(text);
    Some(match non_empty_str(entry, "FirstURL") {
        Some(url) => hit.with_url(url),
        None => hit,
    })
}

fn non_empty_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_body() -> Value {
        json!({
            "Heading": "Nvidia",
            "AbstractText": "Nvidia Corporation is an American technology company.",
            "AbstractURL": "https://en.wikipedia.org/wiki/Nvidia",
            "RelatedTopics": [
                {"Text": "GeForce - brand of GPUs", "FirstURL": "https://duckduckgo.com/GeForce"},
                {
                    "Name": "Companies",
                    "Topics": [
                        {"Text": "AMD - semiconductor company", "FirstURL": "https://duckduckgo.com/AMD"},
                        {"Text": "Intel - chip maker", "FirstURL": "https://duckduckgo.com/Intel"}
                    ]
                },
                {"Text": "CUDA - parallel computing platform", "FirstURL": "https://duckduckgo.com/CUDA"}
            ],
            "Results": [
                {"Text": "Official site", "FirstURL": "https://www.nvidia.com"}
            ]
        })
    }

    #[test]
    fn test_abstract_comes_first() {
        let hits = parse_instant_answer(&sample_body(), 10);
        assert_eq!(
            hits[0],
            SearchHit::new("Nvidia Corporation is an American technology company.")
                .with_title("Nvidia")
                .with_url("https://en.wikipedia.org/wiki/Nvidia")
        );
    }

    #[test]
    fn test_topic_groups_flattened_in_order() {
        let texts: Vec<_> = parse_instant_answer(&sample_body(), 10)
            .into_iter()
            .map(|h| h.text)
            .collect();
        assert_eq!(
            texts,
            vec![
                "Nvidia Corporation is an American technology company.",
                "GeForce - brand of GPUs",
                "AMD - semiconductor company",
                "Intel - chip maker",
                "CUDA - parallel computing platform",
                "Official site",
            ]
        );
    }

    #[test]
    fn test_truncated_to_max_results() {
        let hits = parse_instant_answer(&sample_body(), 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].text, "GeForce - brand of GPUs");
        assert_eq!(hits[1].url.as_deref(), Some("https://duckduckgo.com/GeForce"));
        assert!(hits[1].title.is_none());
    }

    #[test]
    fn test_empty_response_yields_no_hits() {
        let body = json!({
            "Heading": "",
            "AbstractText": "",
            "RelatedTopics": [],
            "Results": []
        });
        assert!(parse_instant_answer(&body, 5).is_empty());
        assert!(parse_instant_answer(&json!({}), 5).is_empty());
    }

    #[test]
    fn test_entries_without_text_skipped() {
        let body = json!({
            "RelatedTopics": [
                {"FirstURL": "https://duckduckgo.com/x"},
                {"Text": "  ", "FirstURL": "https://duckduckgo.com/y"},
                {"Text": "kept"}
            ]
        });
        let hits = parse_instant_answer(&body, 5);
        assert_eq!(hits, vec![SearchHit::new("kept")]);
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_live_search() {
        let search = DuckDuckGoSearch::new().unwrap();
        let hits = search.search("Nvidia", 5).await.unwrap();
        assert!(hits.len() <= 5);
    }
}
