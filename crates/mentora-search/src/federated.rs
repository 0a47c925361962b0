// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Federated web search across Brave and HackerNews, plus URL fetch.
//!
//! Every surface is infallible: a backend failure logs a warning and
//! contributes nothing, a fetch failure comes back as an error-shaped
//! [`FetchedDocument`]. The dialogue loop consumes results as-is and
//! never handles a search error.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use mentora_core::MentoraError;
use mentora_core::traits::adapter::PluginAdapter;
use mentora_core::traits::search::SearchAdapter;
use mentora_core::types::{AdapterType, DocumentKind, FetchedDocument, HealthStatus, SearchHit};

use crate::fetch::{extract_title, html_to_text, normalize_fetch_url};

const BRAVE_ENDPOINT: &str = "https://api.search.brave.com/res/v1/web/search";
const HACKERNEWS_ENDPOINT: &str = "https://hn.algolia.com/api/v1/search";

// --- Brave response shapes ---

#[derive(Deserialize)]
struct BraveResponse {
    web: Option<BraveWeb>,
}

#[derive(Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Deserialize)]
struct BraveResult {
    title: String,
    url: String,
    description: Option<String>,
    age: Option<String>,
}

// --- HackerNews Algolia response shapes ---

#[derive(Deserialize)]
struct HackerNewsResponse {
    #[serde(default)]
    hits: Vec<HackerNewsHit>,
}

#[derive(Deserialize)]
struct HackerNewsHit {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "objectID")]
    object_id: String,
    created_at: Option<String>,
}

/// Search adapter fanning out to Brave web search and HackerNews Algolia.
pub struct FederatedSearch {
    client: reqwest::Client,
    brave_api_key: Option<String>,
    brave_endpoint: String,
    hackernews_endpoint: String,
}

impl FederatedSearch {
    pub fn new(
        brave_api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, MentoraError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| MentoraError::Provider {
                message: "failed to build search HTTP client".to_string(),
                source: Some(Box::new(err)),
            })?;
        Ok(Self {
            client,
            brave_api_key,
            brave_endpoint: BRAVE_ENDPOINT.to_string(),
            hackernews_endpoint: HACKERNEWS_ENDPOINT.to_string(),
        })
    }

    /// Override backend endpoints, for tests against a local server.
    pub fn with_endpoints(
        mut self,
        brave_endpoint: impl Into<String>,
        hackernews_endpoint: impl Into<String>,
    ) -> Self {
        self.brave_endpoint = brave_endpoint.into();
        self.hackernews_endpoint = hackernews_endpoint.into();
        self
    }

    async fn search_brave(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let Some(key) = &self.brave_api_key else {
            debug!("brave search skipped, no API key configured");
            return Vec::new();
        };

        let response = self
            .client
            .get(&self.brave_endpoint)
            .header("X-Subscription-Token", key)
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", &limit.to_string())])
            .send()
            .await;
        let parsed: Result<BraveResponse, String> = match response {
            Ok(resp) if resp.status().is_success() => {
                resp.json().await.map_err(|err| err.to_string())
            }
            Ok(resp) => Err(format!("status {}", resp.status())),
            Err(err) => Err(err.to_string()),
        };

        match parsed {
            Ok(body) => body
                .web
                .map(|web| web.results)
                .unwrap_or_default()
                .into_iter()
                .take(limit)
                .map(|r| SearchHit {
                    title: r.title,
                    url: r.url,
                    source: "brave".to_string(),
                    snippet: r.description,
                    timestamp: r.age,
                })
                .collect(),
            Err(reason) => {
                warn!(%reason, "brave search failed, skipping source");
                Vec::new()
            }
        }
    }

    async fn search_hackernews(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let response = self
            .client
            .get(&self.hackernews_endpoint)
            .query(&[("query", query), ("hitsPerPage", &limit.to_string())])
            .send()
            .await;
        let parsed: Result<HackerNewsResponse, String> = match response {
            Ok(resp) if resp.status().is_success() => {
                resp.json().await.map_err(|err| err.to_string())
            }
            Ok(resp) => Err(format!("status {}", resp.status())),
            Err(err) => Err(err.to_string()),
        };

        match parsed {
            Ok(body) => body
                .hits
                .into_iter()
                .take(limit)
                .map(|hit| SearchHit {
                    title: hit.title.unwrap_or_else(|| "(untitled)".to_string()),
                    url: hit.url.unwrap_or_else(|| {
                        format!("https://news.ycombinator.com/item?id={}", hit.object_id)
                    }),
                    source: "hackernews".to_string(),
                    snippet: None,
                    timestamp: hit.created_at,
                })
                .collect(),
            Err(reason) => {
                warn!(%reason, "hackernews search failed, skipping source");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl PluginAdapter for FederatedSearch {
    fn name(&self) -> &str {
        "federated-search"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Search
    }

    async fn health_check(&self) -> Result<HealthStatus, MentoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MentoraError> {
        Ok(())
    }
}

#[async_trait]
impl SearchAdapter for FederatedSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let (brave, hackernews) = tokio::join!(
            self.search_brave(query, limit),
            self.search_hackernews(query, limit),
        );
        let mut hits = brave;
        hits.extend(hackernews);
        hits.truncate(limit.max(1));
        debug!(query, count = hits.len(), "federated search complete");
        hits
    }

    async fn fetch(&self, url: &str) -> FetchedDocument {
        let target = normalize_fetch_url(url);
        let response = match self.client.get(&target).send().await {
            Ok(resp) => resp,
            Err(err) => return FetchedDocument::failure(target, err.to_string()),
        };
        if !response.status().is_success() {
            return FetchedDocument::failure(
                target,
                format!("status {}", response.status()),
            );
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if content_type.starts_with("application/pdf") {
            return FetchedDocument::failure(target, "PDF content cannot be extracted");
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(err) => return FetchedDocument::failure(target, err.to_string()),
        };

        let kind = if target.contains("arxiv.org/abs/") {
            DocumentKind::Abstract
        } else {
            DocumentKind::Html
        };
        FetchedDocument {
            title: extract_title(&html).unwrap_or_else(|| target.clone()),
            url: target,
            text: html_to_text(&html),
            kind,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn searcher(server: &MockServer, brave_key: Option<&str>) -> FederatedSearch {
        FederatedSearch::new(brave_key.map(str::to_string), Duration::from_secs(5))
            .unwrap()
            .with_endpoints(
                format!("{}/brave", server.uri()),
                format!("{}/hn", server.uri()),
            )
    }

    fn brave_body() -> serde_json::Value {
        serde_json::json!({
            "web": {"results": [
                {"title": "Rust Blog", "url": "https://blog.rust-lang.org", "description": "news", "age": "2 days ago"}
            ]}
        })
    }

    fn hackernews_body() -> serde_json::Value {
        serde_json::json!({
            "hits": [
                {"title": "Show HN", "url": null, "objectID": "123", "created_at": "2026-01-01T00:00:00Z"}
            ]
        })
    }

    #[tokio::test]
    async fn combines_both_sources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/brave"))
            .and(header("X-Subscription-Token", "key"))
            .and(query_param("q", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(brave_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/hn"))
            .and(query_param("query", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(hackernews_body()))
            .mount(&server)
            .await;

        let hits = searcher(&server, Some("key")).search("rust", 5).await;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source, "brave");
        assert_eq!(hits[1].source, "hackernews");
        // Missing story URL falls back to the HN item page.
        assert_eq!(hits[1].url, "https://news.ycombinator.com/item?id=123");
    }

    #[tokio::test]
    async fn failing_source_is_skipped_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/brave"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/hn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(hackernews_body()))
            .mount(&server)
            .await;

        let hits = searcher(&server, Some("key")).search("rust", 5).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source, "hackernews");
    }

    #[tokio::test]
    async fn no_brave_key_skips_brave_entirely() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hn"))
            .respond_with(ResponseTemplate::new(200).set_body_json(hackernews_body()))
            .mount(&server)
            .await;

        let hits = searcher(&server, None).search("rust", 5).await;
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn total_failure_yields_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let hits = searcher(&server, Some("key")).search("rust", 5).await;
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn fetch_extracts_title_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><head><title>Test Page</title></head><body><p>Hello world.</p></body></html>",
                "text/html",
            ))
            .mount(&server)
            .await;

        let searcher = searcher(&server, None);
        let doc = searcher.fetch(&format!("{}/page", server.uri())).await;
        assert_eq!(doc.kind, DocumentKind::Html);
        assert_eq!(doc.title, "Test Page");
        assert!(doc.text.contains("Hello world."));
        assert!(doc.error.is_none());
    }

    #[tokio::test]
    async fn fetch_pdf_content_type_is_error_shaped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"),
            )
            .mount(&server)
            .await;

        let searcher = searcher(&server, None);
        let doc = searcher.fetch(&format!("{}/doc.pdf", server.uri())).await;
        assert_eq!(doc.kind, DocumentKind::Error);
        assert!(doc.error.unwrap().contains("PDF"));
    }

    #[tokio::test]
    async fn fetch_connection_failure_is_error_shaped() {
        let searcher = FederatedSearch::new(None, Duration::from_millis(200))
            .unwrap()
            .with_endpoints("http://127.0.0.1:1/brave", "http://127.0.0.1:1/hn");
        let doc = searcher.fetch("http://127.0.0.1:1/nope").await;
        assert_eq!(doc.kind, DocumentKind::Error);
        assert!(doc.error.is_some());
    }
}
