// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock search adapter with fixed hits and call logging.

use std::sync::Mutex;

use async_trait::async_trait;

use mentora_core::MentoraError;
use mentora_core::traits::adapter::PluginAdapter;
use mentora_core::traits::search::SearchAdapter;
use mentora_core::types::{AdapterType, DocumentKind, FetchedDocument, HealthStatus, SearchHit};

/// A mock search adapter that returns a fixed hit list and logs every
/// query and fetched URL for later assertion.
pub struct StaticSearch {
    hits: Vec<SearchHit>,
    searched: Mutex<Vec<String>>,
    fetched: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            searched: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Convenience hit for result lists in tests.
    pub fn hit(title: &str, url: &str) -> SearchHit {
        SearchHit {
            title: title.to_string(),
            url: url.to_string(),
            source: "mock".to_string(),
            snippet: Some(format!("snippet for {title}")),
            timestamp: None,
        }
    }

    /// Queries observed by `search`, in call order.
    pub fn searched(&self) -> Vec<String> {
        self.searched.lock().expect("search log poisoned").clone()
    }

    /// URLs observed by `fetch`, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().expect("fetch log poisoned").clone()
    }
}

impl Default for StaticSearch {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl PluginAdapter for StaticSearch {
    fn name(&self) -> &str {
        "static-search"
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
impl SearchAdapter for StaticSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.searched
            .lock()
            .expect("search log poisoned")
            .push(query.to_string());
        self.hits.iter().take(limit).cloned().collect()
    }

    async fn fetch(&self, url: &str) -> FetchedDocument {
        self.fetched
            .lock()
            .expect("fetch log poisoned")
            .push(url.to_string());
        FetchedDocument {
            title: "Mock Document".to_string(),
            url: url.to_string(),
            text: "mock document text".to_string(),
            kind: DocumentKind::Html,
            error: None,
        }
    }
}
