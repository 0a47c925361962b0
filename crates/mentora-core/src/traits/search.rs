// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Search adapter trait for federated web search and URL fetch.

use async_trait::async_trait;

use crate::traits::adapter::PluginAdapter;
use crate::types::{FetchedDocument, SearchHit};

/// Adapter for web search and document fetch.
///
/// Both operations are infallible at the signature level: backend
/// failures degrade to an empty hit list or an error-shaped document.
/// The dialogue loop invokes these mid-conversation and must never
/// abort a user-facing answer over a network failure.
#[async_trait]
pub trait SearchAdapter: PluginAdapter {
    /// Searches all configured backends and returns merged hits.
    async fn search(&self, query: &str, limit: usize) -> Vec<SearchHit>;

    /// Fetches a URL and extracts readable text.
    async fn fetch(&self, url: &str) -> FetchedDocument;
}
