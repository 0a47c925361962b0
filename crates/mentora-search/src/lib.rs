// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Federated web search and URL fetch for the Mentora tutor agent.
//!
//! [`FederatedSearch`] fans queries out to Brave web search and the
//! HackerNews Algolia API and fetches pages as readable plain text. All
//! failures degrade to empty or error-shaped results.

pub mod federated;
pub mod fetch;

pub use federated::FederatedSearch;
pub use fetch::{extract_title, html_to_text, normalize_fetch_url};
