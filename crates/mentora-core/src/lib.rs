// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Mentora tutor agent.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Mentora workspace. External collaborators
//! (LLM provider, embedding provider, search/fetch provider) are consumed
//! through the adapter traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MentoraError;
pub use types::{AdapterType, HealthStatus};

// Re-export all adapter traits at crate root.
pub use traits::{EmbeddingAdapter, PluginAdapter, ProviderAdapter, SearchAdapter};
