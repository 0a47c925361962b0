// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Mentora integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests
//! without external services.
//!
//! # Components
//!
//! - [`ScriptedProvider`] - Mock LLM provider replaying a scripted response queue
//! - [`MockEmbedder`] - Mock embedding adapter with per-text vectors and a call counter
//! - [`StaticSearch`] - Mock search adapter with fixed hits and call logging

pub mod mock_embedder;
pub mod mock_provider;
pub mod mock_search;

pub use mock_embedder::MockEmbedder;
pub use mock_provider::ScriptedProvider;
pub use mock_search::StaticSearch;
