// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::MentoraError;
use crate::traits::adapter::PluginAdapter;
use crate::types::EmbeddingRole;

/// Adapter for generating vector embeddings from text.
///
/// Embedding adapters power topic normalization and semantic note
/// search. The same text embedded under different roles may yield
/// different vectors (asymmetric retrieval models), so callers must
/// pass the role explicitly.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Embeds a single text under the given retrieval role.
    ///
    /// The returned vector has a fixed dimensionality per deployment.
    async fn embed(&self, text: &str, role: EmbeddingRole) -> Result<Vec<f32>, MentoraError>;
}
