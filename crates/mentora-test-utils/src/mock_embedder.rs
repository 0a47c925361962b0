// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter with controlled vectors and call counting.
//!
//! `MockEmbedder` lets tests pin exact vectors per input text (so cosine
//! scores are predictable) and assert how many embed calls a code path
//! makes, e.g. that exact-match topic normalization never embeds.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use mentora_core::MentoraError;
use mentora_core::traits::adapter::PluginAdapter;
use mentora_core::traits::embedding::EmbeddingAdapter;
use mentora_core::types::{AdapterType, EmbeddingRole, HealthStatus};

/// A mock embedding adapter backed by a text-to-vector table.
///
/// Texts without a pinned vector get a deterministic fallback derived from
/// the text bytes, so distinct texts yield distinct (non-zero) vectors.
pub struct MockEmbedder {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    dimensions: usize,
    calls: AtomicUsize,
    fail: bool,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            vectors: Mutex::new(HashMap::new()),
            dimensions: 8,
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// An embedder whose every `embed` call fails with a provider error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Pin the vector returned for `text`, regardless of embedding role.
    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors
            .lock()
            .expect("vector table poisoned")
            .insert(text.to_string(), vector);
        self
    }

    /// Number of `embed` calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fallback_vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimensions] += f32::from(byte) / 255.0;
        }
        vector
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockEmbedder {
    fn name(&self) -> &str {
        "mock-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, MentoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MentoraError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, text: &str, _role: EmbeddingRole) -> Result<Vec<f32>, MentoraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MentoraError::provider("mock embedder configured to fail"));
        }
        let pinned = self
            .vectors
            .lock()
            .expect("vector table poisoned")
            .get(text)
            .cloned();
        Ok(pinned.unwrap_or_else(|| self.fallback_vector(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pinned_vector_is_returned() {
        let embedder = MockEmbedder::new().with_vector("rust", vec![1.0, 0.0]);
        let v = embedder.embed("rust", EmbeddingRole::Query).await.unwrap();
        assert_eq!(v, vec![1.0, 0.0]);
        assert_eq!(embedder.call_count(), 1);
    }

    #[tokio::test]
    async fn fallback_is_deterministic_and_distinct() {
        let embedder = MockEmbedder::new();
        let a = embedder.embed("alpha", EmbeddingRole::Query).await.unwrap();
        let a2 = embedder.embed("alpha", EmbeddingRole::Passage).await.unwrap();
        let b = embedder.embed("beta", EmbeddingRole::Query).await.unwrap();
        assert_eq!(a, a2);
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn failing_embedder_errors() {
        let embedder = MockEmbedder::failing();
        let err = embedder.embed("x", EmbeddingRole::Query).await.unwrap_err();
        assert!(err.to_string().contains("provider error"));
        assert_eq!(embedder.call_count(), 1);
    }
}
