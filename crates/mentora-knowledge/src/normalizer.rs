// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic normalization against the canonical topic index.
//!
//! Maps free-form topic mentions ("rust lang", "the rust language") onto
//! existing canonical topics via embedding similarity, so the knowledge
//! base accumulates one profile per concept instead of one per spelling.

use std::sync::Arc;

use tracing::debug;

use mentora_core::MentoraError;
use mentora_core::traits::embedding::EmbeddingAdapter;
use mentora_core::types::EmbeddingRole;

use crate::similarity::cosine_similarity;

/// The outcome of normalizing a raw topic mention.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// The topic name to use for reads and writes.
    pub canonical: String,
    /// The existing topic this mention merged into, if any.
    pub matched: Option<String>,
    /// Best similarity score against the existing topics.
    pub score: f32,
}

/// Normalizes raw topic mentions against existing canonical topics.
pub struct TopicNormalizer {
    embedder: Arc<dyn EmbeddingAdapter>,
    threshold: f32,
}

impl TopicNormalizer {
    pub fn new(embedder: Arc<dyn EmbeddingAdapter>, threshold: f32) -> Self {
        Self {
            embedder,
            threshold,
        }
    }

    /// Resolve `raw` against `existing` canonical topic names.
    ///
    /// Cheap paths first: an empty index or a case-insensitive exact match
    /// resolves without any embedding call. Otherwise `raw` is embedded as
    /// a query, each existing topic as a passage, and the arg-max cosine
    /// decides: at or above the threshold the mention merges into the
    /// existing topic (boundary inclusive), below it the raw spelling
    /// becomes a new topic.
    pub async fn normalize(
        &self,
        raw: &str,
        existing: &[String],
    ) -> Result<Normalized, MentoraError> {
        let raw = raw.trim();
        if existing.is_empty() || raw.is_empty() {
            return Ok(Normalized {
                canonical: raw.to_string(),
                matched: None,
                score: 0.0,
            });
        }

        if let Some(spelling) = existing.iter().find(|t| t.eq_ignore_ascii_case(raw)) {
            return Ok(Normalized {
                canonical: spelling.clone(),
                matched: Some(spelling.clone()),
                score: 1.0,
            });
        }

        let scored = self.score_against(raw, existing).await?;
        let best = scored
            .into_iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        match best {
            Some((topic, score)) if score >= self.threshold => {
                debug!(raw, canonical = %topic, score, "topic merged into existing");
                Ok(Normalized {
                    canonical: topic.clone(),
                    matched: Some(topic),
                    score,
                })
            }
            Some((_, score)) => {
                debug!(raw, score, "no topic above threshold, keeping raw");
                Ok(Normalized {
                    canonical: raw.to_string(),
                    matched: None,
                    score,
                })
            }
            None => Ok(Normalized {
                canonical: raw.to_string(),
                matched: None,
                score: 0.0,
            }),
        }
    }

    /// Top-`k` existing topics most similar to `topic`, no threshold.
    pub async fn related(
        &self,
        topic: &str,
        existing: &[String],
        k: usize,
    ) -> Result<Vec<(String, f32)>, MentoraError> {
        if existing.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let mut scored = self.score_against(topic, existing).await?;
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn score_against(
        &self,
        raw: &str,
        existing: &[String],
    ) -> Result<Vec<(String, f32)>, MentoraError> {
        let query = self.embedder.embed(raw, EmbeddingRole::Query).await?;
        let mut scored = Vec::with_capacity(existing.len());
        for topic in existing {
            let passage = self.embedder.embed(topic, EmbeddingRole::Passage).await?;
            scored.push((topic.clone(), cosine_similarity(&query, &passage)));
        }
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentora_test_utils::MockEmbedder;

    fn topics(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_index_returns_raw_without_embedding() {
        let embedder = Arc::new(MockEmbedder::new());
        let normalizer = TopicNormalizer::new(embedder.clone(), 0.75);
        let result = normalizer.normalize("Chess", &[]).await.unwrap();
        assert_eq!(result.canonical, "Chess");
        assert!(result.matched.is_none());
        assert_eq!(result.score, 0.0);
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn exact_match_short_circuits_case_insensitively() {
        let embedder = Arc::new(MockEmbedder::new());
        let normalizer = TopicNormalizer::new(embedder.clone(), 0.75);
        let existing = topics(&["Graph Theory", "Rust"]);
        let result = normalizer.normalize("rust", &existing).await.unwrap();
        assert_eq!(result.canonical, "Rust");
        assert_eq!(result.matched.as_deref(), Some("Rust"));
        assert_eq!(result.score, 1.0);
        // The whole point of the short circuit: zero embedding calls.
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn score_at_threshold_merges() {
        // Integer 3-4-5-style vectors keep the cosine exactly 0.75 in f32.
        let embedder = Arc::new(
            MockEmbedder::new()
                .with_vector("rust lang", vec![4.0, 0.0, 0.0, 0.0, 0.0])
                .with_vector("Rust", vec![3.0, 2.0, 1.0, 1.0, 1.0]),
        );
        let normalizer = TopicNormalizer::new(embedder, 0.75);
        let result = normalizer
            .normalize("rust lang", &topics(&["Rust"]))
            .await
            .unwrap();
        assert_eq!(result.score, 0.75);
        assert_eq!(result.canonical, "Rust");
        assert_eq!(result.matched.as_deref(), Some("Rust"));
    }

    #[tokio::test]
    async fn score_just_below_threshold_creates_new_topic() {
        let embedder = Arc::new(
            MockEmbedder::new()
                .with_vector("rust lang", vec![4.0, 0.0, 0.0, 0.0, 0.0])
                .with_vector("Rust", vec![2.999, 2.0, 1.0, 1.0, 1.0]),
        );
        let normalizer = TopicNormalizer::new(embedder, 0.75);
        let result = normalizer
            .normalize("rust lang", &topics(&["Rust"]))
            .await
            .unwrap();
        assert!(result.score < 0.75);
        assert!(result.score > 0.74);
        assert_eq!(result.canonical, "rust lang");
        assert!(result.matched.is_none());
    }

    #[tokio::test]
    async fn best_of_multiple_candidates_wins() {
        let embedder = Arc::new(
            MockEmbedder::new()
                .with_vector("golang", vec![1.0, 0.0])
                .with_vector("Go", vec![1.0, 0.1])
                .with_vector("Chess", vec![0.0, 1.0]),
        );
        let normalizer = TopicNormalizer::new(embedder, 0.75);
        let result = normalizer
            .normalize("golang", &topics(&["Chess", "Go"]))
            .await
            .unwrap();
        assert_eq!(result.canonical, "Go");
        assert!(result.score > 0.99);
    }

    #[tokio::test]
    async fn empty_raw_never_embeds() {
        let embedder = Arc::new(MockEmbedder::new());
        let normalizer = TopicNormalizer::new(embedder.clone(), 0.75);
        let result = normalizer
            .normalize("   ", &topics(&["Rust"]))
            .await
            .unwrap();
        assert_eq!(result.canonical, "");
        assert_eq!(embedder.call_count(), 0);
    }

    #[tokio::test]
    async fn related_ranks_and_truncates() {
        let embedder = Arc::new(
            MockEmbedder::new()
                .with_vector("Rust", vec![1.0, 0.0])
                .with_vector("Go", vec![0.9, 0.1])
                .with_vector("Chess", vec![0.0, 1.0])
                .with_vector("Poetry", vec![-1.0, 0.0]),
        );
        let normalizer = TopicNormalizer::new(embedder, 0.75);
        let related = normalizer
            .related("Rust", &topics(&["Poetry", "Chess", "Go"]), 2)
            .await
            .unwrap();
        assert_eq!(related.len(), 2);
        assert_eq!(related[0].0, "Go");
        assert_eq!(related[1].0, "Chess");
    }

    #[tokio::test]
    async fn embedder_failure_propagates() {
        let embedder = Arc::new(MockEmbedder::failing());
        let normalizer = TopicNormalizer::new(embedder, 0.75);
        let result = normalizer.normalize("Chess", &topics(&["Go"])).await;
        assert!(result.is_err());
    }
}
