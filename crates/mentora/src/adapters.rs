// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter construction from configuration, shared by the subcommands.

use std::sync::Arc;
use std::time::Duration;

use mentora_config::MentoraConfig;
use mentora_core::MentoraError;
use mentora_core::traits::embedding::EmbeddingAdapter;
use mentora_embed::HttpEmbedder;
use mentora_knowledge::normalizer::TopicNormalizer;
use mentora_knowledge::store::KnowledgeStore;

/// Build the embedding adapter from config.
pub fn build_embedder(config: &MentoraConfig) -> Result<Arc<dyn EmbeddingAdapter>, MentoraError> {
    let embedder = HttpEmbedder::new(
        config.embedding.endpoint.clone(),
        config.embedding.model.clone(),
        config.embedding.api_key.clone(),
        config.embedding.dimensions,
        Duration::from_secs(config.embedding.timeout_secs),
    )?;
    Ok(Arc::new(embedder))
}

/// Build the knowledge store over the configured data directory.
pub fn build_store(
    config: &MentoraConfig,
    embedder: Arc<dyn EmbeddingAdapter>,
) -> Arc<KnowledgeStore> {
    Arc::new(
        KnowledgeStore::new(config.knowledge.data_dir.clone(), embedder)
            .with_preview_chars(config.knowledge.preview_chars),
    )
}

/// Build the topic normalizer with the configured threshold.
pub fn build_normalizer(
    config: &MentoraConfig,
    embedder: Arc<dyn EmbeddingAdapter>,
) -> Arc<TopicNormalizer> {
    Arc::new(TopicNormalizer::new(
        embedder,
        config.knowledge.similarity_threshold,
    ))
}
