// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP embedding adapter for OpenAI-compatible `/v1/embeddings` endpoints.
//!
//! Implements the asymmetric E5 retrieval contract: texts embedded under
//! [`EmbeddingRole::Query`] are prefixed with `"query: "`, texts embedded
//! under [`EmbeddingRole::Passage`] with `"passage: "`. The same text
//! under different roles therefore yields different vectors, which is
//! required for topic normalization and note search to score correctly.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mentora_core::MentoraError;
use mentora_core::traits::adapter::PluginAdapter;
use mentora_core::traits::embedding::EmbeddingAdapter;
use mentora_core::types::{AdapterType, EmbeddingRole, HealthStatus};

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRecord>,
}

#[derive(Deserialize)]
struct EmbeddingRecord {
    embedding: Vec<f32>,
}

/// Embedding adapter backed by an OpenAI-compatible HTTP endpoint.
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dimensions: usize,
    timeout: Duration,
}

impl HttpEmbedder {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        dimensions: usize,
        timeout: Duration,
    ) -> Result<Self, MentoraError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| MentoraError::Provider {
                message: "failed to build embedding HTTP client".to_string(),
                source: Some(Box::new(err)),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            dimensions,
            timeout,
        })
    }

    fn prefixed(text: &str, role: EmbeddingRole) -> String {
        match role {
            EmbeddingRole::Query => format!("query: {text}"),
            EmbeddingRole::Passage => format!("passage: {text}"),
        }
    }
}

#[async_trait]
impl PluginAdapter for HttpEmbedder {
    fn name(&self) -> &str {
        "http-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, MentoraError> {
        match self.embed("health check", EmbeddingRole::Query).await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(err) => Ok(HealthStatus::Unhealthy(err.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), MentoraError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for HttpEmbedder {
    async fn embed(&self, text: &str, role: EmbeddingRole) -> Result<Vec<f32>, MentoraError> {
        let input = Self::prefixed(text, role);
        let body = EmbeddingsRequest {
            model: &self.model,
            input: &input,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                MentoraError::Timeout {
                    duration: self.timeout,
                }
            } else {
                MentoraError::Provider {
                    message: format!("embedding request to {} failed", self.endpoint),
                    source: Some(Box::new(err)),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(MentoraError::provider(format!(
                "embedding endpoint returned {status}: {detail}"
            )));
        }

        let parsed: EmbeddingsResponse =
            response.json().await.map_err(|err| MentoraError::Provider {
                message: "embedding response was not valid JSON".to_string(),
                source: Some(Box::new(err)),
            })?;
        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|record| record.embedding)
            .ok_or_else(|| MentoraError::provider("embedding response contained no data"))?;

        if vector.len() != self.dimensions {
            warn!(
                expected = self.dimensions,
                actual = vector.len(),
                "embedding dimensionality differs from configuration"
            );
        }
        debug!(role = %role, chars = text.len(), "embedded text");
        Ok(vector)
    }
}
