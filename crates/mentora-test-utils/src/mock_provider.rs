// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `ScriptedProvider` implements `ProviderAdapter` with a FIFO queue of
//! pre-configured responses, enabling dialogue-loop tests without API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use mentora_core::MentoraError;
use mentora_core::traits::adapter::PluginAdapter;
use mentora_core::traits::provider::ProviderAdapter;
use mentora_core::types::{
    AdapterType, AssistantContent, HealthStatus, ProviderRequest, ProviderResponse, ToolCall,
};

/// A mock LLM provider that replays a scripted response queue.
///
/// Responses are popped front-to-back. When the queue is empty a default
/// plain-text response is returned, so over-long scripts never panic.
pub struct ScriptedProvider {
    script: Arc<Mutex<VecDeque<ProviderResponse>>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(script: Vec<ProviderResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::from(script))),
            calls: AtomicUsize::new(0),
        }
    }

    /// Append a response to the end of the script.
    pub async fn push(&self, response: ProviderResponse) {
        self.script.lock().await.push_back(response);
    }

    /// Number of `complete` calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Builds a response that invokes a tool, optionally preceded by text.
    pub fn tool_call(
        name: &str,
        input: serde_json::Value,
        preceding_text: Option<&str>,
    ) -> ProviderResponse {
        let mut content = Vec::new();
        if let Some(text) = preceding_text {
            content.push(AssistantContent::Text {
                text: text.to_string(),
            });
        }
        content.push(AssistantContent::ToolCall(ToolCall {
            id: format!("toolu_{name}"),
            name: name.to_string(),
            input,
        }));
        ProviderResponse {
            content,
            stop_reason: Some("tool_use".to_string()),
        }
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl PluginAdapter for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, MentoraError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MentoraError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedProvider {
    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, MentoraError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().await.pop_front();
        Ok(next.unwrap_or_else(|| ProviderResponse::text_only("scripted response")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "test-model".to_string(),
            system_prompt: String::new(),
            messages: vec![],
            max_tokens: 100,
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn scripted_responses_returned_in_order() {
        let provider = ScriptedProvider::new(vec![
            ProviderResponse::text_only("first"),
            ProviderResponse::text_only("second"),
        ]);
        assert_eq!(provider.complete(request()).await.unwrap().text(), "first");
        assert_eq!(provider.complete(request()).await.unwrap().text(), "second");
        // Script exhausted, falls back to default.
        assert_eq!(
            provider.complete(request()).await.unwrap().text(),
            "scripted response"
        );
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn tool_call_builder_shapes_content() {
        let resp = ScriptedProvider::tool_call(
            "web_search",
            serde_json::json!({"query": "rust"}),
            Some("Let me check."),
        );
        assert_eq!(resp.text(), "Let me check.");
        let call = resp.first_tool_call().unwrap();
        assert_eq!(call.name, "web_search");
        assert_eq!(call.input["query"], "rust");
    }
}
