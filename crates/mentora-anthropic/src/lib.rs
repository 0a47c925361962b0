// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Messages API provider adapter.
//!
//! Maps the core provider contract onto the Messages API: tool
//! definitions become native `tools` entries, and `tool_use` response
//! blocks come back as structured [`AssistantContent::ToolCall`] values.
//! The model's text output is never interpreted as anything but text.

pub mod client;
pub mod types;

use async_trait::async_trait;

use mentora_core::MentoraError;
use mentora_core::traits::adapter::PluginAdapter;
use mentora_core::traits::provider::ProviderAdapter;
use mentora_core::types::{
    AdapterType, AssistantContent, HealthStatus, ProviderRequest, ProviderResponse, Role,
    ToolCall,
};

use client::AnthropicClient;
use types::{ContentBlock, MessageRequest, WireMessage, WireTool};

/// Provider adapter for the Anthropic Messages API.
pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>, api_version: impl Into<String>) -> Result<Self, MentoraError> {
        Ok(Self {
            client: AnthropicClient::new(api_key, api_version)?,
        })
    }

    /// Override the API base URL, for tests against a local server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    fn to_wire(request: &ProviderRequest) -> MessageRequest {
        let messages = request
            .messages
            .iter()
            .map(|message| WireMessage {
                // The Messages API accepts only user/assistant turns, so
                // injected system messages (tool results, corrective
                // reprompts) travel as user turns.
                role: match message.role {
                    Role::Assistant => "assistant",
                    Role::User | Role::System => "user",
                },
                content: message.content.clone(),
            })
            .collect();
        let tools = request
            .tools
            .iter()
            .map(|tool| WireTool {
                name: tool.name.clone(),
                description: tool.description.clone(),
                input_schema: tool.input_schema.clone(),
            })
            .collect();
        MessageRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            system: if request.system_prompt.is_empty() {
                None
            } else {
                Some(request.system_prompt.clone())
            },
            messages,
            tools,
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
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
impl ProviderAdapter for AnthropicProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, MentoraError> {
        let wire = Self::to_wire(&request);
        let response = self.client.send(&wire).await?;

        let content = response
            .content
            .into_iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(AssistantContent::Text { text }),
                ContentBlock::ToolUse { id, name, input } => {
                    Some(AssistantContent::ToolCall(ToolCall { id, name, input }))
                }
                ContentBlock::Other => None,
            })
            .collect();
        Ok(ProviderResponse {
            content,
            stop_reason: response.stop_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentora_core::types::{ChatMessage, ToolDefinition};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request_with_tools() -> ProviderRequest {
        ProviderRequest {
            model: "claude-sonnet-4-20250514".to_string(),
            system_prompt: "You are a tutor.".to_string(),
            messages: vec![
                ChatMessage::user("teach me rust"),
                ChatMessage::system("[tool result] profile loaded"),
            ],
            max_tokens: 256,
            tools: vec![ToolDefinition {
                name: "web_search".to_string(),
                description: "Search the web".to_string(),
                input_schema: serde_json::json!({"type": "object"}),
            }],
        }
    }

    #[tokio::test]
    async fn system_history_entries_travel_as_user_turns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(serde_json::json!({
                "system": "You are a tutor.",
                "messages": [
                    {"role": "user", "content": "teach me rust"},
                    {"role": "user", "content": "[tool result] profile loaded"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [{"type": "text", "text": "Sure."}],
                "stop_reason": "end_turn"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("sk-test", "2023-06-01")
            .unwrap()
            .with_base_url(server.uri());
        let response = provider.complete(request_with_tools()).await.unwrap();
        assert_eq!(response.text(), "Sure.");
    }

    #[tokio::test]
    async fn tool_use_blocks_map_to_tool_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "content": [
                    {"type": "text", "text": "Let me look that up."},
                    {"type": "tool_use", "id": "toolu_01", "name": "web_search",
                     "input": {"query": "rust 2026"}}
                ],
                "stop_reason": "tool_use"
            })))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::new("sk-test", "2023-06-01")
            .unwrap()
            .with_base_url(server.uri());
        let response = provider.complete(request_with_tools()).await.unwrap();
        let call = response.first_tool_call().unwrap();
        assert_eq!(call.name, "web_search");
        assert_eq!(call.input["query"], "rust 2026");
        assert_eq!(response.text(), "Let me look that up.");
    }
}
