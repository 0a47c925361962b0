// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Mentora workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the plugin registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Embedding,
    Search,
}

// --- Conversation types ---

/// The speaker of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    /// Tool results and corrective instructions injected by the dialogue loop.
    System,
}

/// One message in the conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

// --- Provider types ---

/// A tool the provider may invoke, described by a JSON schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// A request to an LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub tools: Vec<ToolDefinition>,
}

/// A structured tool invocation emitted by the provider.
///
/// Tool calls are parsed from the provider's native tool-use content
/// blocks. Model output is never interpreted as executable code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// One content block of a provider response: either answer text or a
/// structured tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantContent {
    Text { text: String },
    ToolCall(ToolCall),
}

/// A full (non-streaming) response from an LLM provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub content: Vec<AssistantContent>,
    pub stop_reason: Option<String>,
}

impl ProviderResponse {
    /// Returns a response consisting of a single text block.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            content: vec![AssistantContent::Text { text: text.into() }],
            stop_reason: Some("end_turn".to_string()),
        }
    }

    /// Concatenation of all text blocks, in order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for block in &self.content {
            if let AssistantContent::Text { text } = block {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(text);
            }
        }
        out
    }

    /// The first tool call in the response, if any.
    ///
    /// Tool calls are resolved one per LLM turn, so only the first
    /// matters to the dialogue loop.
    pub fn first_tool_call(&self) -> Option<&ToolCall> {
        self.content.iter().find_map(|block| match block {
            AssistantContent::ToolCall(call) => Some(call),
            _ => None,
        })
    }
}

// --- Embedding types ---

/// The retrieval role under which a text is embedded.
///
/// Asymmetric embedding models produce different vectors for the same
/// text depending on whether it is a query or a passage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EmbeddingRole {
    Query,
    Passage,
}

// --- Search / fetch types ---

/// A single result from a federated web search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    /// Backend that produced this hit (e.g. "brave", "hackernews").
    pub source: String,
    pub snippet: Option<String>,
    pub timestamp: Option<String>,
}

/// Classification of a fetched document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Html,
    Abstract,
    Error,
}

/// The outcome of fetching a URL.
///
/// Fetch failures are reported as `kind == Error` with `error` populated,
/// never as an `Err` propagated to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedDocument {
    pub title: String,
    pub url: String,
    pub text: String,
    pub kind: DocumentKind,
    pub error: Option<String>,
}

impl FetchedDocument {
    /// Builds an error-shaped document for a failed fetch.
    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            url: url.into(),
            text: String::new(),
            kind: DocumentKind::Error,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_concatenates_blocks() {
        let resp = ProviderResponse {
            content: vec![
                AssistantContent::Text {
                    text: "first".to_string(),
                },
                AssistantContent::ToolCall(ToolCall {
                    id: "t1".to_string(),
                    name: "web_search".to_string(),
                    input: serde_json::json!({"query": "x"}),
                }),
                AssistantContent::Text {
                    text: "second".to_string(),
                },
            ],
            stop_reason: None,
        };
        assert_eq!(resp.text(), "first\nsecond");
    }

    #[test]
    fn first_tool_call_skips_text() {
        let resp = ProviderResponse {
            content: vec![
                AssistantContent::Text {
                    text: "thinking".to_string(),
                },
                AssistantContent::ToolCall(ToolCall {
                    id: "t1".to_string(),
                    name: "knowledge_write".to_string(),
                    input: serde_json::json!({}),
                }),
            ],
            stop_reason: Some("tool_use".to_string()),
        };
        let call = resp.first_tool_call().unwrap();
        assert_eq!(call.name, "knowledge_write");
    }

    #[test]
    fn first_tool_call_none_for_plain_answer() {
        let resp = ProviderResponse::text_only("just an answer");
        assert!(resp.first_tool_call().is_none());
        assert_eq!(resp.text(), "just an answer");
    }

    #[test]
    fn role_round_trips_through_serde() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Role::Assistant);
    }

    #[test]
    fn embedding_role_display() {
        assert_eq!(EmbeddingRole::Query.to_string(), "query");
        assert_eq!(EmbeddingRole::Passage.to_string(), "passage");
    }

    #[test]
    fn fetched_document_failure_shape() {
        let doc = FetchedDocument::failure("https://example.com", "connection refused");
        assert_eq!(doc.kind, DocumentKind::Error);
        assert_eq!(doc.error.as_deref(), Some("connection refused"));
        assert!(doc.text.is_empty());
    }
}
