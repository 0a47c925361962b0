// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Mentora tutor agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Mentora configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MentoraConfig {
    /// Agent identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Embedding endpoint settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Federated search and fetch settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Knowledge base settings.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Dialogue loop settings.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline persona prompt. When unset, the built-in tutor persona is used.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            system_prompt: None,
        }
    }
}

fn default_agent_name() -> String {
    "mentora".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires the environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Default model to use for LLM requests.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

/// Embedding endpoint configuration.
///
/// Points at an OpenAI-compatible `/v1/embeddings` endpoint serving an
/// asymmetric retrieval model (E5 family).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Full URL of the embeddings endpoint.
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with each request.
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// API key for the endpoint, if required.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Expected vector dimensionality.
    #[serde(default = "default_embedding_dimensions")]
    pub dimensions: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_network_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            api_key: None,
            dimensions: default_embedding_dimensions(),
            timeout_secs: default_network_timeout_secs(),
        }
    }
}

fn default_embedding_endpoint() -> String {
    "http://127.0.0.1:8080/v1/embeddings".to_string()
}

fn default_embedding_model() -> String {
    "intfloat/e5-base-v2".to_string()
}

fn default_embedding_dimensions() -> usize {
    768
}

fn default_network_timeout_secs() -> u64 {
    10
}

/// Federated search and fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Brave Search API subscription token. `None` disables the Brave backend.
    #[serde(default)]
    pub brave_api_key: Option<String>,

    /// Default number of hits returned by a search.
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// Request timeout in seconds for search and fetch.
    #[serde(default = "default_network_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            brave_api_key: None,
            result_limit: default_result_limit(),
            timeout_secs: default_network_timeout_secs(),
        }
    }
}

fn default_result_limit() -> usize {
    5
}

/// Knowledge base configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Directory holding profile.json, timeline.json, notes/, and index.json.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Minimum cosine similarity for merging a topic phrase into an
    /// existing canonical topic (inclusive).
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Default number of matches returned by note search.
    #[serde(default = "default_search_top_k")]
    pub search_top_k: usize,

    /// Characters of note content included in search previews.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            similarity_threshold: default_similarity_threshold(),
            search_top_k: default_search_top_k(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("mentora").join("knowledge"))
        .unwrap_or_else(|| std::path::PathBuf::from("knowledge"))
        .to_string_lossy()
        .into_owned()
}

fn default_similarity_threshold() -> f32 {
    0.75
}

fn default_search_top_k() -> usize {
    5
}

fn default_preview_chars() -> usize {
    200
}

/// Dialogue loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Maximum LLM invocations per user turn before giving up.
    #[serde(default = "default_max_tool_turns")]
    pub max_tool_turns: usize,

    /// Minimum length of text preceding a knowledge write for that text
    /// to be returned as the final answer of the turn.
    #[serde(default = "default_answer_prefix_min_chars")]
    pub answer_prefix_min_chars: usize,

    /// Per-tool-call timeout in seconds.
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_tool_turns: default_max_tool_turns(),
            answer_prefix_min_chars: default_answer_prefix_min_chars(),
            tool_timeout_secs: default_tool_timeout_secs(),
        }
    }
}

fn default_max_tool_turns() -> usize {
    8
}

fn default_answer_prefix_min_chars() -> usize {
    50
}

fn default_tool_timeout_secs() -> u64 {
    10
}
