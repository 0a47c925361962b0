// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured tool definitions and execution.
//!
//! Tool calls arrive as structured [`ToolCall`] values parsed from the
//! provider's native tool-use blocks. Model output is never executed as
//! code. Every tool surface is infallible from the loop's point of view:
//! failures come back as readable result text.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use mentora_core::traits::search::SearchAdapter;
use mentora_core::types::ToolCall;
use mentora_core::types::ToolDefinition;
use mentora_knowledge::normalizer::TopicNormalizer;
use mentora_knowledge::store::KnowledgeStore;
use mentora_knowledge::types::{EventSource, NoteMode, WriteRequest};

use crate::policy::ObligationKind;

pub const TOOL_KNOWLEDGE_READ: &str = "knowledge_read";
pub const TOOL_KNOWLEDGE_WRITE: &str = "knowledge_write";
pub const TOOL_WEB_SEARCH: &str = "web_search";
pub const TOOL_WEB_FETCH: &str = "web_fetch";

/// Fetched page text is truncated to this many characters before it
/// enters the conversation history.
const FETCH_TEXT_CAP: usize = 4000;

/// Which obligation a tool discharges when called.
pub fn obligation_for_tool(name: &str) -> Option<ObligationKind> {
    match name {
        TOOL_KNOWLEDGE_READ => Some(ObligationKind::Read),
        TOOL_KNOWLEDGE_WRITE => Some(ObligationKind::Write),
        TOOL_WEB_SEARCH => Some(ObligationKind::Search),
        TOOL_WEB_FETCH => Some(ObligationKind::Fetch),
        _ => None,
    }
}

/// Tool definitions advertised to the provider.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: TOOL_KNOWLEDGE_READ.to_string(),
            description: "Read the learner's profile and search their topic notes".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Topic or question to look up"}
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: TOOL_KNOWLEDGE_WRITE.to_string(),
            description: "Record what the learner studied: mastery, confidence, and notes"
                .to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "topic": {"type": "string"},
                    "mastery": {"type": "number", "minimum": 0, "maximum": 10},
                    "confidence": {"type": "number", "minimum": 0, "maximum": 10},
                    "note": {"type": "string"},
                    "mode": {"type": "string", "enum": ["append", "replace"]},
                    "reason": {"type": "string"}
                },
                "required": ["topic"]
            }),
        },
        ToolDefinition {
            name: TOOL_WEB_SEARCH.to_string(),
            description: "Search the web for current information".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string"},
                    "limit": {"type": "integer", "minimum": 1}
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: TOOL_WEB_FETCH.to_string(),
            description: "Fetch a URL and return its readable text".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {"type": "string"}
                },
                "required": ["url"]
            }),
        },
    ]
}

// --- tool input shapes ---

#[derive(Deserialize)]
struct ReadInput {
    query: String,
}

#[derive(Deserialize)]
struct WriteInput {
    topic: String,
    #[serde(default)]
    mastery: Option<f64>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Deserialize)]
struct SearchInput {
    query: String,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct FetchInput {
    url: String,
}

/// Result of executing one tool call.
#[derive(Debug)]
pub struct ToolExecution {
    pub tool: String,
    pub output: String,
    /// True when this execution mutated the knowledge base.
    pub wrote_knowledge: bool,
}

/// Executes structured tool calls against the real collaborators.
pub struct ToolRunner {
    store: Arc<KnowledgeStore>,
    normalizer: Arc<TopicNormalizer>,
    search: Arc<dyn SearchAdapter>,
    tool_timeout: Duration,
    search_limit: usize,
    search_top_k: usize,
}

impl ToolRunner {
    pub fn new(
        store: Arc<KnowledgeStore>,
        normalizer: Arc<TopicNormalizer>,
        search: Arc<dyn SearchAdapter>,
        tool_timeout: Duration,
        search_limit: usize,
        search_top_k: usize,
    ) -> Self {
        Self {
            store,
            normalizer,
            search,
            tool_timeout,
            search_limit,
            search_top_k,
        }
    }

    /// Execute one tool call with a per-call timeout.
    ///
    /// Never fails: malformed input, tool errors, and timeouts all come
    /// back as result text for the conversation history.
    pub async fn run(&self, call: &ToolCall) -> ToolExecution {
        debug!(tool = call.name, "executing tool call");
        let execution = timeout(self.tool_timeout, self.dispatch(call)).await;
        match execution {
            Ok(execution) => execution,
            Err(_) => {
                warn!(tool = call.name, timeout = ?self.tool_timeout, "tool call timed out");
                ToolExecution {
                    tool: call.name.clone(),
                    output: format!(
                        "Error: tool '{}' timed out after {:?}",
                        call.name, self.tool_timeout
                    ),
                    wrote_knowledge: false,
                }
            }
        }
    }

    async fn dispatch(&self, call: &ToolCall) -> ToolExecution {
        let (output, wrote_knowledge) = match call.name.as_str() {
            TOOL_KNOWLEDGE_READ => (self.run_read(&call.input).await, false),
            TOOL_KNOWLEDGE_WRITE => return self.run_write(&call.input).await,
            TOOL_WEB_SEARCH => (self.run_search(&call.input).await, false),
            TOOL_WEB_FETCH => (self.run_fetch(&call.input).await, false),
            other => (format!("Error: unknown tool '{other}'"), false),
        };
        ToolExecution {
            tool: call.name.clone(),
            output,
            wrote_knowledge,
        }
    }

    async fn run_read(&self, input: &serde_json::Value) -> String {
        let input: ReadInput = match serde_json::from_value(input.clone()) {
            Ok(input) => input,
            Err(err) => return format!("Error: invalid knowledge_read input: {err}"),
        };

        let snapshot = self.store.read_profile().await;
        let mut out = String::new();
        if let Some(message) = &snapshot.message {
            out.push_str(&format!("(warning: {message})\n"));
        }
        if snapshot.topics.is_empty() {
            out.push_str("The knowledge base is empty.\n");
        } else {
            out.push_str("Known topics:\n");
            for (topic, profile) in &snapshot.topics {
                out.push_str(&format!(
                    "- {topic}: mastery {:.1}, confidence {:.1}\n",
                    profile.mastery, profile.confidence
                ));
            }
        }

        let notes = self.store.search_notes(&input.query, self.search_top_k).await;
        match notes.error {
            Some(error) => out.push_str(&format!("Note search unavailable: {error}\n")),
            None if notes.matches.is_empty() => {
                out.push_str(&format!("No notes matched '{}'.\n", input.query));
            }
            None => {
                out.push_str(&format!("Notes matching '{}':\n", input.query));
                for m in &notes.matches {
                    out.push_str(&format!("- {} (score {:.2}): {}\n", m.title, m.score, m.preview));
                }
            }
        }
        out
    }

    async fn run_write(&self, input: &serde_json::Value) -> ToolExecution {
        let input: WriteInput = match serde_json::from_value(input.clone()) {
            Ok(input) => input,
            Err(err) => {
                return ToolExecution {
                    tool: TOOL_KNOWLEDGE_WRITE.to_string(),
                    output: format!("Error: invalid knowledge_write input: {err}"),
                    wrote_knowledge: false,
                };
            }
        };

        // Normalize against the canonical index so near-duplicate topic
        // spellings merge instead of forking new profiles.
        let existing = self.store.topic_names().await;
        let topic = match self.normalizer.normalize(&input.topic, &existing).await {
            Ok(normalized) => normalized.canonical,
            Err(err) => {
                warn!(%err, "topic normalization failed, using raw topic");
                input.topic.clone()
            }
        };

        let mode = match input.mode.as_deref() {
            Some("replace") => NoteMode::Replace,
            _ => NoteMode::Append,
        };
        let outcome = self
            .store
            .write(WriteRequest {
                topic,
                mastery: input.mastery,
                confidence: input.confidence,
                notes: input.note,
                mode,
                reason: input.reason.unwrap_or_default(),
                source: EventSource::Agent,
            })
            .await;
        ToolExecution {
            tool: TOOL_KNOWLEDGE_WRITE.to_string(),
            output: format!("{}: {}", outcome.status, outcome.message),
            wrote_knowledge: true,
        }
    }

    async fn run_search(&self, input: &serde_json::Value) -> String {
        let input: SearchInput = match serde_json::from_value(input.clone()) {
            Ok(input) => input,
            Err(err) => return format!("Error: invalid web_search input: {err}"),
        };
        let limit = input.limit.unwrap_or(self.search_limit);
        let hits = self.search.search(&input.query, limit).await;
        if hits.is_empty() {
            return format!("No results for '{}'.", input.query);
        }
        let mut out = format!("Results for '{}':\n", input.query);
        for hit in &hits {
            out.push_str(&format!("- [{}] {} — {}", hit.source, hit.title, hit.url));
            if let Some(snippet) = &hit.snippet {
                out.push_str(&format!("\n  {snippet}"));
            }
            out.push('\n');
        }
        out
    }

    async fn run_fetch(&self, input: &serde_json::Value) -> String {
        let input: FetchInput = match serde_json::from_value(input.clone()) {
            Ok(input) => input,
            Err(err) => return format!("Error: invalid web_fetch input: {err}"),
        };
        let doc = self.search.fetch(&input.url).await;
        if let Some(error) = doc.error {
            return format!("Error fetching {}: {error}", doc.url);
        }
        let text: String = doc.text.chars().take(FETCH_TEXT_CAP).collect();
        format!("{} ({})\n\n{}", doc.title, doc.url, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentora_test_utils::{MockEmbedder, StaticSearch};
    use tempfile::TempDir;

    fn runner_with(
        dir: &TempDir,
        search: Arc<StaticSearch>,
    ) -> (ToolRunner, Arc<KnowledgeStore>) {
        let embedder = Arc::new(MockEmbedder::new());
        let store = Arc::new(KnowledgeStore::new(dir.path(), embedder.clone()));
        let normalizer = Arc::new(TopicNormalizer::new(embedder, 0.75));
        (
            ToolRunner::new(
                store.clone(),
                normalizer,
                search,
                Duration::from_secs(10),
                5,
                5,
            ),
            store,
        )
    }

    fn call(name: &str, input: serde_json::Value) -> ToolCall {
        ToolCall {
            id: "toolu_test".to_string(),
            name: name.to_string(),
            input,
        }
    }

    #[test]
    fn definitions_cover_all_four_tools() {
        let names: Vec<String> = tool_definitions().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                TOOL_KNOWLEDGE_READ,
                TOOL_KNOWLEDGE_WRITE,
                TOOL_WEB_SEARCH,
                TOOL_WEB_FETCH
            ]
        );
    }

    #[test]
    fn obligation_mapping_is_total_over_known_tools() {
        assert_eq!(
            obligation_for_tool(TOOL_WEB_FETCH),
            Some(ObligationKind::Fetch)
        );
        assert_eq!(
            obligation_for_tool(TOOL_KNOWLEDGE_READ),
            Some(ObligationKind::Read)
        );
        assert_eq!(
            obligation_for_tool(TOOL_WEB_SEARCH),
            Some(ObligationKind::Search)
        );
        assert_eq!(
            obligation_for_tool(TOOL_KNOWLEDGE_WRITE),
            Some(ObligationKind::Write)
        );
        assert!(obligation_for_tool("bash").is_none());
    }

    #[tokio::test]
    async fn write_merges_case_variant_topics() {
        let dir = TempDir::new().unwrap();
        let (runner, store) = runner_with(&dir, Arc::new(StaticSearch::default()));

        runner
            .run(&call(
                TOOL_KNOWLEDGE_WRITE,
                serde_json::json!({"topic": "Chess", "mastery": 2.0}),
            ))
            .await;
        let execution = runner
            .run(&call(
                TOOL_KNOWLEDGE_WRITE,
                serde_json::json!({"topic": "chess", "mastery": 4.0}),
            ))
            .await;
        assert!(execution.wrote_knowledge);

        assert_eq!(store.topic_names().await, vec!["Chess"]);
        let snapshot = store.read_profile().await;
        assert_eq!(snapshot.topics["Chess"].mastery, 4.0);
    }

    #[tokio::test]
    async fn read_reports_profile_and_notes() {
        let dir = TempDir::new().unwrap();
        let (runner, store) = runner_with(&dir, Arc::new(StaticSearch::default()));
        store
            .write(WriteRequest {
                mastery: Some(3.0),
                ..WriteRequest::topic_only("Chess")
            })
            .await;

        let execution = runner
            .run(&call(TOOL_KNOWLEDGE_READ, serde_json::json!({"query": "chess"})))
            .await;
        assert!(!execution.wrote_knowledge);
        assert!(execution.output.contains("Chess: mastery 3.0"));
        // No index yet, so note search degrades in-band.
        assert!(execution.output.contains("Note search unavailable"));
    }

    #[tokio::test]
    async fn search_formats_hits() {
        let dir = TempDir::new().unwrap();
        let search = Arc::new(StaticSearch::new(vec![StaticSearch::hit(
            "Rust Blog",
            "https://blog.rust-lang.org",
        )]));
        let (runner, _) = runner_with(&dir, search.clone());

        let execution = runner
            .run(&call(TOOL_WEB_SEARCH, serde_json::json!({"query": "rust"})))
            .await;
        assert!(execution.output.contains("Rust Blog"));
        assert_eq!(search.searched(), vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn fetch_formats_document() {
        let dir = TempDir::new().unwrap();
        let search = Arc::new(StaticSearch::default());
        let (runner, _) = runner_with(&dir, search.clone());

        let execution = runner
            .run(&call(
                TOOL_WEB_FETCH,
                serde_json::json!({"url": "https://example.com/a"}),
            ))
            .await;
        assert!(execution.output.contains("Mock Document"));
        assert_eq!(search.fetched(), vec!["https://example.com/a".to_string()]);
    }

    #[tokio::test]
    async fn unknown_tool_and_bad_input_are_inband_errors() {
        let dir = TempDir::new().unwrap();
        let (runner, _) = runner_with(&dir, Arc::new(StaticSearch::default()));

        let unknown = runner.run(&call("bash", serde_json::json!({}))).await;
        assert!(unknown.output.contains("unknown tool"));

        let bad = runner
            .run(&call(TOOL_WEB_SEARCH, serde_json::json!({"q": "oops"})))
            .await;
        assert!(bad.output.contains("invalid web_search input"));
    }
}
