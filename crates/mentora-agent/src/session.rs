// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The obligation-enforcing dialogue loop.
//!
//! One `chat` call runs a bounded arbitration loop: detect obligations
//! from the user message, then invoke the provider until every obligation
//! has been discharged through a real tool call. The model cannot talk
//! its way past the policy: a premature answer gets a corrective reprompt,
//! and only a response with no pending obligations is returned.

use std::sync::Arc;

use strum::Display;
use tracing::{debug, warn};

use mentora_core::traits::provider::ProviderAdapter;
use mentora_core::types::{ChatMessage, ProviderRequest};
use mentora_knowledge::normalizer::TopicNormalizer;
use mentora_knowledge::store::KnowledgeStore;

use crate::policy::PolicyDetector;
use crate::prompt::{PERSONA, render_with_persona};
use crate::tools::{ToolRunner, obligation_for_tool, tool_definitions};

/// Returned when the loop bound is exhausted without a final answer.
pub const STUCK_MESSAGE: &str = "I apologize, I got stuck. Let's try again.";

/// Returned when the provider fails mid-loop.
pub const APOLOGY_MESSAGE: &str =
    "I'm having trouble reaching my language model right now. Please try again in a moment.";

/// Where one turn of the loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TurnState {
    /// Waiting for the next provider response.
    AwaitingLlm,
    /// A tool ran; its result is in the history.
    ToolExecuted,
    /// A final answer was accepted.
    Final,
}

/// Tunables for the dialogue loop.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub model: String,
    pub max_tokens: u32,
    /// Maximum provider invocations per `chat` call.
    pub max_tool_turns: usize,
    /// Minimum length of text preceding a knowledge write for that text
    /// to count as the final answer.
    pub answer_prefix_min_chars: usize,
    /// Persona override; the built-in tutor persona when unset.
    pub persona: Option<String>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            max_tool_turns: 8,
            answer_prefix_min_chars: 50,
            persona: None,
        }
    }
}

/// A stateful tutoring conversation.
pub struct TutorSession {
    provider: Arc<dyn ProviderAdapter>,
    runner: ToolRunner,
    store: Arc<KnowledgeStore>,
    normalizer: Arc<TopicNormalizer>,
    settings: SessionSettings,
    history: Vec<ChatMessage>,
    existing_topics: Vec<String>,
    current_topic: Option<String>,
}

impl TutorSession {
    pub async fn new(
        provider: Arc<dyn ProviderAdapter>,
        runner: ToolRunner,
        store: Arc<KnowledgeStore>,
        normalizer: Arc<TopicNormalizer>,
        settings: SessionSettings,
    ) -> Self {
        let existing_topics = store.topic_names().await;
        debug!(topics = existing_topics.len(), "session ready");
        Self {
            provider,
            runner,
            store,
            normalizer,
            settings,
            history: Vec::new(),
            existing_topics,
            current_topic: None,
        }
    }

    /// Canonical topics known at the last index refresh.
    pub fn known_topics(&self) -> &[String] {
        &self.existing_topics
    }

    pub fn current_topic(&self) -> Option<&str> {
        self.current_topic.as_deref()
    }

    /// Set the conversation topic, normalized against the canonical index.
    pub async fn set_topic(&mut self, raw: &str) {
        let canonical = match self.normalizer.normalize(raw, &self.existing_topics).await {
            Ok(normalized) => normalized.canonical,
            Err(err) => {
                warn!(%err, "topic normalization failed, using raw topic");
                raw.trim().to_string()
            }
        };
        self.current_topic = Some(canonical);
    }

    /// Clear history and current topic, and reload the topic index.
    pub async fn reset(&mut self) {
        self.history.clear();
        self.current_topic = None;
        self.existing_topics = self.store.topic_names().await;
    }

    /// Run one user turn to completion.
    ///
    /// Always returns displayable text: answers, the apology on provider
    /// failure, or the stuck message when the loop bound is reached.
    pub async fn chat(&mut self, user_input: &str) -> String {
        self.history.push(ChatMessage::user(user_input));
        let mut obligations = PolicyDetector::analyze(user_input);
        let mut summary = self.knowledge_summary().await;
        let mut state = TurnState::AwaitingLlm;

        for turn in 0..self.settings.max_tool_turns {
            let pending = obligations.pending();
            debug!(turn, %state, ?pending, "dialogue loop turn");

            let request = ProviderRequest {
                model: self.settings.model.clone(),
                system_prompt: render_with_persona(
                    self.settings.persona.as_deref().unwrap_or(PERSONA),
                    &pending,
                    &summary,
                    self.current_topic.as_deref(),
                ),
                messages: self.history.clone(),
                max_tokens: self.settings.max_tokens,
                tools: tool_definitions(),
            };
            let response = match self.provider.complete(request).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(%err, "provider failed mid-loop");
                    return APOLOGY_MESSAGE.to_string();
                }
            };

            if let Some(call) = response.first_tool_call().cloned() {
                let preceding = response.text();
                let record = if preceding.is_empty() {
                    format!("[tool call: {}]", call.name)
                } else {
                    format!("{preceding}\n[tool call: {}]", call.name)
                };
                self.history.push(ChatMessage::assistant(record));

                let execution = self.runner.run(&call).await;
                // Failed executions still discharge the obligation; the
                // loop must not spin on a broken tool.
                if let Some(kind) = obligation_for_tool(&call.name) {
                    obligations.mark_satisfied(kind);
                }
                self.history.push(ChatMessage::system(format!(
                    "TOOL_RESULT ({}):\n{}",
                    call.name, execution.output
                )));
                state = TurnState::ToolExecuted;

                if execution.wrote_knowledge {
                    // Read-after-write: the next prompt must see the
                    // freshly written topic.
                    self.existing_topics = self.store.topic_names().await;
                    summary = self.knowledge_summary().await;

                    let preceding = preceding.trim();
                    if preceding.len() >= self.settings.answer_prefix_min_chars {
                        // The model answered and recorded in one turn;
                        // the text before the call is the answer.
                        state = TurnState::Final;
                        debug!(%state, "post-answer write accepted");
                        return preceding.to_string();
                    }
                }
                continue;
            }

            let text = response.text();
            if !obligations.all_satisfied() {
                let pending = obligations.pending();
                debug!(?pending, "premature answer, injecting corrective reprompt");
                self.history.push(ChatMessage::system(format!(
                    "You cannot answer yet. Pending obligations: {}. Call the matching tool.",
                    pending.join("; ")
                )));
                state = TurnState::AwaitingLlm;
                continue;
            }

            state = TurnState::Final;
            debug!(%state, "final answer accepted");
            self.history.push(ChatMessage::assistant(text.clone()));
            return text;
        }

        warn!(
            max_tool_turns = self.settings.max_tool_turns,
            "loop bound reached without a final answer"
        );
        STUCK_MESSAGE.to_string()
    }

    async fn knowledge_summary(&self) -> String {
        let snapshot = self.store.read_profile().await;
        if snapshot.topics.is_empty() {
            return "(empty)".to_string();
        }
        snapshot
            .topics
            .iter()
            .map(|(topic, profile)| {
                format!(
                    "- {topic} (mastery {:.1}, confidence {:.1})",
                    profile.mastery, profile.confidence
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
