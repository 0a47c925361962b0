// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mentora shell` command implementation.
//!
//! Launches an interactive REPL with colored prompt and readline history.
//! Each invocation starts a fresh session; `/reset` clears it in place.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

use mentora_agent::session::{SessionSettings, TutorSession};
use mentora_agent::tools::ToolRunner;
use mentora_anthropic::AnthropicProvider;
use mentora_config::MentoraConfig;
use mentora_core::MentoraError;
use mentora_core::traits::provider::ProviderAdapter;
use mentora_core::traits::search::SearchAdapter;
use mentora_search::FederatedSearch;

use crate::adapters::{build_embedder, build_normalizer, build_store};

/// Runs the `mentora shell` interactive REPL.
pub async fn run_shell(config: MentoraConfig) -> Result<(), MentoraError> {
    let api_key = config.anthropic.api_key.clone().ok_or_else(|| {
        MentoraError::Config(
            "Anthropic API key required. Set anthropic.api_key in mentora.toml \
             or the MENTORA_ANTHROPIC_API_KEY environment variable."
                .to_string(),
        )
    })?;
    let provider: Arc<dyn ProviderAdapter> = Arc::new(AnthropicProvider::new(
        api_key,
        config.anthropic.api_version.clone(),
    )?);

    let embedder = build_embedder(&config)?;
    let store = build_store(&config, embedder.clone());
    let normalizer = build_normalizer(&config, embedder);
    let search: Arc<dyn SearchAdapter> = Arc::new(FederatedSearch::new(
        config.search.brave_api_key.clone(),
        Duration::from_secs(config.search.timeout_secs),
    )?);

    let runner = ToolRunner::new(
        store.clone(),
        normalizer.clone(),
        search,
        Duration::from_secs(config.session.tool_timeout_secs),
        config.search.result_limit,
        config.knowledge.search_top_k,
    );
    let settings = SessionSettings {
        model: config.anthropic.default_model.clone(),
        max_tokens: config.anthropic.max_tokens,
        max_tool_turns: config.session.max_tool_turns,
        answer_prefix_min_chars: config.session.answer_prefix_min_chars,
        persona: config.agent.system_prompt.clone(),
    };
    let mut session =
        TutorSession::new(provider, runner, store, normalizer, settings).await;
    info!(topics = session.known_topics().len(), "shell session started");

    let mut rl = DefaultEditor::new()
        .map_err(|e| MentoraError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "mentora shell".bold().green());
    println!(
        "Type {} to exit, {} for a fresh session.\n",
        "/quit".yellow(),
        "/reset".yellow()
    );

    let prompt = format!("{}> ", config.agent.name.green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                let _ = rl.add_history_entry(&line);

                if trimmed == "/reset" {
                    session.reset().await;
                    println!("{}", "session reset".yellow());
                    continue;
                }

                let answer = session.chat(trimmed).await;
                println!("\n{answer}\n");
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                return Err(MentoraError::Internal(format!("readline error: {e}")));
            }
        }
    }

    println!("{}", "goodbye".green());
    Ok(())
}
