// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mentora status` and `mentora reindex` command implementations.

use colored::Colorize;
use tracing::info;

use mentora_config::MentoraConfig;
use mentora_core::MentoraError;
use mentora_knowledge::types::ReadStatus;

use crate::adapters::{build_embedder, build_store};

/// Print the learner profile and recent timeline events.
pub async fn run_status(config: MentoraConfig) -> Result<(), MentoraError> {
    let embedder = build_embedder(&config)?;
    let store = build_store(&config, embedder);
    let snapshot = store.read_profile().await;

    match snapshot.status {
        ReadStatus::Ok => {}
        degraded => {
            let message = snapshot.message.as_deref().unwrap_or("unknown problem");
            println!("{} {degraded}: {message}", "warning:".yellow());
        }
    }

    println!("{}", "topics".bold());
    if snapshot.topics.is_empty() {
        println!("  (none yet)");
    }
    for (topic, profile) in &snapshot.topics {
        let reviewed = profile
            .last_reviewed
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "  {} mastery {:.1}, confidence {:.1}, last reviewed {reviewed}",
            format!("{topic}:").cyan(),
            profile.mastery,
            profile.confidence
        );
    }

    println!("\n{}", "recent events".bold());
    if snapshot.recent_events.is_empty() {
        println!("  (none yet)");
    }
    for event in &snapshot.recent_events {
        println!(
            "  {} {} {} {} -> {}",
            event.timestamp.dimmed(),
            event.topic.cyan(),
            event.field,
            event.old_value,
            event.new_value
        );
    }
    Ok(())
}

/// Rebuild the note embedding index from scratch.
pub async fn run_reindex(config: MentoraConfig) -> Result<(), MentoraError> {
    let embedder = build_embedder(&config)?;
    let store = build_store(&config, embedder);
    let count = store.rebuild_index().await?;
    info!(count, "embedding index rebuilt");
    println!("indexed {count} topic note(s)");
    Ok(())
}
