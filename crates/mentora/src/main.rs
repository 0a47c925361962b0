// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mentora - a personal AI tutor that remembers what you learn.
//!
//! Binary entry point: loads and validates configuration, initializes
//! logging, and dispatches to the subcommands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod adapters;
mod shell;
mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Mentora - a personal AI tutor that remembers what you learn.
#[derive(Parser, Debug)]
#[command(name = "mentora", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive tutoring session.
    Shell,
    /// Rebuild the note embedding index.
    Reindex,
    /// Print the learner profile and recent timeline events.
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match mentora_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            mentora_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Some(Commands::Shell) | None => shell::run_shell(config).await,
        Some(Commands::Reindex) => status::run_reindex(config).await,
        Some(Commands::Status) => status::run_status(config).await,
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
