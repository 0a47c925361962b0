// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./mentora.toml` > `~/.config/mentora/mentora.toml`
//! > `/etc/mentora/mentora.toml` with environment variable overrides via
//! the `MENTORA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MentoraConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/mentora/mentora.toml` (system-wide)
/// 3. `~/.config/mentora/mentora.toml` (user XDG config)
/// 4. `./mentora.toml` (local directory)
/// 5. `MENTORA_*` environment variables
pub fn load_config() -> Result<MentoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MentoraConfig::default()))
        .merge(Toml::file("/etc/mentora/mentora.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("mentora/mentora.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("mentora.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MentoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MentoraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MentoraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MentoraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MENTORA_SEARCH_BRAVE_API_KEY` must map
/// to `search.brave_api_key`, not `search.brave.api.key`.
fn env_provider() -> Env {
    Env::prefixed("MENTORA_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("anthropic_", "anthropic.", 1)
            .replacen("embedding_", "embedding.", 1)
            .replacen("search_", "search.", 1)
            .replacen("knowledge_", "knowledge.", 1)
            .replacen("session_", "session.", 1);
        mapped.into()
    })
}
