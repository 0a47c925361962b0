// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Mentora tutor agent.

use thiserror::Error;

/// The primary error type used across all Mentora adapter traits and core operations.
#[derive(Debug, Error)]
pub enum MentoraError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Knowledge store errors (file I/O, malformed JSON, missing documents).
    #[error("store error: {message}")]
    Store {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// External provider errors (LLM API, embedding endpoint, search backend).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MentoraError {
    /// Shorthand for a provider error without an underlying source.
    pub fn provider(message: impl Into<String>) -> Self {
        MentoraError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a store error wrapping an I/O failure.
    pub fn store_io(message: impl Into<String>, source: std::io::Error) -> Self {
        MentoraError::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}
