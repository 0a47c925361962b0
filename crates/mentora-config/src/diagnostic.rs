// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration error diagnostics rendered via miette.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic metadata.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration failed to parse or deserialize.
    #[error("configuration could not be loaded: {message}")]
    #[diagnostic(
        code(mentora::config::parse),
        help("check mentora.toml for typos; unknown keys are rejected")
    )]
    Parse {
        /// The underlying figment error, flattened to text.
        message: String,
    },

    /// A configuration value failed semantic validation.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(mentora::config::validation))]
    Validation {
        /// Description of the violated constraint.
        message: String,
    },
}

/// Convert a figment extraction error into diagnostic errors, one per
/// underlying failure.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}

/// Render all collected errors to stderr as miette reports.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        let report = miette::Report::msg(error.to_string());
        eprintln!("{report:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let err = ConfigError::Validation {
            message: "knowledge.similarity_threshold must be within [0, 1]".to_string(),
        };
        assert!(err.to_string().contains("similarity_threshold"));
    }

    #[test]
    fn figment_errors_are_flattened() {
        let result = crate::loader::load_config_from_str("agent = \"not a table\"");
        let err = result.expect_err("scalar agent section should fail");
        let errors = figment_to_config_errors(err);
        assert!(!errors.is_empty());
    }
}
