// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as threshold ranges and non-empty paths.

use crate::diagnostic::ConfigError;
use crate::model::MentoraConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MentoraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.knowledge.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "knowledge.data_dir must not be empty".to_string(),
        });
    }

    let threshold = config.knowledge.similarity_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "knowledge.similarity_threshold must be within [0, 1], got {threshold}"
            ),
        });
    }

    if config.knowledge.search_top_k == 0 {
        errors.push(ConfigError::Validation {
            message: "knowledge.search_top_k must be at least 1".to_string(),
        });
    }

    if config.session.max_tool_turns == 0 {
        errors.push(ConfigError::Validation {
            message: "session.max_tool_turns must be at least 1".to_string(),
        });
    }

    if config.anthropic.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "anthropic.max_tokens must be at least 1".to_string(),
        });
    }

    if config.search.result_limit == 0 {
        errors.push(ConfigError::Validation {
            message: "search.result_limit must be at least 1".to_string(),
        });
    }

    if config.embedding.dimensions == 0 {
        errors.push(ConfigError::Validation {
            message: "embedding.dimensions must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MentoraConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let mut config = MentoraConfig::default();
        config.knowledge.similarity_threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("similarity_threshold"));
    }

    #[test]
    fn zero_max_tool_turns_is_rejected() {
        let mut config = MentoraConfig::default();
        config.session.max_tool_turns = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("max_tool_turns"))
        );
    }

    #[test]
    fn multiple_errors_are_collected() {
        let mut config = MentoraConfig::default();
        config.knowledge.data_dir = "  ".to_string();
        config.knowledge.similarity_threshold = -0.1;
        config.session.max_tool_turns = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
