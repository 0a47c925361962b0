// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM integrations.

use async_trait::async_trait;

use crate::error::MentoraError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for LLM provider integrations.
///
/// Providers receive the full assembled request (system prompt, history,
/// tool definitions) and return the response parsed into structured
/// content blocks.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, MentoraError>;
}
