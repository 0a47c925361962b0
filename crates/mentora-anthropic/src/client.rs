// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level HTTP client for the Anthropic Messages API.

use std::time::Duration;

use tracing::{debug, warn};

use mentora_core::MentoraError;

use crate::types::{ApiErrorResponse, MessageRequest, MessageResponse};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// HTTP client wrapping `POST /v1/messages`.
///
/// Transient failures (429, 500, 503) are retried exactly once after a
/// short delay; everything else fails immediately.
pub struct AnthropicClient {
    client: reqwest::Client,
    api_key: String,
    api_version: String,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>, api_version: impl Into<String>) -> Result<Self, MentoraError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| MentoraError::Provider {
                message: "failed to build Anthropic HTTP client".to_string(),
                source: Some(Box::new(err)),
            })?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            api_version: api_version.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL, for tests against a local server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send a Messages request, retrying once on transient statuses.
    pub async fn send(&self, request: &MessageRequest) -> Result<MessageResponse, MentoraError> {
        match self.send_once(request).await {
            Err(MentoraError::Provider { message, source }) if Self::is_transient(&message) => {
                warn!(%message, "transient Anthropic error, retrying once");
                let _ = source;
                tokio::time::sleep(RETRY_DELAY).await;
                self.send_once(request).await
            }
            other => other,
        }
    }

    fn is_transient(message: &str) -> bool {
        ["429", "500", "503"]
            .iter()
            .any(|status| message.contains(status))
    }

    async fn send_once(&self, request: &MessageRequest) -> Result<MessageResponse, MentoraError> {
        let url = format!("{}/v1/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.api_version)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    MentoraError::Timeout {
                        duration: REQUEST_TIMEOUT,
                    }
                } else {
                    MentoraError::Provider {
                        message: "Anthropic request failed".to_string(),
                        source: Some(Box::new(err)),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| format!("{}: {}", e.error.kind, e.error.message))
                .unwrap_or(body);
            return Err(MentoraError::provider(format!(
                "Anthropic API returned {status}: {detail}"
            )));
        }

        debug!(model = request.model, "Anthropic response received");
        response.json().await.map_err(|err| MentoraError::Provider {
            message: "Anthropic response was not valid JSON".to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WireMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> MessageRequest {
        MessageRequest {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 64,
            system: Some("be brief".to_string()),
            messages: vec![WireMessage {
                role: "user",
                content: "hello".to_string(),
            }],
            tools: vec![],
        }
    }

    fn text_body() -> serde_json::Value {
        serde_json::json!({
            "content": [{"type": "text", "text": "hi there"}],
            "stop_reason": "end_turn"
        })
    }

    #[tokio::test]
    async fn sends_required_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-test"))
            .and(header("anthropic-version", "2023-06-01"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnthropicClient::new("sk-test", "2023-06-01")
            .unwrap()
            .with_base_url(server.uri());
        let response = client.send(&request()).await.unwrap();
        assert_eq!(response.stop_reason.as_deref(), Some("end_turn"));
    }

    #[tokio::test]
    async fn retries_once_on_transient_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"type": "overloaded_error", "message": "Overloaded"}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnthropicClient::new("sk-test", "2023-06-01")
            .unwrap()
            .with_base_url(server.uri());
        let response = client.send(&request()).await.unwrap();
        assert_eq!(response.content.len(), 1);
    }

    #[tokio::test]
    async fn non_transient_error_fails_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"type": "authentication_error", "message": "bad key"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AnthropicClient::new("sk-bad", "2023-06-01")
            .unwrap()
            .with_base_url(server.uri());
        let err = client.send(&request()).await.unwrap_err();
        assert!(err.to_string().contains("authentication_error"));
    }
}
