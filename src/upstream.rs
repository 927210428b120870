//! Client for the upstream chat-completion API
//!
//! Speaks the OpenAI-compatible `/chat/completions` schema over reqwest.
//! One client is constructed at startup and shared read-only across all
//! requests via [`crate::handlers::AppState`]. The relay makes a single
//! attempt per request: no retries, and no timeout beyond reqwest's
//! transport defaults.

use crate::config::UpstreamConfig;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Handle to the upstream completion API
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    chat_url: String,
    model: String,
    api_key: String,
}

// Manual Debug keeps the API key out of logs
impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("chat_url", &self.chat_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Request body for POST {base_url}/chat/completions
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

/// A single message in the conversation (always one user turn here)
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from the completion API (only the fields we read)
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl CompletionClient {
    /// Create a new client for the configured upstream
    ///
    /// The API key is injected by the caller (sourced from the environment
    /// at startup); it is never read from configuration files.
    pub fn new(upstream: &UpstreamConfig, api_key: String) -> AppResult<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            AppError::Config(format!("Failed to create upstream HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            chat_url: format!("{}/chat/completions", upstream.base_url()),
            model: upstream.model().to_string(),
            api_key,
        })
    }

    /// Get the model identifier this client sends upstream
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Submit `message` as a single user turn and return the reply text
    ///
    /// Any failure - transport error, non-success status, undecodable body,
    /// empty choice list - maps to [`AppError::Upstream`].
    pub async fn complete(&self, message: &str) -> AppResult<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: message,
            }],
        };

        tracing::debug!(
            model = %self.model,
            message_length = message.len(),
            "Sending completion request"
        );

        let response = self
            .http
            .post(&self.chat_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(url = %self.chat_url, error = %e, "Completion request failed");
                AppError::Upstream(format!("request to {} failed: {}", self.chat_url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let detail = extract_upstream_error(&body_text).unwrap_or(body_text);
            tracing::error!(
                url = %self.chat_url,
                status = %status,
                detail = %detail,
                "Completion API returned error status"
            );
            return Err(AppError::Upstream(format!(
                "completion API returned {}: {}",
                status, detail
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!(url = %self.chat_url, error = %e, "Failed to decode completion response");
            AppError::Upstream(format!("could not decode completion response: {}", e))
        })?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Upstream("completion contained no choices".to_string()))?;

        tracing::debug!(
            model = %self.model,
            response_length = reply.len(),
            "Completion request succeeded"
        );

        Ok(reply)
    }
}

/// Pull the `error.message` field out of an OpenAI-style error body
///
/// Returns `None` when the body is not JSON or has a different shape, in
/// which case the raw body text is surfaced instead.
fn extract_upstream_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(|m| m.as_str())
        .map(String::from)
}
