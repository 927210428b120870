//! Chat endpoint handler
//!
//! Handles POST /chat: relays the message to the upstream completion API
//! as a single user turn and returns the reply.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::middleware::RequestId;
use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

/// Chat request from client
///
/// `message` is an Option so that an absent field still deserializes and
/// the handler can answer with the contract's fixed 400 body instead of a
/// generic deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

/// Chat response to client
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    response: String,
}

impl ChatResponse {
    /// Get the reply text
    pub fn response(&self) -> &str {
        &self.response
    }
}

/// POST /chat handler
///
/// A missing or empty `message` yields 400 `{"error": "Message is required"}`.
/// Whitespace-only messages are accepted and relayed as-is. Any upstream
/// failure surfaces as 500 `{"error": <description>}` without retries.
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let message = match request.message.as_deref() {
        Some(m) if !m.is_empty() => m,
        _ => return Err(AppError::Validation("Message is required".to_string())),
    };

    tracing::debug!(
        request_id = %request_id,
        message_length = message.len(),
        model = %state.upstream().model(),
        "Received chat request"
    );

    let response = state.upstream().complete(message).await?;

    tracing::info!(
        request_id = %request_id,
        response_length = response.len(),
        "Chat relay completed"
    );

    Ok(Json(ChatResponse { response }))
}
