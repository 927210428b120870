//! Upload endpoint handler
//!
//! Handles POST /upload: reads the multipart part named `file`, encodes
//! its bytes as standard padded base64 and echoes it back with the
//! original filename. Nothing is stored.

use crate::error::{AppError, AppResult};
use crate::middleware::RequestId;
use axum::{Extension, Json, extract::Multipart};
use base64::{Engine as _, engine::general_purpose};
use serde::Serialize;

/// Upload response to client
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Base64 encoding of the uploaded bytes (standard alphabet, padded)
    file: String,
    /// Original filename, byte-for-byte as sent by the client
    filename: String,
}

impl UploadResponse {
    /// Get the base64-encoded file content
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Get the original filename
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// POST /upload handler
///
/// Parts not named `file` are skipped. A request with no `file` part yields
/// 400 `{"error": "File is required"}`. The whole part is buffered in
/// memory before encoding; there is no size limit on this route.
pub async fn handler(
    Extension(request_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart request: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read file part: {}", e)))?;

        tracing::debug!(
            request_id = %request_id,
            filename = %filename,
            size_bytes = data.len(),
            "Encoding uploaded file"
        );

        let encoded = general_purpose::STANDARD.encode(&data);

        return Ok(Json(UploadResponse {
            file: encoded,
            filename,
        }));
    }

    Err(AppError::Validation("File is required".to_string()))
}
