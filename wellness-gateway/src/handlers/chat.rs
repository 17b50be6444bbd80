use crate::models::{ChatMessage, ChatRequest, ChatResponse};
use crate::services::providers::ProviderError;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use service_core::error::AppError;

const MESSAGE_REQUIRED: &str = "Message is required";
const UPSTREAM_FAILED: &str = "Failed to get response from Gemini API";
const INVALID_UPSTREAM_RESPONSE: &str = "Invalid response from Gemini API";

/// `POST /api/chat`: one user message in, the assistant's reply out.
#[tracing::instrument(skip_all)]
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = body
        .ok()
        .and_then(|Json(request)| request.message)
        .filter(|message| !message.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!(MESSAGE_REQUIRED)))?;

    let reply = state
        .chat_provider
        .reply(&ChatMessage::user(message))
        .await
        .map_err(map_provider_error)?;

    Ok(Json(ChatResponse { reply }))
}

fn map_provider_error(err: ProviderError) -> AppError {
    match err {
        ProviderError::ApiError { status, body } => {
            tracing::error!(status, upstream_body = %body, "Gemini API Error");
            AppError::UpstreamRejected {
                status,
                message: UPSTREAM_FAILED.to_string(),
            }
        }
        ProviderError::InvalidResponse(detail) => {
            tracing::error!(error = %detail, "Gemini response has no usable reply");
            AppError::InvalidUpstreamResponse(INVALID_UPSTREAM_RESPONSE.to_string())
        }
        other => {
            tracing::error!(error = %other, "Server Error: chat upstream failed");
            AppError::InternalError(anyhow::Error::new(other))
        }
    }
}
