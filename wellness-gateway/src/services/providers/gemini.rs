//! Gemini chat provider.
//!
//! Sends one `generateContent` call per user message with the assistant
//! persona as system instruction, and returns the first text part of the
//! first candidate.

use super::{ChatProvider, ProviderError, ASSISTANT_PERSONA};
use crate::models::{ChatMessage, ChatRole};
use crate::services::metrics::{record_upstream_call, UpstreamOutcome, UPSTREAM_GEMINI};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use std::time::{Duration, Instant};

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub api_base: String,
    pub model: String,
    pub timeout: Duration,
}

/// Gemini chat provider.
pub struct GeminiChatProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiChatProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// API URL for the given method. The key travels as a query parameter
    /// added at send time so it never appears in logged URLs.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    fn build_request(message: &ChatMessage) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some(
                    match message.role {
                        ChatRole::User => "user",
                        ChatRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![Part {
                    text: Some(message.text.clone()),
                }],
            }],
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: Some(ASSISTANT_PERSONA.to_string()),
                }],
            },
        }
    }

    async fn generate(&self, message: &ChatMessage) -> Result<String, ProviderError> {
        let request = Self::build_request(message);
        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.config.model,
            message_len = message.text.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.config.api_key.expose_secret().as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        extract_reply(&body)
    }
}

/// Pull `candidates[0].content.parts[0].text` out of a response body.
fn extract_reply(body: &str) -> Result<String, ProviderError> {
    let api_response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| match e.classify() {
            Category::Data => ProviderError::InvalidResponse(e.to_string()),
            Category::Io | Category::Syntax | Category::Eof => {
                ProviderError::MalformedResponse(e.to_string())
            }
        })?;

    if let Some(usage) = &api_response.usage_metadata {
        tracing::debug!(
            prompt_tokens = usage.prompt_token_count.unwrap_or(0),
            reply_tokens = usage.candidates_token_count.unwrap_or(0),
            "Gemini token usage"
        );
    }

    let candidate = api_response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("no candidates".to_string()))?;

    let finish_reason = candidate.finish_reason;

    candidate
        .content
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            ProviderError::InvalidResponse(format!(
                "first candidate has no text (finish reason: {})",
                finish_reason.as_deref().unwrap_or("unknown")
            ))
        })
}

#[async_trait]
impl ChatProvider for GeminiChatProvider {
    async fn reply(&self, message: &ChatMessage) -> Result<String, ProviderError> {
        let started = Instant::now();
        let result = self.generate(message).await;

        let outcome = match &result {
            Ok(_) => UpstreamOutcome::Success,
            Err(ProviderError::ApiError { .. }) => UpstreamOutcome::Rejected,
            Err(ProviderError::InvalidResponse(_)) | Err(ProviderError::MalformedResponse(_)) => {
                UpstreamOutcome::Invalid
            }
            Err(ProviderError::NetworkError(_)) | Err(ProviderError::NotConfigured(_)) => {
                UpstreamOutcome::Unreachable
            }
        };
        record_upstream_call(UPSTREAM_GEMINI, outcome, started.elapsed());

        result
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    system_instruction: Content,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}
