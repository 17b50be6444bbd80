//! Chat provider abstraction.
//!
//! The chat endpoint talks to a [`ChatProvider`]; Gemini is the production
//! backend and [`mock::MockChatProvider`] stands in for it in tests.

pub mod gemini;
pub mod mock;

use crate::models::ChatMessage;
use async_trait::async_trait;
use thiserror::Error;

/// Persona and scope instruction sent with every chat request.
pub const ASSISTANT_PERSONA: &str = "You are a friendly and helpful AI assistant for health and \
wellness, specializing in diabetes and hypertension. Your name is Aura. Your ONLY purpose is to \
provide information related to healthcare, healthy living, diabetes, and hypertension. You MUST \
refuse to answer any questions outside of this scope. For all healthcare questions, provide \
clear, concise, and safe information. Always include a disclaimer: 'This information is for \
educational purposes only. Always consult with a healthcare professional for medical advice.'";

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// The provider answered with a non-success status.
    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    /// The provider answered successfully but without a usable reply.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The response body could not be read or was not JSON at all.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait for single-turn chat backends.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Reply to one user message. No earlier turns are sent.
    async fn reply(&self, message: &ChatMessage) -> Result<String, ProviderError>;
}
