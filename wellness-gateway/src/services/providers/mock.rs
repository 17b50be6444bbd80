//! Mock provider implementation for testing.

use super::{ChatProvider, ProviderError};
use crate::models::ChatMessage;
use async_trait::async_trait;

/// What the mock does when asked for a reply.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Echo,
    Reply(String),
    Reject(u16),
    InvalidResponse,
    Unreachable,
}

/// Mock chat provider for testing.
pub struct MockChatProvider {
    behavior: MockBehavior,
}

impl MockChatProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self { behavior }
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn reply(&self, message: &ChatMessage) -> Result<String, ProviderError> {
        match &self.behavior {
            MockBehavior::Echo => Ok(format!("Mock response for: {}", message.text)),
            MockBehavior::Reply(text) => Ok(text.clone()),
            MockBehavior::Reject(status) => Err(ProviderError::ApiError {
                status: *status,
                body: r#"{"error":{"message":"mock rejection"}}"#.to_string(),
            }),
            MockBehavior::InvalidResponse => Err(ProviderError::InvalidResponse(
                "no candidates in mock response".to_string(),
            )),
            MockBehavior::Unreachable => Err(ProviderError::NetworkError(
                "mock provider unreachable".to_string(),
            )),
        }
    }
}
