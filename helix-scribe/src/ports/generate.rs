use async_trait::async_trait;

use crate::error::Result;

/// Text-completion service. Failures (timeout, quota, malformed response)
/// surface as `ScribeError::GenerationService`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(user: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            system: None,
            user: user.into(),
            max_tokens,
            temperature,
        }
    }

    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}
