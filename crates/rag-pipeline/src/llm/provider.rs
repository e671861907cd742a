use super::client::ChatMessage;
use anyhow::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn generate(&self, messages: Vec<ChatMessage>) -> Result<String>;
}
