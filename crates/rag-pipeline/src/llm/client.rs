use crate::config::LlmConfig;
use crate::utils::error::PipelineError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
    stream: bool,
}

/// Client for an OpenAI-compatible chat completions API (Groq by default).
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: LlmConfig,
    api_key: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, PipelineError> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            PipelineError::Config(format!(
                "Missing API key: set the {} environment variable",
                config.api_key_env
            ))
        })?;

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
            api_key,
        })
    }

    /// Generate a completion and wait for the full response
    pub async fn generate_chat(&self, messages: Vec<ChatMessage>) -> Result<String, PipelineError> {
        debug!("Starting chat generation with {} messages", messages.len());

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: 0.7,
            stream: false,
        };

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::Llm(format!("Failed to call LLM API: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::Llm(format!(
                "LLM API error: {} - {}",
                status, body
            )));
        }

        #[derive(Deserialize)]
        struct ChatCompletionResponse {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct Message {
            content: String,
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::Llm(format!("Failed to parse LLM response: {}", e)))?;

        chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| PipelineError::Llm("No choices returned from LLM".to_string()))
    }
}

#[async_trait::async_trait]
impl super::provider::LlmProvider for LlmClient {
    async fn generate(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        self.generate_chat(messages)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}
