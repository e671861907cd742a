use super::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
use crate::config::EmbeddingConfig;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

#[derive(Debug, Serialize)]
struct EncodeRequest {
    content: String,
    // Some servers read `input` instead of `content`; send both
    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<String>,
    // llama-server ignores this; OpenAI-style servers require it
    model: String,
}

/// Client for a llama-server style sentence-encoder endpoint. The encoder is
/// expected to be already running; `wait_until_ready` polls `/health`.
pub struct HttpEmbedder {
    client: Client,
    base_url: String,
    model: String,
    dimension: usize,
}

impl HttpEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_seconds))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimension: config.dimension,
        }
    }

    /// Check if the encoder server is up and responding
    pub async fn is_ready(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Poll the health endpoint until the server responds
    pub async fn wait_until_ready(&self, max_attempts: u32) -> Result<()> {
        let mut attempts = 0;

        loop {
            if self.is_ready().await {
                return Ok(());
            }

            attempts += 1;
            if attempts >= max_attempts {
                return Err(anyhow!(
                    "Embedding server at {} not responding after {} attempts",
                    self.base_url,
                    max_attempts
                ));
            }

            sleep(Duration::from_secs(1)).await;
        }
    }

    /// Embed single text
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        debug!("Generating embedding for {} chars", text.len());

        let request = EncodeRequest {
            content: text.to_string(),
            input: Some(text.to_string()),
            model: self.model.clone(),
        };

        let response = self
            .client
            .post(format!("{}/embedding", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed to connect to embedding server")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Embedding API error ({}): {}", status, body);
        }

        let json: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse embedding response as JSON")?;

        let embedding = Self::parse_embedding(&json)?;

        if embedding.is_empty() {
            anyhow::bail!("Generated embedding is empty");
        }

        if embedding.len() != self.dimension {
            anyhow::bail!(
                "Embedding dimension mismatch: expected {}, got {}",
                self.dimension,
                embedding.len()
            );
        }

        Ok(embedding)
    }

    /// Handle the response shapes seen across llama-server versions:
    /// `{"embedding":[...]}`, `[{"embedding":[...]}]` (sometimes nested
    /// `[[...]]`), and OpenAI-style `{"data":[{"embedding":[...]}]}`.
    fn parse_embedding(json: &serde_json::Value) -> Result<Vec<f32>> {
        if let Some(arr) = json.as_array() {
            let first = arr
                .first()
                .ok_or_else(|| anyhow!("Empty array returned from embedding server"))?;

            let emb_field = first["embedding"]
                .as_array()
                .ok_or_else(|| anyhow!("Missing 'embedding' field in array response"))?;

            // Batch responses sometimes double-nest: [[...]]
            if let Some(nested) = emb_field.first().and_then(|v| v.as_array()) {
                return Ok(Self::collect_floats(nested));
            }

            return Ok(Self::collect_floats(emb_field));
        }

        if let Some(emb) = json["embedding"].as_array() {
            return Ok(Self::collect_floats(emb));
        }

        if let Some(data) = json["data"].as_array() {
            let emb = data
                .first()
                .and_then(|d| d["embedding"].as_array())
                .ok_or_else(|| anyhow!("Missing 'embedding' field in data response"))?;
            return Ok(Self::collect_floats(emb));
        }

        Err(anyhow!("Unrecognized embedding response format: {}", json))
    }

    fn collect_floats(values: &[serde_json::Value]) -> Vec<f32> {
        values
            .iter()
            .filter_map(|v| v.as_f64().map(|f| f as f32))
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let mut embeddings = Vec::with_capacity(request.texts.len());

        for (i, text) in request.texts.iter().enumerate() {
            debug!("Embedding text {}/{}", i + 1, request.texts.len());

            let embedding = self.embed_text(text).await?;
            embeddings.push(embedding);
        }

        Ok(EmbeddingResponse { embeddings })
    }

    async fn embed_single(&self, text: String) -> Result<Vec<f32>> {
        self.embed_text(&text).await
    }
}
