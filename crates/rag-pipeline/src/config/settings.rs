use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub embedding: EmbeddingConfig,
    pub chunking: ChunkingConfig,
    pub store: StoreConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub model: String,
    pub dimension: usize, // 384 for all-MiniLM-L6-v2
    pub timeout_seconds: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            model: "all-MiniLM-L6-v2".to_string(),
            dimension: 384,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ChunkingConfig {
    pub max_words: usize,
    pub overlap_words: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_words: 200,
            overlap_words: 20,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub chunks_path: PathBuf,
    pub index_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            chunks_path: PathBuf::from("chunks.json"),
            index_path: PathBuf::from("index.json"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub max_tokens: usize,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-70b-8192".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            max_tokens: 1024,
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct PromptsConfig {
    pub system_prompt: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are a helpful and concise assistant. Answer the user's \
                question based only on the provided context. If the context does not \
                contain relevant information, clearly say so, but still attempt to \
                provide a useful answer from your general knowledge."
                .to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        // Load .env first so the API key and overrides are visible
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Optional config file, defaults cover everything
            .add_source(File::with_name("config/settings").required(false))
            // Override with environment variables (prefix: APP)
            // Example: APP_CHUNKING__MAX_WORDS=150
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.chunking.max_words == 0 {
            anyhow::bail!("chunking.max_words must be greater than zero");
        }

        if self.chunking.overlap_words >= self.chunking.max_words {
            anyhow::bail!(
                "chunking.overlap_words ({}) must be smaller than chunking.max_words ({})",
                self.chunking.overlap_words,
                self.chunking.max_words
            );
        }

        if self.embedding.dimension == 0 {
            anyhow::bail!("embedding.dimension must be greater than zero");
        }

        if self.retrieval.top_k == 0 {
            anyhow::bail!("retrieval.top_k must be greater than zero");
        }

        Ok(())
    }
}
