pub mod settings;

pub use settings::{
    ChunkingConfig, EmbeddingConfig, LlmConfig, PromptsConfig, RetrievalConfig, Settings,
    StoreConfig,
};
