pub mod http_embedder;
pub mod provider;

pub use http_embedder::HttpEmbedder;
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
