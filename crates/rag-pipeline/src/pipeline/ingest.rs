use crate::config::Settings;
use crate::document::{DocumentLoader, DocumentParser, TextChunker, TextCleaner};
use crate::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::index::{StoredChunk, VectorStore};
use crate::utils::error::PipelineError;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

const MAX_FILE_SIZE_MB: u64 = 100;

#[derive(Debug, Clone, Copy)]
pub struct IngestReport {
    pub chunks_added: usize,
    pub total_chunks: usize,
}

pub struct Ingestor {
    settings: Settings,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Ingestor {
    pub fn new(settings: Settings, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { settings, embedder }
    }

    /// Run the full ingestion pipeline on one file:
    /// parse -> clean -> chunk -> embed -> load-append-save the store.
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport, PipelineError> {
        info!("Ingesting {:?}", path);

        DocumentLoader::validate_file(path, MAX_FILE_SIZE_MB)?;

        // 1. Parse document
        info!("Parsing document...");
        let parsed =
            DocumentParser::parse(path).map_err(|e| PipelineError::Parse(e.to_string()))?;

        // 2. Clean text
        let cleaned = TextCleaner::clean(&parsed.content);

        if cleaned.trim().is_empty() {
            warn!("Document {:?} has no extractable text", path);
            return self.empty_report();
        }

        // 3. Chunk text
        info!("Chunking text...");
        let chunker = TextChunker::new(
            self.settings.chunking.max_words,
            self.settings.chunking.overlap_words,
        );

        let chunks = chunker
            .chunk(&cleaned)
            .map_err(|e| PipelineError::Chunking(e.to_string()))?;

        if chunks.is_empty() {
            warn!("Document {:?} produced no chunks", path);
            return self.empty_report();
        }

        info!("Created {} chunks for {:?}", chunks.len(), path);

        // 4. Generate embeddings
        info!("Generating embeddings...");
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let response = self
            .embedder
            .embed(EmbeddingRequest { texts })
            .await
            .map_err(|e| PipelineError::Embedding(e.to_string()))?;

        info!("Generated {} embeddings", response.embeddings.len());

        // 5. Append to the persisted store
        info!("Saving chunks to store...");
        let mut store = VectorStore::open_or_create(
            &self.settings.store,
            self.settings.embedding.dimension,
        )?;

        let source = path.display().to_string();
        let ingested_at = Utc::now();
        let chunks_added = chunks.len();

        for (chunk, embedding) in chunks.into_iter().zip(response.embeddings.into_iter()) {
            store.append(
                StoredChunk {
                    content: chunk.content,
                    source: source.clone(),
                    ingested_at,
                },
                embedding,
            )?;
        }

        store.save()?;

        info!("Ingested {:?}: {} chunks added", path, chunks_added);

        Ok(IngestReport {
            chunks_added,
            total_chunks: store.len(),
        })
    }

    fn empty_report(&self) -> Result<IngestReport, PipelineError> {
        let store = VectorStore::open_or_create(
            &self.settings.store,
            self.settings.embedding.dimension,
        )?;

        Ok(IngestReport {
            chunks_added: 0,
            total_chunks: store.len(),
        })
    }
}
