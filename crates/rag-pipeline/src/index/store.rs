use super::flat::{FlatIndex, SearchHit};
use crate::config::StoreConfig;
use crate::utils::error::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredChunk {
    pub content: String,
    pub source: String,
    pub ingested_at: DateTime<Utc>,
}

/// Chunk texts and their embeddings, persisted as two JSON files: the chunk
/// list and the flat index. Incremental ingestion is a plain
/// load-append-save cycle; there is no locking.
pub struct VectorStore {
    config: StoreConfig,
    chunks: Vec<StoredChunk>,
    index: FlatIndex,
}

impl VectorStore {
    /// Open an existing store, or start an empty one if neither file exists
    /// (ingestion path).
    pub fn open_or_create(config: &StoreConfig, dimension: usize) -> Result<Self, PipelineError> {
        if !config.chunks_path.exists() && !config.index_path.exists() {
            debug!("No existing store, starting empty (dimension {})", dimension);
            return Ok(Self {
                config: config.clone(),
                chunks: Vec::new(),
                index: FlatIndex::new(dimension),
            });
        }

        Self::open(config, dimension)
    }

    /// Open an existing store; both files must be present (query path).
    pub fn open(config: &StoreConfig, dimension: usize) -> Result<Self, PipelineError> {
        if !config.chunks_path.exists() {
            return Err(PipelineError::StoreNotFound(
                config.chunks_path.display().to_string(),
            ));
        }

        if !config.index_path.exists() {
            return Err(PipelineError::StoreNotFound(
                config.index_path.display().to_string(),
            ));
        }

        let chunks: Vec<StoredChunk> =
            serde_json::from_slice(&fs::read(&config.chunks_path)?)?;
        let index: FlatIndex = serde_json::from_slice(&fs::read(&config.index_path)?)?;

        // The chunk list and the index must stay in lockstep
        if chunks.len() != index.len() {
            return Err(PipelineError::StoreCorrupted(format!(
                "{} chunks but {} indexed vectors",
                chunks.len(),
                index.len()
            )));
        }

        if index.dimension() != dimension {
            return Err(PipelineError::DimensionMismatch {
                expected: dimension,
                actual: index.dimension(),
            });
        }

        debug!(
            "Opened store: {} chunks, dimension {}",
            chunks.len(),
            index.dimension()
        );

        Ok(Self {
            config: config.clone(),
            chunks,
            index,
        })
    }

    pub fn append(&mut self, chunk: StoredChunk, embedding: Vec<f32>) -> Result<(), PipelineError> {
        if embedding.len() != self.index.dimension() {
            return Err(PipelineError::DimensionMismatch {
                expected: self.index.dimension(),
                actual: embedding.len(),
            });
        }

        self.index
            .add(embedding)
            .map_err(|e| PipelineError::Unknown(e.to_string()))?;
        self.chunks.push(chunk);

        Ok(())
    }

    pub fn save(&self) -> Result<(), PipelineError> {
        fs::write(
            &self.config.chunks_path,
            serde_json::to_vec_pretty(&self.chunks)?,
        )?;
        fs::write(&self.config.index_path, serde_json::to_vec(&self.index)?)?;

        info!(
            "Saved store: {} chunks -> {:?}, index -> {:?}",
            self.chunks.len(),
            self.config.chunks_path,
            self.config.index_path
        );

        Ok(())
    }

    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>, PipelineError> {
        self.index
            .search(query, k)
            .map_err(|e| PipelineError::Unknown(e.to_string()))
    }

    pub fn chunk(&self, id: usize) -> Option<&StoredChunk> {
        self.chunks.get(id)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }
}
