use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("File too large: {0} MB (max: {1} MB)")]
    FileTooLarge(u64, u64),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Chunking error: {0}")]
    Chunking(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Store not found: {0} (run `ragpipe ingest` first)")]
    StoreNotFound(String),

    #[error("Store corrupted: {0}")]
    StoreCorrupted(String),

    #[error("Store is empty, nothing to search")]
    EmptyStore,

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for PipelineError {
    fn from(err: anyhow::Error) -> Self {
        PipelineError::Unknown(err.to_string())
    }
}
