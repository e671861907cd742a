pub mod ingest;
pub mod query;

pub use ingest::{IngestReport, Ingestor};
pub use query::{QueryEngine, QueryResult, RetrievedChunk};
