pub mod flat;
pub mod store;

pub use flat::{FlatIndex, SearchHit};
pub use store::{StoredChunk, VectorStore};
