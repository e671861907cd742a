pub mod chunker;
pub mod cleaner;
pub mod loader;
pub mod parser;

pub use chunker::{Chunk, TextChunker};
pub use cleaner::TextCleaner;
pub use loader::DocumentLoader;
pub use parser::{DocumentParser, ParsedDocument};
