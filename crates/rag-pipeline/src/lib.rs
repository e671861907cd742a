pub mod config;
pub mod document;
pub mod embedding;
pub mod index;
pub mod llm;
pub mod pipeline;
pub mod utils;

pub use config::Settings;
pub use utils::error::PipelineError;
