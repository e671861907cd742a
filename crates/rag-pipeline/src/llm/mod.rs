pub mod client;
pub mod provider;

pub use client::{ChatMessage, LlmClient};
pub use provider::LlmProvider;

#[cfg(test)]
pub use provider::MockLlmProvider;
