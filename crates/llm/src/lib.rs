pub mod client;
pub mod config;
pub mod prompt;

pub use client::{GeminiClient, LlmError, MockNarrative, NarrativeBackend};
pub use config::{ConfigError, GeminiConfig};
