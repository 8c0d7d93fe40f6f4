//! Text-generation collaborator.
//!
//! The analysis service treats the model as an opaque function from a prompt
//! to free-form text. Anything implementing [`TextGenerator`] can back it.

mod gemini;

pub use gemini::GeminiGenerator;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::GenerationConfig;

/// Errors raised by a text-generation provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned error: {0}")]
    Provider(String),

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("Missing API key: set {0}")]
    MissingApiKey(String),

    #[error("Timeout waiting for response")]
    Timeout,
}

/// Sampling parameters sent with every prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl From<&GenerationConfig> for SamplingConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            top_p: config.top_p,
            top_k: config.top_k,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::from(&GenerationConfig::default())
    }
}

/// A text-generation backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Provider name for logging/identification
    fn name(&self) -> &str;

    /// Model being used
    fn model(&self) -> &str;

    /// Generate text for a prompt.
    async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String, ProviderError>;
}
