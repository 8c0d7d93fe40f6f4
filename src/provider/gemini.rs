//! Google Generative Language API provider.
//!
//! Configuration:
//! - base_url: API root (default: https://generativelanguage.googleapis.com)
//! - api key: read from the environment variable named by `api_key_env`
//! - model: e.g. "gemini-1.5-flash"

use super::{ProviderError, SamplingConfig, TextGenerator};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::config::GenerationConfig;
use crate::observability::metrics;

/// Gemini `generateContent` client.
pub struct GeminiGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiGenerator {
    /// Create a generator with explicit settings.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        })
    }

    /// Create a generator from configuration, reading the API key from the environment.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, ProviderError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey(config.api_key_env.clone()))?;

        Self::new(
            &config.base_url,
            api_key,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn call(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String, ProviderError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![PartRequest { text: prompt }],
            }],
            generation_config: sampling,
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ProviderError::Provider(format!("HTTP {}: {}", status, message)));
        }

        let body: GenerateResponse = response.json().await?;
        extract_text(body)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: &'a SamplingConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<PartRequest<'a>>,
}

#[derive(Serialize)]
struct PartRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text(response: GenerateResponse) -> Result<String, ProviderError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(text)
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, sampling: &SamplingConfig) -> Result<String, ProviderError> {
        let start = Instant::now();
        let result = match timeout(self.timeout, self.call(prompt, sampling)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout),
        };

        tracing::debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Generation call finished"
        );
        metrics::record_generation_call(self.name(), result.is_ok());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_parts() {
        let body: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "```json\n{"}, {"text": "}\n```"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(body).unwrap(), "```json\n{}\n```");
    }

    #[test]
    fn test_extract_text_empty_is_error() {
        let body: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(extract_text(body), Err(ProviderError::EmptyResponse)));

        let body: GenerateResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(matches!(extract_text(body), Err(ProviderError::EmptyResponse)));
    }

    #[test]
    fn test_request_body_shape() {
        let sampling = SamplingConfig::default();
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![PartRequest { text: "hi" }],
            }],
            generation_config: &sampling,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 1000);
        assert_eq!(value["generationConfig"]["topK"], 40);
    }

    #[test]
    fn test_missing_api_key() {
        let config = GenerationConfig {
            api_key_env: "LEXCOMPASS_TEST_UNSET_KEY".to_string(),
            ..GenerationConfig::default()
        };
        assert!(matches!(
            GeminiGenerator::from_config(&config),
            Err(ProviderError::MissingApiKey(_))
        ));
    }
}
