//! Service-side analysis step.
//!
//! # Responsibilities
//! - Reject missing input before any collaborator call
//! - Build the operation's prompt and call the text generator
//! - Normalize the raw output into a typed result

use std::sync::Arc;

use thiserror::Error;

use crate::analysis::normalizer::{self, MalformedResponse};
use crate::analysis::prompts;
use crate::analysis::types::{AnalysisResult, CoachResult, Operation};
use crate::observability::metrics;
use crate::provider::{ProviderError, SamplingConfig, TextGenerator};

/// Errors produced while serving an analysis request.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The caller supplied no document or clause.
    #[error("{0}")]
    MissingInput(&'static str),

    /// The text-generation step failed.
    #[error("text generation failed: {0}")]
    Collaborator(#[from] ProviderError),

    /// The generated text could not be normalized.
    #[error(transparent)]
    Malformed(#[from] MalformedResponse),
}

impl AnalysisError {
    /// Short reason safe to show a caller; raw provider output stays in the logs.
    pub fn reason(&self) -> String {
        match self {
            AnalysisError::MissingInput(msg) => (*msg).to_string(),
            AnalysisError::Collaborator(_) => "the text generation service failed".to_string(),
            AnalysisError::Malformed(e) => e.reason.clone(),
        }
    }
}

/// Runs prompts through a [`TextGenerator`] and normalizes the result.
#[derive(Clone)]
pub struct AnalysisOrchestrator {
    generator: Arc<dyn TextGenerator>,
    sampling: SamplingConfig,
}

impl AnalysisOrchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>, sampling: SamplingConfig) -> Self {
        Self { generator, sampling }
    }

    /// Provider name of the underlying generator.
    pub fn provider(&self) -> &str {
        self.generator.name()
    }

    /// Model of the underlying generator.
    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Analyze a document for decision points and risky clauses.
    pub async fn analyze(&self, document: &[u8]) -> Result<AnalysisResult, AnalysisError> {
        let text = String::from_utf8_lossy(document);
        if text.trim().is_empty() {
            return Err(AnalysisError::MissingInput("No document supplied."));
        }

        let raw = self.generate(Operation::Analyze, &prompts::analysis_prompt(&text)).await?;
        normalizer::normalize_analysis(&raw).map_err(|e| self.malformed(e))
    }

    /// Rewrite a clause to be safer for the reader.
    pub async fn coach(&self, clause: &str) -> Result<CoachResult, AnalysisError> {
        if clause.trim().is_empty() {
            return Err(AnalysisError::MissingInput("Clause is required."));
        }

        let raw = self.generate(Operation::Coach, &prompts::coach_prompt(clause)).await?;
        normalizer::normalize_coach(&raw).map_err(|e| self.malformed(e))
    }

    async fn generate(&self, operation: Operation, prompt: &str) -> Result<String, AnalysisError> {
        tracing::debug!(
            operation = %operation,
            provider = %self.generator.name(),
            prompt_chars = prompt.len(),
            "Calling text generator"
        );
        self.generator
            .generate(prompt, &self.sampling)
            .await
            .map_err(|e| {
                tracing::error!(operation = %operation, error = %e, "Text generation failed");
                AnalysisError::Collaborator(e)
            })
    }

    fn malformed(&self, e: MalformedResponse) -> AnalysisError {
        tracing::warn!(
            operation = %e.operation,
            reason = %e.reason,
            raw = %e.raw,
            "Generated text failed normalization"
        );
        metrics::record_normalization_failure(e.operation.as_str());
        AnalysisError::Malformed(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Scripted {
        reply: Result<String, String>,
        calls: AtomicUsize,
        last_prompt: Mutex<String>,
    }

    impl Scripted {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(String::new()),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(String::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        async fn generate(&self, prompt: &str, _sampling: &SamplingConfig) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = prompt.to_string();
            self.reply.clone().map_err(ProviderError::Provider)
        }
    }

    fn orchestrator(generator: Arc<Scripted>) -> AnalysisOrchestrator {
        AnalysisOrchestrator::new(generator, SamplingConfig::default())
    }

    #[tokio::test]
    async fn test_analyze_normalizes_fenced_output() {
        let generator = Scripted::ok(
            "```json\n{\"decisionMap\": [\"Term is 12 months\"], \"riskRadar\": [{\"clause\": \"No refunds.\", \"risk\": \"Money lost.\", \"riskScore\": 6}]}\n```",
        );
        let result = orchestrator(generator.clone())
            .analyze(b"The term is 12 months. No refunds.")
            .await
            .unwrap();

        assert_eq!(result.decision_map, vec!["Term is 12 months"]);
        assert_eq!(result.risk_radar[0].tier().as_str(), "high");
        assert!(generator.last_prompt.lock().unwrap().contains("No refunds."));
    }

    #[tokio::test]
    async fn test_truncated_output_is_malformed_not_panic() {
        let generator = Scripted::ok("{\"decisionMap\": [\"a\"], \"riskRadar\": [");
        let err = orchestrator(generator).analyze(b"doc").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_is_collaborator_error() {
        let generator = Scripted::failing("quota exceeded for key abc123");
        let err = orchestrator(generator).coach("Clause").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Collaborator(_)));
        assert!(!err.reason().contains("abc123"));
    }

    #[tokio::test]
    async fn test_missing_input_skips_generator() {
        let generator = Scripted::ok("{}");
        let orch = orchestrator(generator.clone());

        assert!(matches!(orch.coach("   ").await, Err(AnalysisError::MissingInput(_))));
        assert!(matches!(orch.analyze(b"").await, Err(AnalysisError::MissingInput(_))));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }
}
