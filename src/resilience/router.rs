//! Resilient request routing.
//!
//! # Responsibilities
//! - Send each request to the active endpoint under a deadline
//! - On transport/status failure, retry once against the other endpoint
//! - Switch the active endpoint when that retry succeeds
//! - Normalize the response body before handing it back
//!
//! # Design Decisions
//! - At most two attempts, strictly sequential: worst case is 2× the deadline
//! - No backoff between attempts; the second attempt targets a different instance
//! - A 2xx body that fails normalization is returned as-is, not retried
//! - The active endpoint never changes on failure alone

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::analysis::{normalize, AnalysisRequest, NormalizedResponse};
use crate::backend::{BackendState, BackendStatus, EndpointPair, EndpointRole, NoticeLevel, Notifier};
use crate::observability::metrics;
use crate::resilience::error::{AggregatedError, AttemptError, RouterError};
use crate::resilience::timeouts::with_deadline;

/// Longest service error message carried into an [`AttemptError`].
const MAX_ERROR_MESSAGE: usize = 200;

/// Sends requests to whichever endpoint is active, failing over once.
#[derive(Debug, Clone)]
pub struct ResilientRouter {
    client: Client,
    endpoints: Arc<EndpointPair>,
    state: Arc<BackendState>,
    notifier: Notifier,
    timeout: Duration,
}

#[derive(Deserialize)]
struct ServiceError {
    error: String,
}

impl ResilientRouter {
    pub fn new(
        client: Client,
        endpoints: Arc<EndpointPair>,
        state: Arc<BackendState>,
        notifier: Notifier,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            endpoints,
            state,
            notifier,
            timeout,
        }
    }

    /// Send one request and return its normalized response.
    pub async fn send(&self, request: &AnalysisRequest) -> Result<NormalizedResponse, RouterError> {
        request.validate().map_err(RouterError::MissingInput)?;

        let active = match self.state.status() {
            BackendStatus::Unknown => return Err(RouterError::NotReady),
            BackendStatus::Unavailable => {
                return Err(AggregatedError {
                    first_role: EndpointRole::Primary,
                    first: AttemptError::Unreachable,
                    second_role: EndpointRole::Secondary,
                    second: AttemptError::Unreachable,
                }
                .into());
            }
            BackendStatus::PrimaryActive => EndpointRole::Primary,
            BackendStatus::SecondaryActive => EndpointRole::Secondary,
        };

        let first = match self.attempt(active, request).await {
            Ok(body) => return self.normalize(request, &body),
            Err(e) => e,
        };

        let alternate = active.other();
        tracing::warn!(
            operation = %request.operation(),
            failed = %self.endpoints.get(active),
            error = %first,
            retry = %self.endpoints.get(alternate),
            "Request failed, trying alternative backend"
        );

        match self.attempt(alternate, request).await {
            Ok(body) => {
                let response = self.normalize(request, &body)?;
                self.switch_to(alternate);
                Ok(response)
            }
            Err(second) => {
                tracing::error!(
                    operation = %request.operation(),
                    first = %first,
                    second = %second,
                    "Both backends failed"
                );
                Err(AggregatedError {
                    first_role: active,
                    first,
                    second_role: alternate,
                    second,
                }
                .into())
            }
        }
    }

    async fn attempt(&self, role: EndpointRole, request: &AnalysisRequest) -> Result<String, AttemptError> {
        let endpoint = self.endpoints.get(role);
        let url = endpoint.url_for(request.operation().path());

        let builder = match request {
            AnalysisRequest::Analyze { document, file_name } => {
                let part = Part::bytes(document.clone()).file_name(file_name.clone());
                self.client.post(&url).multipart(Form::new().part("document", part))
            }
            AnalysisRequest::Coach { clause } => self
                .client
                .post(&url)
                .json(&serde_json::json!({ "clause": clause })),
        };

        tracing::debug!(endpoint = %endpoint, url = %url, "Sending request");

        with_deadline(self.timeout, async {
            let response = builder.send().await?;
            let status = response.status();
            let body = response.text().await?;

            if !status.is_success() {
                return Err(AttemptError::HttpStatus {
                    status: status.as_u16(),
                    message: error_message(&body),
                });
            }
            Ok::<_, AttemptError>(body)
        })
        .await
    }

    fn normalize(&self, request: &AnalysisRequest, body: &str) -> Result<NormalizedResponse, RouterError> {
        normalize(body, request.operation()).map_err(|e| {
            tracing::warn!(operation = %e.operation, reason = %e.reason, "Service response failed normalization");
            metrics::record_normalization_failure(e.operation.as_str());
            RouterError::Malformed(e)
        })
    }

    fn switch_to(&self, role: EndpointRole) {
        if !self.state.activate(role) {
            return;
        }
        let endpoint = self.endpoints.get(role);
        metrics::record_failover(role.as_str());
        self.notifier
            .emit(NoticeLevel::Info, format!("Switched to {} backend", endpoint));
    }
}

fn error_message(body: &str) -> String {
    let message = serde_json::from_str::<ServiceError>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string());
    message.chars().take(MAX_ERROR_MESSAGE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_json_error() {
        assert_eq!(error_message(r#"{"error": "Failed to analyze document."}"#), "Failed to analyze document.");
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(error_message(&"x".repeat(500)).len(), MAX_ERROR_MESSAGE);
    }
}
