//! Error responses.
//!
//! # Design Decisions
//! - Every failure is `{ "error": string }`
//! - Missing input is 400; collaborator and normalization failures are 500
//! - Raw provider output never reaches the body, only a short reason

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::analysis::AnalysisError;

/// Error returned by a service handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map an analysis failure, prefixing 500s with `context`.
    pub fn from_analysis(err: AnalysisError, context: &str) -> Self {
        match err {
            AnalysisError::MissingInput(msg) => ApiError::BadRequest(msg.to_string()),
            other => ApiError::Internal(format!("{}: {}", context, other.reason())),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;

    #[test]
    fn test_missing_input_is_bad_request() {
        let err = ApiError::from_analysis(AnalysisError::MissingInput("Clause is required."), "ignored");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Clause is required.");
    }

    #[test]
    fn test_collaborator_failure_hides_provider_text() {
        let err = ApiError::from_analysis(
            AnalysisError::Collaborator(ProviderError::Provider("HTTP 429: key AIza-secret".into())),
            "Failed to analyze document",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Failed to analyze document: "));
        assert!(!err.to_string().contains("AIza-secret"));
    }
}
