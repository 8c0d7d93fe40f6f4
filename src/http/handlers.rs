//! Service route handlers.
//!
//! # Routes
//! - `POST /analyze`: multipart `document` field → `AnalysisResult`
//! - `POST /coach`: JSON `{ "clause": string }` → `CoachResult`
//! - `GET /health`: liveness plus provider and model names
//!
//! Missing input is rejected here, before the generator is called.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analysis::{AnalysisResult, CoachResult};
use crate::http::request::request_id;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Body of `POST /coach`.
#[derive(Debug, Deserialize)]
pub struct CoachRequest {
    #[serde(default)]
    pub clause: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
    pub model: String,
}

/// `POST /analyze`: multipart upload with a `document` field.
pub async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let start = Instant::now();
    let result = analyze_inner(&state, &headers, multipart).await;
    record("/analyze", &result, start);
    result
}

async fn analyze_inner(
    state: &AppState,
    headers: &HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let request_id = request_id(headers);
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!(request_id = %request_id, error = %e, "Rejected analyze body");
        ApiError::BadRequest("No document supplied.".to_string())
    })?;

    let mut document = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?
    {
        if field.name() == Some("document") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?;
            document = Some(bytes);
            break;
        }
    }

    let document = match document {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Err(ApiError::BadRequest("No document supplied.".to_string())),
    };

    tracing::info!(request_id = %request_id, bytes = document.len(), "Analyzing document");

    state
        .orchestrator
        .analyze(&document)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Analysis failed");
            ApiError::from_analysis(e, "Failed to analyze document")
        })
}

/// `POST /coach`: JSON `{ "clause": string }`.
pub async fn coach(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CoachRequest>, JsonRejection>,
) -> Result<Json<CoachResult>, ApiError> {
    let start = Instant::now();
    let result = coach_inner(&state, &headers, body).await;
    record("/coach", &result, start);
    result
}

async fn coach_inner(
    state: &AppState,
    headers: &HeaderMap,
    body: Result<Json<CoachRequest>, JsonRejection>,
) -> Result<Json<CoachResult>, ApiError> {
    let request_id = request_id(headers);
    let clause = match body {
        Ok(Json(CoachRequest { clause: Some(clause) })) if !clause.trim().is_empty() => clause,
        Ok(_) => return Err(ApiError::BadRequest("Clause is required.".to_string())),
        Err(e) => {
            tracing::debug!(request_id = %request_id, error = %e, "Rejected coach body");
            return Err(ApiError::BadRequest("Clause is required.".to_string()));
        }
    };

    tracing::info!(request_id = %request_id, clause_chars = clause.len(), "Coaching clause");

    state
        .orchestrator
        .coach(&clause)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Coaching failed");
            ApiError::from_analysis(e, "Failed to get coaching suggestion")
        })
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        provider: state.orchestrator.provider().to_string(),
        model: state.orchestrator.model().to_string(),
    })
}

fn record<T>(route: &'static str, result: &Result<T, ApiError>, start: Instant) {
    let status = match result {
        Ok(_) => 200,
        Err(e) => e.status().as_u16(),
    };
    metrics::record_request(route, status, start);
}
