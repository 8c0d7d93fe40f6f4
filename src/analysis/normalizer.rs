//! Response normalization.
//!
//! # Responsibilities
//! - Strip code-fence markers from generated text
//! - Parse the remainder and check it against the expected shape
//! - Recompute every risk tier/color from its score
//!
//! # Design Decisions
//! - A parse or shape failure is an error carrying the raw text, never a default
//! - One bad risk item degrades that item only: a missing score becomes 5, an
//!   item without clause or explanation text is dropped
//! - Tier/color values supplied by the producer are ignored
//! - The same code normalizes model output on the service and service
//!   responses on the client

use serde_json::{Map, Value};
use thiserror::Error;

use crate::analysis::types::{
    AnalysisResult, CoachResult, NormalizedResponse, Operation, RiskItem, DEFAULT_RISK_SCORE,
    MAX_RISK_SCORE, MIN_RISK_SCORE,
};

/// Text that could not be turned into a valid result.
#[derive(Debug, Clone, Error)]
#[error("malformed {operation} response: {reason}")]
pub struct MalformedResponse {
    pub operation: Operation,
    pub reason: String,
    /// The text as received, for diagnostics.
    pub raw: String,
}

impl MalformedResponse {
    fn new(operation: Operation, reason: impl Into<String>, raw: &str) -> Self {
        Self {
            operation,
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}

/// Remove an opening and/or closing code fence and surrounding whitespace.
///
/// Either marker may be missing. The opening fence may carry a language tag.
pub fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(newline) if rest[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
                &rest[newline + 1..]
            }
            _ => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
        };
        text = text.trim();
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim();
    }

    text
}

/// Normalize raw text for the given operation.
pub fn normalize(raw: &str, operation: Operation) -> Result<NormalizedResponse, MalformedResponse> {
    match operation {
        Operation::Analyze => normalize_analysis(raw).map(NormalizedResponse::Analysis),
        Operation::Coach => normalize_coach(raw).map(NormalizedResponse::Coach),
    }
}

/// Normalize the output of a document analysis.
pub fn normalize_analysis(raw: &str) -> Result<AnalysisResult, MalformedResponse> {
    let op = Operation::Analyze;
    let object = parse_object(raw, op)?;

    let decision_map = match object.get("decisionMap") {
        Some(Value::Array(points)) => points
            .iter()
            .map(|p| match p {
                Value::String(s) => Ok(s.clone()),
                other => Err(MalformedResponse::new(
                    op,
                    format!("decisionMap entry is not a string: {}", other),
                    raw,
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(MalformedResponse::new(op, "decisionMap is not an array", raw)),
        None => return Err(MalformedResponse::new(op, "missing decisionMap", raw)),
    };

    let items = match object.get("riskRadar") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(MalformedResponse::new(op, "riskRadar is not an array", raw)),
        None => return Err(MalformedResponse::new(op, "missing riskRadar", raw)),
    };

    let mut risk_radar = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match risk_item(item) {
            Some(risk) => risk_radar.push(risk),
            None => {
                tracing::warn!(index, item = %item, "Dropping risk item without clause or explanation");
            }
        }
    }

    Ok(AnalysisResult {
        decision_map,
        risk_radar,
    })
}

/// Normalize the output of a clause rewrite.
pub fn normalize_coach(raw: &str) -> Result<CoachResult, MalformedResponse> {
    let op = Operation::Coach;
    let object = parse_object(raw, op)?;

    let field = |name: &str| match object.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(MalformedResponse::new(op, format!("missing {}", name), raw)),
        Some(_) => Err(MalformedResponse::new(op, format!("{} is not a string", name), raw)),
    };

    Ok(CoachResult {
        suggestion: field("suggestion")?,
        explanation: field("explanation")?,
    })
}

fn parse_object(raw: &str, operation: Operation) -> Result<Map<String, Value>, MalformedResponse> {
    let body = strip_fences(raw);
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(MalformedResponse::new(operation, "top-level value is not an object", raw)),
        Err(e) => Err(MalformedResponse::new(operation, format!("invalid JSON: {}", e), raw)),
    }
}

fn risk_item(value: &Value) -> Option<RiskItem> {
    let object = value.as_object()?;
    let clause = object.get("clause")?.as_str()?;
    let risk = object.get("risk")?.as_str()?;
    if clause.trim().is_empty() || risk.trim().is_empty() {
        return None;
    }

    let score = match score_of(object.get("riskScore")) {
        Some(score) => score,
        None => {
            tracing::debug!(clause = %clause, "Risk item without usable score, using default");
            DEFAULT_RISK_SCORE
        }
    };

    Some(RiskItem::new(clause, risk, score))
}

fn score_of(value: Option<&Value>) -> Option<u8> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some(n.round().clamp(f64::from(MIN_RISK_SCORE), f64::from(MAX_RISK_SCORE)) as u8)
}
