//! Typed analysis results and the score → tier/color mapping.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Score assigned to a risk item whose score is missing or unusable.
pub const DEFAULT_RISK_SCORE: u8 = 5;

/// Lowest accepted risk score.
pub const MIN_RISK_SCORE: u8 = 1;

/// Highest accepted risk score.
pub const MAX_RISK_SCORE: u8 = 10;

/// The remote operation a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Full document analysis.
    Analyze,
    /// Rewrite of a single clause.
    Coach,
}

impl Operation {
    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Analyze => "analyze",
            Operation::Coach => "coach",
        }
    }

    /// HTTP path of the operation on a service instance.
    pub fn path(&self) -> &'static str {
        match self {
            Operation::Analyze => "/analyze",
            Operation::Coach => "/coach",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discrete risk category derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Thresholds are checked top-down; the first match wins.
    pub fn from_score(score: u8) -> Self {
        if score >= 8 {
            RiskTier::Critical
        } else if score >= 6 {
            RiskTier::High
        } else if score >= 4 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Display color for the tier.
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::Critical => "#dc2626",
            RiskTier::High => "#ea580c",
            RiskTier::Medium => "#d97706",
            RiskTier::Low => "#059669",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One risky clause found in a document.
///
/// The score is the only stored classification; tier and color are always
/// recomputed from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskItem {
    /// Verbatim excerpt of the clause.
    pub clause: String,
    /// Plain-language explanation of the risk.
    pub risk: String,
    score: u8,
}

impl RiskItem {
    /// Create a risk item, clamping the score into `[1, 10]`.
    pub fn new(clause: impl Into<String>, risk: impl Into<String>, score: u8) -> Self {
        Self {
            clause: clause.into(),
            risk: risk.into(),
            score: score.clamp(MIN_RISK_SCORE, MAX_RISK_SCORE),
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn tier(&self) -> RiskTier {
        RiskTier::from_score(self.score)
    }

    pub fn color(&self) -> &'static str {
        self.tier().color()
    }
}

impl Serialize for RiskItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("RiskItem", 5)?;
        s.serialize_field("clause", &self.clause)?;
        s.serialize_field("risk", &self.risk)?;
        s.serialize_field("riskScore", &self.score)?;
        s.serialize_field("riskLevel", &self.tier())?;
        s.serialize_field("riskColor", self.color())?;
        s.end()
    }
}

/// Result of the analyze operation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Key decision points, in display order.
    pub decision_map: Vec<String>,
    /// Risky clauses, in display order.
    pub risk_radar: Vec<RiskItem>,
}

impl AnalysisResult {
    /// The risk item with the highest score, first one on ties.
    pub fn highest_risk(&self) -> Option<&RiskItem> {
        self.risk_radar
            .iter()
            .fold(None, |best: Option<&RiskItem>, item| match best {
                Some(b) if b.score() >= item.score() => Some(b),
                _ => Some(item),
            })
    }
}

/// Result of the coach operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoachResult {
    /// Rewritten, safer clause.
    pub suggestion: String,
    /// What changed and why.
    pub explanation: String,
}

/// One user action to send to a service instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    /// Analyze an uploaded document.
    Analyze { document: Vec<u8>, file_name: String },
    /// Rewrite one clause.
    Coach { clause: String },
}

impl AnalysisRequest {
    pub fn operation(&self) -> Operation {
        match self {
            AnalysisRequest::Analyze { .. } => Operation::Analyze,
            AnalysisRequest::Coach { .. } => Operation::Coach,
        }
    }

    /// Reject requests that carry nothing to analyze.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            AnalysisRequest::Analyze { document, .. } if document.iter().all(u8::is_ascii_whitespace) => {
                Err("Please select a document to analyze.")
            }
            AnalysisRequest::Coach { clause } if clause.trim().is_empty() => Err("Clause is required."),
            _ => Ok(()),
        }
    }
}

/// A validated response of either operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedResponse {
    Analysis(AnalysisResult),
    Coach(CoachResult),
}

impl NormalizedResponse {
    pub fn operation(&self) -> Operation {
        match self {
            NormalizedResponse::Analysis(_) => Operation::Analyze,
            NormalizedResponse::Coach(_) => Operation::Coach,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_mapping_is_total() {
        let expected = [
            (1, RiskTier::Low),
            (2, RiskTier::Low),
            (3, RiskTier::Low),
            (4, RiskTier::Medium),
            (5, RiskTier::Medium),
            (6, RiskTier::High),
            (7, RiskTier::High),
            (8, RiskTier::Critical),
            (9, RiskTier::Critical),
            (10, RiskTier::Critical),
        ];
        for (score, tier) in expected {
            assert_eq!(RiskTier::from_score(score), tier, "score {}", score);
        }
    }

    #[test]
    fn test_tier_colors() {
        assert_eq!(RiskItem::new("c", "r", 9).color(), "#dc2626");
        assert_eq!(RiskItem::new("c", "r", 7).color(), "#ea580c");
        assert_eq!(RiskItem::new("c", "r", 4).color(), "#d97706");
        assert_eq!(RiskItem::new("c", "r", 3).color(), "#059669");
    }

    #[test]
    fn test_score_clamped() {
        assert_eq!(RiskItem::new("c", "r", 0).score(), 1);
        assert_eq!(RiskItem::new("c", "r", 42).score(), 10);
    }

    #[test]
    fn test_risk_item_wire_shape() {
        let item = RiskItem::new("Tenant pays all repairs", "Unbounded cost", 8);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["riskScore"], 8);
        assert_eq!(value["riskLevel"], "critical");
        assert_eq!(value["riskColor"], "#dc2626");
    }

    #[test]
    fn test_request_validation() {
        let empty = AnalysisRequest::Analyze { document: b"  \n".to_vec(), file_name: "a.txt".into() };
        assert!(empty.validate().is_err());
        assert!(AnalysisRequest::Coach { clause: "".into() }.validate().is_err());
        assert!(AnalysisRequest::Coach { clause: "Fees apply.".into() }.validate().is_ok());
        assert_eq!(AnalysisRequest::Coach { clause: "x".into() }.operation().path(), "/coach");
    }

    #[test]
    fn test_highest_risk_prefers_first_on_tie() {
        let result = AnalysisResult {
            decision_map: vec![],
            risk_radar: vec![
                RiskItem::new("a", "r", 6),
                RiskItem::new("b", "r", 9),
                RiskItem::new("c", "r", 9),
            ],
        };
        assert_eq!(result.highest_risk().unwrap().clause, "b");
        assert!(AnalysisResult::default().highest_risk().is_none());
    }
}
