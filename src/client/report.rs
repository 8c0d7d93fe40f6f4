//! Exportable analysis report.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, CoachResult, RiskTier};

/// One risk as written to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRisk {
    pub clause: String,
    pub risk: String,
    pub score: u8,
    pub tier: RiskTier,
}

/// Snapshot of an analysis session, saved as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
    pub document: String,
    pub decision_map: Vec<String>,
    pub risks: Vec<ReportRisk>,
    pub coach_suggestion: Option<String>,
    pub coach_explanation: Option<String>,
}

impl AnalysisReport {
    pub fn new(document: impl Into<String>, result: &AnalysisResult) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self {
            timestamp,
            document: document.into(),
            decision_map: result.decision_map.clone(),
            risks: result
                .risk_radar
                .iter()
                .map(|item| ReportRisk {
                    clause: item.clause.clone(),
                    risk: item.risk.clone(),
                    score: item.score(),
                    tier: item.tier(),
                })
                .collect(),
            coach_suggestion: None,
            coach_explanation: None,
        }
    }

    /// Attach a clause rewrite.
    pub fn with_coaching(mut self, coaching: &CoachResult) -> Self {
        self.coach_suggestion = Some(coaching.suggestion.clone());
        self.coach_explanation = Some(coaching.explanation.clone());
        self
    }

    /// `lexcompass-analysis-<millis>.json`
    pub fn default_file_name() -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        format!("lexcompass-analysis-{}.json", millis)
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::RiskItem;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            decision_map: vec!["Notice period is 30 days".into()],
            risk_radar: vec![RiskItem::new("Fees double after 5 days.", "Costly late fees.", 7)],
        }
    }

    #[test]
    fn test_report_carries_derived_tier() {
        let report = AnalysisReport::new("lease.txt", &sample());
        assert_eq!(report.risks[0].tier, RiskTier::High);
        assert!(report.coach_suggestion.is_none());
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = AnalysisReport::new("lease.txt", &sample()).with_coaching(&CoachResult {
            suggestion: "Fees may not exceed 5%.".into(),
            explanation: "Caps the fee.".into(),
        });

        report.write_to(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"coachSuggestion\": \"Fees may not exceed 5%.\""));
        let back: AnalysisReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_default_file_name_shape() {
        let name = AnalysisReport::default_file_name();
        assert!(name.starts_with("lexcompass-analysis-"));
        assert!(name.ends_with(".json"));
    }
}
