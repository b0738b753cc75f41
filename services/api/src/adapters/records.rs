//! services/api/src/adapters/records.rs
//!
//! Serializable mirrors of the core domain types.
//!
//! The same camelCase JSON shape is used for the model's reply, the history
//! file, and the JSON API, so it is defined once here. Converting a record
//! back into the domain is where the shape is validated.

use phishguard_core::domain::{DetectionStatus, HistoryEntry, PhishingAnalysis};
use phishguard_core::ports::{PortError, PortResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum StatusRecord {
    Safe,
    Suspicious,
    Malicious,
    Pending,
}

impl From<DetectionStatus> for StatusRecord {
    fn from(status: DetectionStatus) -> Self {
        match status {
            DetectionStatus::Safe => StatusRecord::Safe,
            DetectionStatus::Suspicious => StatusRecord::Suspicious,
            DetectionStatus::Malicious => StatusRecord::Malicious,
            DetectionStatus::Pending => StatusRecord::Pending,
        }
    }
}

impl From<StatusRecord> for DetectionStatus {
    fn from(status: StatusRecord) -> Self {
        match status {
            StatusRecord::Safe => DetectionStatus::Safe,
            StatusRecord::Suspicious => DetectionStatus::Suspicious,
            StatusRecord::Malicious => DetectionStatus::Malicious,
            StatusRecord::Pending => DetectionStatus::Pending,
        }
    }
}

/// A phishing verdict as JSON. Unknown fields are ignored on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub risk_score: u32,
    pub status: StatusRecord,
    pub red_flags: Vec<String>,
    pub semantic_analysis: String,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classic_model_score: Option<u32>,
}

impl AnalysisRecord {
    pub fn from_domain(analysis: &PhishingAnalysis) -> Self {
        Self {
            risk_score: u32::from(analysis.risk_score),
            status: analysis.status.into(),
            red_flags: analysis.red_flags.clone(),
            semantic_analysis: analysis.semantic_analysis.clone(),
            recommendations: analysis.recommendations.clone(),
            classic_model_score: analysis.classic_model_score.map(u32::from),
        }
    }

    pub fn to_domain(self) -> PortResult<PhishingAnalysis> {
        Ok(PhishingAnalysis {
            risk_score: score("riskScore", self.risk_score)?,
            status: self.status.into(),
            red_flags: self.red_flags,
            semantic_analysis: self.semantic_analysis,
            recommendations: self.recommendations,
            classic_model_score: self
                .classic_model_score
                .map(|value| score("classicModelScore", value))
                .transpose()?,
        })
    }
}

fn score(field: &str, value: u32) -> PortResult<u8> {
    u8::try_from(value)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or_else(|| {
            PortError::InvalidResponse(format!("{} {} is outside 0-100", field, value))
        })
}

/// One persisted history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntryRecord {
    pub id: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub subject: String,
    pub analysis: AnalysisRecord,
}

impl HistoryEntryRecord {
    pub fn from_domain(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id.clone(),
            timestamp: entry.timestamp,
            subject: entry.subject.clone(),
            analysis: AnalysisRecord::from_domain(&entry.analysis),
        }
    }

    pub fn to_domain(self) -> PortResult<HistoryEntry> {
        Ok(HistoryEntry {
            id: self.id,
            timestamp: self.timestamp,
            subject: self.subject,
            analysis: self.analysis.to_domain()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_fields_are_ignored() {
        let json = r#"{
            "riskScore": 40,
            "status": "Suspicious",
            "redFlags": ["mismatched sender"],
            "semanticAnalysis": "Odd tone.",
            "recommendations": [],
            "confidence": 0.7
        }"#;
        let record: AnalysisRecord = serde_json::from_str(json).unwrap();
        let analysis = record.to_domain().unwrap();
        assert_eq!(analysis.risk_score, 40);
        assert_eq!(analysis.classic_model_score, None);
    }

    #[test]
    fn out_of_enum_status_is_rejected() {
        let json = r#"{
            "riskScore": 40,
            "status": "Dangerous",
            "redFlags": [],
            "semanticAnalysis": "",
            "recommendations": []
        }"#;
        assert!(serde_json::from_str::<AnalysisRecord>(json).is_err());
    }

    #[test]
    fn scores_above_100_are_rejected() {
        let mut record = AnalysisRecord {
            risk_score: 101,
            status: StatusRecord::Malicious,
            red_flags: vec![],
            semantic_analysis: String::new(),
            recommendations: vec![],
            classic_model_score: None,
        };
        assert!(matches!(
            record.clone().to_domain(),
            Err(PortError::InvalidResponse(_))
        ));

        record.risk_score = 100;
        record.classic_model_score = Some(400);
        assert!(record.to_domain().is_err());
    }

    #[test]
    fn absent_classic_score_is_not_serialized() {
        let record = AnalysisRecord {
            risk_score: 5,
            status: StatusRecord::Safe,
            red_flags: vec![],
            semantic_analysis: "Fine.".to_string(),
            recommendations: vec![],
            classic_model_score: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"riskScore\":5"));
        assert!(!json.contains("classicModelScore"));
    }
}
