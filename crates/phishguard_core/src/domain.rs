//! crates/phishguard_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of history entries kept, most recent first.
pub const HISTORY_CAPACITY: usize = 20;

/// Number of body characters used when a subject has to be derived.
pub const FALLBACK_SUBJECT_CHARS: usize = 30;

/// The verdict category returned by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectionStatus {
    Safe,
    Suspicious,
    Malicious,
    Pending,
}

impl DetectionStatus {
    pub const ALL: [DetectionStatus; 4] = [
        DetectionStatus::Safe,
        DetectionStatus::Suspicious,
        DetectionStatus::Malicious,
        DetectionStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionStatus::Safe => "Safe",
            DetectionStatus::Suspicious => "Suspicious",
            DetectionStatus::Malicious => "Malicious",
            DetectionStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for DetectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of the four known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown detection status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for DetectionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exact match only, the service contract names the four values verbatim.
        DetectionStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// The structured verdict produced by the external analysis service.
///
/// The application never computes these fields; it only checks that the
/// service returned something of the right shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhishingAnalysis {
    /// Overall phishing likelihood, 0-100.
    pub risk_score: u8,
    pub status: DetectionStatus,
    pub red_flags: Vec<String>,
    pub semantic_analysis: String,
    pub recommendations: Vec<String>,
    /// Secondary score reported alongside the primary one, 0-100.
    pub classic_model_score: Option<u8>,
}

/// A single submission, alive only for the duration of one analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub subject: Option<String>,
    pub body: String,
}

impl AnalysisRequest {
    /// Builds a request from raw form input.
    ///
    /// Returns `None` when the body is empty after trimming, in which case no
    /// analysis must be attempted. A blank subject is treated as absent.
    pub fn from_input(subject: &str, body: &str) -> Option<Self> {
        if body.trim().is_empty() {
            return None;
        }
        let subject = subject.trim();
        Some(Self {
            subject: (!subject.is_empty()).then(|| subject.to_string()),
            body: body.to_string(),
        })
    }

    /// The subject to store in history: the given subject, or one derived from the body.
    pub fn display_subject(&self) -> String {
        match &self.subject {
            Some(subject) => subject.clone(),
            None => fallback_subject(&self.body),
        }
    }
}

/// Derives a title from the body: the first 30 characters of the trimmed
/// body, with an ellipsis appended only when something was cut off.
pub fn fallback_subject(body: &str) -> String {
    let trimmed = body.trim();
    let mut chars = trimmed.chars();
    let head: String = chars.by_ref().take(FALLBACK_SUBJECT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// A persisted record pairing a past analysis with its subject and time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: String,
    /// Completion time in epoch milliseconds.
    pub timestamp: i64,
    pub subject: String,
    pub analysis: PhishingAnalysis,
}

impl HistoryEntry {
    /// Creates the entry for an analysis that completed at `completed_at`.
    pub fn new(subject: String, analysis: PhishingAnalysis, completed_at: DateTime<Utc>) -> Self {
        let timestamp = completed_at.timestamp_millis();
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("{}-{}", timestamp, &suffix[..8]),
            timestamp,
            subject,
            analysis,
        }
    }
}
