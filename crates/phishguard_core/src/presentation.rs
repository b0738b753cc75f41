//! crates/phishguard_core/src/presentation.rs
//!
//! Pure mapping from a `PhishingAnalysis` to the values a renderer needs:
//! gauge proportion and color band, status banner style, and list contents.

use crate::domain::{DetectionStatus, HistoryEntry, PhishingAnalysis};
use chrono::{TimeZone, Utc};

pub const LOW_RISK_COLOR: &str = "#10b981";
pub const MEDIUM_RISK_COLOR: &str = "#f59e0b";
pub const HIGH_RISK_COLOR: &str = "#ef4444";
pub const PENDING_COLOR: &str = "#64748b";

/// Shown in place of an empty red-flag list.
pub const NO_RED_FLAGS: &str = "No significant red flags detected.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// `<30` low, `30..=69` medium, `>=70` high.
    pub fn for_score(score: u8) -> Self {
        match score {
            0..=29 => RiskBand::Low,
            30..=69 => RiskBand::Medium,
            _ => RiskBand::High,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskBand::Low => LOW_RISK_COLOR,
            RiskBand::Medium => MEDIUM_RISK_COLOR,
            RiskBand::High => HIGH_RISK_COLOR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gauge {
    /// Score clamped to 0-100.
    pub score: u8,
    /// Filled share of the gauge, 0.0-1.0.
    pub fill: f32,
    pub band: RiskBand,
}

impl Gauge {
    pub fn new(score: u8) -> Self {
        let score = score.min(100);
        Self {
            score,
            fill: f32::from(score) / 100.0,
            band: RiskBand::for_score(score),
        }
    }

    pub fn color(&self) -> &'static str {
        self.band.color()
    }

    /// Fill as a whole percentage, for CSS widths.
    pub fn percent(&self) -> u8 {
        self.score
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub label: &'static str,
    pub color: &'static str,
    pub icon: Option<&'static str>,
}

impl StatusStyle {
    pub fn for_status(status: DetectionStatus) -> Self {
        let (color, icon) = match status {
            DetectionStatus::Safe => (LOW_RISK_COLOR, Some("shield-check")),
            DetectionStatus::Suspicious => (MEDIUM_RISK_COLOR, Some("alert-triangle")),
            DetectionStatus::Malicious => (HIGH_RISK_COLOR, Some("shield-alert")),
            DetectionStatus::Pending => (PENDING_COLOR, None),
        };
        Self {
            label: status.as_str(),
            color,
            icon,
        }
    }
}

/// Everything the result panel displays for one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisView {
    pub banner_title: String,
    pub status: StatusStyle,
    pub gauge: Gauge,
    pub classic_gauge: Option<Gauge>,
    pub red_flags: Vec<String>,
    pub semantic_analysis: String,
    pub recommendations: Vec<String>,
}

impl AnalysisView {
    pub fn render(analysis: &PhishingAnalysis) -> Self {
        Self {
            banner_title: format!("Detection Result: {}", analysis.status),
            status: StatusStyle::for_status(analysis.status),
            gauge: Gauge::new(analysis.risk_score),
            classic_gauge: analysis.classic_model_score.map(Gauge::new),
            red_flags: analysis.red_flags.clone(),
            semantic_analysis: analysis.semantic_analysis.clone(),
            recommendations: analysis.recommendations.clone(),
        }
    }

    /// The red-flag lines to show, with a placeholder when there are none.
    pub fn red_flag_lines(&self) -> Vec<String> {
        if self.red_flags.is_empty() {
            vec![NO_RED_FLAGS.to_string()]
        } else {
            self.red_flags.clone()
        }
    }
}

/// One row of the history panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: String,
    pub subject: String,
    pub status: StatusStyle,
    /// Locale-independent `YYYY-MM-DD` of the entry timestamp (UTC).
    pub date: String,
    pub score_label: String,
}

impl HistoryRow {
    pub fn render(entry: &HistoryEntry) -> Self {
        let date = Utc
            .timestamp_millis_opt(entry.timestamp)
            .single()
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        Self {
            id: entry.id.clone(),
            subject: entry.subject.clone(),
            status: StatusStyle::for_status(entry.analysis.status),
            date,
            score_label: format!("Score: {}%", entry.analysis.risk_score),
        }
    }
}
