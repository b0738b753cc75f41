//! services/api/src/web/protocol.rs
//!
//! Defines the JSON message shapes exchanged between the browser client and the
//! API server.

use crate::adapters::records::{AnalysisRecord, HistoryEntryRecord};
use phishguard_core::presentation::{AnalysisView, RiskBand};
use phishguard_core::state::{Phase, ScreenState, View};
use phishguard_core::Snapshot;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// An email to analyze. `subject` may be omitted.
#[derive(Deserialize, Debug, ToSchema)]
pub struct AnalyzePayload {
    #[serde(default)]
    pub subject: String,
    pub body: String,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Display values derived from an analysis.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct AnalysisViewDto {
    pub banner_title: String,
    pub status_color: String,
    pub status_icon: Option<String>,
    pub risk_band: RiskBandDto,
    pub gauge_percent: u8,
    pub gauge_color: String,
    pub classic_percent: Option<u8>,
    /// Red flags, or a single placeholder line when there are none.
    pub red_flags: Vec<String>,
    pub semantic_analysis: String,
    pub recommendations: Vec<String>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskBandDto {
    Low,
    Medium,
    High,
}

impl From<RiskBand> for RiskBandDto {
    fn from(band: RiskBand) -> Self {
        match band {
            RiskBand::Low => RiskBandDto::Low,
            RiskBand::Medium => RiskBandDto::Medium,
            RiskBand::High => RiskBandDto::High,
        }
    }
}

impl From<&AnalysisView> for AnalysisViewDto {
    fn from(view: &AnalysisView) -> Self {
        Self {
            banner_title: view.banner_title.clone(),
            status_color: view.status.color.to_string(),
            status_icon: view.status.icon.map(str::to_string),
            risk_band: view.gauge.band.into(),
            gauge_percent: view.gauge.percent(),
            gauge_color: view.gauge.color().to_string(),
            classic_percent: view.classic_gauge.map(|gauge| gauge.percent()),
            red_flags: view.red_flag_lines(),
            semantic_analysis: view.semantic_analysis.clone(),
            recommendations: view.recommendations.clone(),
        }
    }
}

/// An analysis together with its rendering.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct AnalysisResponse {
    pub analysis: AnalysisRecord,
    pub view: AnalysisViewDto,
}

impl AnalysisResponse {
    pub fn render(analysis: &phishguard_core::PhishingAnalysis) -> Self {
        Self {
            analysis: AnalysisRecord::from_domain(analysis),
            view: AnalysisViewDto::from(&AnalysisView::render(analysis)),
        }
    }
}

/// The reply to a successful analysis: the new history entry and its rendering.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct AnalyzeResponse {
    pub entry: HistoryEntryRecord,
    pub view: AnalysisViewDto,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhaseDto {
    Idle,
    Analyzing,
    Result,
    Failed,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViewDto {
    NewAnalysis,
    History,
}

/// Everything the screen currently shows.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct StateResponse {
    pub phase: PhaseDto,
    pub view: ViewDto,
    pub current_result: Option<AnalysisResponse>,
    pub notice: Option<String>,
    pub history: Vec<HistoryEntryRecord>,
}

impl From<&Snapshot> for StateResponse {
    fn from(snapshot: &Snapshot) -> Self {
        let ScreenState { phase, view } = &snapshot.screen;
        let phase_dto = match phase {
            Phase::Idle => PhaseDto::Idle,
            Phase::Analyzing => PhaseDto::Analyzing,
            Phase::Result(_) => PhaseDto::Result,
            Phase::Failed(_) => PhaseDto::Failed,
        };
        let view_dto = match view {
            View::NewAnalysis => ViewDto::NewAnalysis,
            View::History => ViewDto::History,
        };
        Self {
            phase: phase_dto,
            view: view_dto,
            current_result: snapshot.screen.current_result().map(AnalysisResponse::render),
            notice: snapshot.screen.notice().map(str::to_string),
            history: snapshot
                .history
                .iter()
                .map(HistoryEntryRecord::from_domain)
                .collect(),
        }
    }
}

/// The body of every JSON error reply.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
