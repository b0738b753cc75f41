//! services/api/src/web/page.rs
//!
//! The server-rendered screen: the analysis form, the result panel, and the
//! history panel. Form posts run the same orchestrator operations as the JSON
//! API and then redirect back to the page.

use crate::web::state::AppState;
use askama::Template;
use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use phishguard_core::orchestrator::{Snapshot, SubmitError};
use phishguard_core::presentation::{AnalysisView, HistoryRow};
use phishguard_core::state::View;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

//=========================================================================================
// Templates
//=========================================================================================

/// The single application page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub analyzing: bool,
    pub show_history: bool,
    pub notice: Option<String>,
    pub result: Option<ResultPanel>,
    pub history: Vec<HistoryRowPanel>,
}

/// Flattened display values of one analysis.
pub struct ResultPanel {
    pub banner_title: String,
    pub status_color: String,
    pub status_icon: String,
    pub gauge_percent: u8,
    pub gauge_color: String,
    pub classic_percent: Option<u8>,
    pub red_flags: Vec<String>,
    pub semantic_analysis: String,
    pub recommendations: Vec<String>,
}

impl From<&AnalysisView> for ResultPanel {
    fn from(view: &AnalysisView) -> Self {
        Self {
            banner_title: view.banner_title.clone(),
            status_color: view.status.color.to_string(),
            status_icon: view.status.icon.unwrap_or_default().to_string(),
            gauge_percent: view.gauge.percent(),
            gauge_color: view.gauge.color().to_string(),
            classic_percent: view.classic_gauge.map(|gauge| gauge.percent()),
            red_flags: view.red_flag_lines(),
            semantic_analysis: view.semantic_analysis.clone(),
            recommendations: view.recommendations.clone(),
        }
    }
}

pub struct HistoryRowPanel {
    pub id: String,
    pub subject: String,
    pub status_label: String,
    pub status_color: String,
    pub date: String,
    pub score_label: String,
}

impl From<HistoryRow> for HistoryRowPanel {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            subject: row.subject,
            status_label: row.status.label.to_string(),
            status_color: row.status.color.to_string(),
            date: row.date,
            score_label: row.score_label,
        }
    }
}

impl IndexTemplate {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            analyzing: snapshot.screen.is_analyzing(),
            show_history: snapshot.screen.view == View::History,
            notice: snapshot.screen.notice().map(str::to_string),
            result: snapshot
                .screen
                .current_result()
                .map(|analysis| ResultPanel::from(&AnalysisView::render(analysis))),
            history: snapshot
                .history
                .iter()
                .map(|entry| HistoryRowPanel::from(HistoryRow::render(entry)))
                .collect(),
        }
    }
}

//=========================================================================================
// Form Payloads
//=========================================================================================

#[derive(Deserialize, Debug)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

//=========================================================================================
// Page Handlers
//=========================================================================================

/// Renders the page for the current state.
pub async fn index_page(
    State(app_state): State<Arc<AppState>>,
) -> Result<Html<String>, (StatusCode, String)> {
    let snapshot = app_state.orchestrator.snapshot().await;
    IndexTemplate::from_snapshot(&snapshot)
        .render()
        .map(Html)
        .map_err(|e| {
            error!("Failed to render page: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to render page".to_string(),
            )
        })
}

/// Handles the analysis form. Failures show up as the notice on the next render.
pub async fn analyze_form(
    State(app_state): State<Arc<AppState>>,
    Form(form): Form<AnalyzeForm>,
) -> Redirect {
    match app_state.orchestrator.submit(&form.subject, &form.body).await {
        Ok(entry) => info!("Recorded history entry {}", entry.id),
        Err(SubmitError::EmptyBody) => info!("Ignored submission with an empty body."),
        Err(SubmitError::AnalysisInFlight) => info!("Ignored submission while analyzing."),
        Err(SubmitError::AnalysisFailed { .. }) => {}
    }
    Redirect::to("/")
}

pub async fn toggle_history_form(State(app_state): State<Arc<AppState>>) -> Redirect {
    app_state.orchestrator.toggle_history().await;
    Redirect::to("/")
}

pub async fn clear_history_form(
    State(app_state): State<Arc<AppState>>,
) -> Result<Redirect, (StatusCode, String)> {
    app_state.orchestrator.clear_history().await.map_err(|e| {
        error!("Failed to clear history: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to clear history".to_string(),
        )
    })?;
    Ok(Redirect::to("/"))
}

pub async fn select_entry_page(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Redirect, (StatusCode, String)> {
    match app_state.orchestrator.select_entry(&id).await {
        Some(_) => Ok(Redirect::to("/")),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("No history entry '{}'", id),
        )),
    }
}
