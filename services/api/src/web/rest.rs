//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the JSON API endpoints and the master
//! definition for the OpenAPI specification.

use crate::adapters::records::{AnalysisRecord, HistoryEntryRecord, StatusRecord};
use crate::web::protocol::{
    AnalysisResponse, AnalysisViewDto, AnalyzePayload, AnalyzeResponse, ErrorResponse, PhaseDto,
    RiskBandDto, StateResponse, ViewDto,
};
use crate::error::ApiError;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use phishguard_core::orchestrator::SubmitError;
use phishguard_core::presentation::AnalysisView;
use std::path::Path as FsPath;
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        analyze_handler,
        state_handler,
        list_history_handler,
        clear_history_handler,
        select_entry_handler,
        toggle_view_handler,
    ),
    components(
        schemas(
            AnalyzePayload,
            AnalyzeResponse,
            AnalysisResponse,
            AnalysisViewDto,
            AnalysisRecord,
            HistoryEntryRecord,
            StatusRecord,
            RiskBandDto,
            StateResponse,
            PhaseDto,
            ViewDto,
            ErrorResponse
        )
    ),
    tags(
        (name = "PhishGuard API", description = "Phishing analysis of pasted emails, with a local history of verdicts.")
    )
)]
pub struct ApiDoc;

/// Builds the OpenAPI document stamped with the crate version.
pub fn openapi_document() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc
}

/// Writes the pretty-printed OpenAPI document to `path`, creating parent
/// directories as needed. Returns the number of documented paths.
pub fn write_openapi(path: &FsPath) -> Result<usize, ApiError> {
    let doc = openapi_document();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, doc.to_pretty_json()?)?;
    Ok(doc.paths.paths.len())
}

type ApiFailure = (StatusCode, Json<ErrorResponse>);

fn failure(status: StatusCode, message: impl Into<String>) -> ApiFailure {
    (status, Json(ErrorResponse::new(message)))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Analyze one email.
///
/// Calls the analysis service once. On success the verdict is recorded at the
/// top of the history.
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body = AnalyzePayload,
    responses(
        (status = 200, description = "Analysis completed", body = AnalyzeResponse),
        (status = 400, description = "The email body is empty", body = ErrorResponse),
        (status = 409, description = "Another analysis is still running", body = ErrorResponse),
        (status = 502, description = "The analysis service failed", body = ErrorResponse)
    )
)]
pub async fn analyze_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<AnalyzePayload>,
) -> Result<Json<AnalyzeResponse>, ApiFailure> {
    match app_state
        .orchestrator
        .submit(&payload.subject, &payload.body)
        .await
    {
        Ok(entry) => Ok(Json(AnalyzeResponse {
            view: AnalysisViewDto::from(&AnalysisView::render(&entry.analysis)),
            entry: HistoryEntryRecord::from_domain(&entry),
        })),
        Err(SubmitError::EmptyBody) => Err(failure(
            StatusCode::BAD_REQUEST,
            SubmitError::EmptyBody.to_string(),
        )),
        Err(SubmitError::AnalysisInFlight) => Err(failure(
            StatusCode::CONFLICT,
            SubmitError::AnalysisInFlight.to_string(),
        )),
        Err(SubmitError::AnalysisFailed { notice, .. }) => {
            Err(failure(StatusCode::BAD_GATEWAY, notice))
        }
    }
}

/// Get the current screen state.
#[utoipa::path(
    get,
    path = "/api/state",
    responses((status = 200, description = "Current state", body = StateResponse))
)]
pub async fn state_handler(State(app_state): State<Arc<AppState>>) -> Json<StateResponse> {
    let snapshot = app_state.orchestrator.snapshot().await;
    Json(StateResponse::from(&snapshot))
}

/// List past analyses, most recent first.
#[utoipa::path(
    get,
    path = "/api/history",
    responses((status = 200, description = "History entries", body = Vec<HistoryEntryRecord>))
)]
pub async fn list_history_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<Vec<HistoryEntryRecord>> {
    let snapshot = app_state.orchestrator.snapshot().await;
    Json(
        snapshot
            .history
            .iter()
            .map(HistoryEntryRecord::from_domain)
            .collect(),
    )
}

/// Delete the whole history.
#[utoipa::path(
    delete,
    path = "/api/history",
    responses(
        (status = 204, description = "History cleared"),
        (status = 500, description = "The history record could not be removed", body = ErrorResponse)
    )
)]
pub async fn clear_history_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiFailure> {
    app_state
        .orchestrator
        .clear_history()
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(|e| {
            error!("Failed to clear history: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to clear history")
        })
}

/// Show a past analysis again.
#[utoipa::path(
    post,
    path = "/api/history/{id}/select",
    params(("id" = String, Path, description = "History entry id")),
    responses(
        (status = 200, description = "The stored analysis", body = AnalysisResponse),
        (status = 404, description = "No entry with this id", body = ErrorResponse)
    )
)]
pub async fn select_entry_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisResponse>, ApiFailure> {
    app_state
        .orchestrator
        .select_entry(&id)
        .await
        .map(|analysis| Json(AnalysisResponse::render(&analysis)))
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, format!("No history entry '{}'", id)))
}

/// Switch between the analysis form and the history panel.
#[utoipa::path(
    post,
    path = "/api/view/toggle",
    responses((status = 200, description = "State after toggling", body = StateResponse))
)]
pub async fn toggle_view_handler(State(app_state): State<Arc<AppState>>) -> Json<StateResponse> {
    app_state.orchestrator.toggle_history().await;
    let snapshot = app_state.orchestrator.snapshot().await;
    Json(StateResponse::from(&snapshot))
}
