//! Integration tests for the web layer, driving the handlers against a
//! scripted analysis service and in-memory history storage.

use api_lib::config::Config;
use api_lib::web::page::{self, AnalyzeForm};
use api_lib::web::protocol::{AnalyzePayload, PhaseDto, RiskBandDto, ViewDto};
use api_lib::web::rest;
use api_lib::web::state::AppState;
use async_trait::async_trait;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::Json;
use phishguard_core::domain::{DetectionStatus, PhishingAnalysis};
use phishguard_core::memory::InMemoryHistoryStorage;
use phishguard_core::ports::{AnalysisService, HistoryStorage, PortError, PortResult};
use phishguard_core::FAILURE_NOTICE;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

struct ScriptedAnalyzer {
    replies: Mutex<VecDeque<PortResult<PhishingAnalysis>>>,
    calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    fn new(replies: Vec<PortResult<PhishingAnalysis>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisService for ScriptedAnalyzer {
    async fn analyze_email(&self, _subject: &str, _body: &str) -> PortResult<PhishingAnalysis> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(PortError::Unexpected("no scripted reply".to_string())))
    }
}

fn malicious_verdict() -> PhishingAnalysis {
    PhishingAnalysis {
        risk_score: 92,
        status: DetectionStatus::Malicious,
        red_flags: vec!["urgency language".to_string(), "suspicious link".to_string()],
        semantic_analysis: "Threatens suspension to force a click.".to_string(),
        recommendations: vec!["Do not click".to_string(), "Report to IT".to_string()],
        classic_model_score: Some(78),
    }
}

fn safe_verdict() -> PhishingAnalysis {
    PhishingAnalysis {
        risk_score: 8,
        status: DetectionStatus::Safe,
        red_flags: vec![],
        semantic_analysis: "An ordinary meeting reminder.".to_string(),
        recommendations: vec!["No action needed".to_string()],
        classic_model_score: None,
    }
}

fn test_config() -> Arc<Config> {
    Arc::new(Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        log_level: tracing::Level::INFO,
        analysis_api_key: None,
        analysis_api_base: "http://localhost:9".to_string(),
        analysis_model: "test-model".to_string(),
        history_dir: PathBuf::from("/nonexistent"),
    })
}

async fn app(
    analyzer: Arc<ScriptedAnalyzer>,
    storage: Arc<InMemoryHistoryStorage>,
) -> Arc<AppState> {
    Arc::new(AppState::new(test_config(), analyzer, storage).await)
}

#[tokio::test]
async fn analyze_renders_verdict_and_records_history() {
    let analyzer = ScriptedAnalyzer::new(vec![Ok(malicious_verdict())]);
    let storage = Arc::new(InMemoryHistoryStorage::new());
    let state = app(analyzer.clone(), storage.clone()).await;

    let Json(response) = rest::analyze_handler(
        State(state.clone()),
        Json(AnalyzePayload {
            subject: "Urgent: Verify your account".to_string(),
            body: "Click here immediately to avoid suspension".to_string(),
        }),
    )
    .await
    .unwrap();

    assert_eq!(analyzer.calls(), 1);
    assert_eq!(response.entry.subject, "Urgent: Verify your account");
    assert_eq!(response.view.banner_title, "Detection Result: Malicious");
    assert_eq!(response.view.gauge_percent, 92);
    assert_eq!(response.view.risk_band, RiskBandDto::High);
    assert_eq!(response.view.red_flags.len(), 2);
    assert_eq!(response.view.recommendations, vec!["Do not click", "Report to IT"]);

    let Json(history) = rest::list_history_handler(State(state.clone())).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, response.entry.id);
    assert_eq!(storage.load().await.unwrap().len(), 1);

    let Json(snapshot) = rest::state_handler(State(state)).await;
    assert_eq!(snapshot.phase, PhaseDto::Result);
    assert!(snapshot.notice.is_none());
    assert_eq!(snapshot.current_result.unwrap().analysis.risk_score, 92);
}

#[tokio::test]
async fn empty_body_is_a_bad_request_without_a_call() {
    let analyzer = ScriptedAnalyzer::new(vec![Ok(safe_verdict())]);
    let state = app(analyzer.clone(), Arc::new(InMemoryHistoryStorage::new())).await;

    let (status, Json(error)) = rest::analyze_handler(
        State(state.clone()),
        Json(AnalyzePayload {
            subject: "Hello".to_string(),
            body: "   ".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error.message.contains("empty"));
    assert_eq!(analyzer.calls(), 0);
    let Json(history) = rest::list_history_handler(State(state)).await;
    assert!(history.is_empty());
}

#[tokio::test]
async fn service_failure_is_a_bad_gateway_with_notice() {
    let analyzer = ScriptedAnalyzer::new(vec![Err(PortError::InvalidResponse(
        "missing field `riskScore`".to_string(),
    ))]);
    let state = app(analyzer, Arc::new(InMemoryHistoryStorage::new())).await;

    let (status, Json(error)) = rest::analyze_handler(
        State(state.clone()),
        Json(AnalyzePayload {
            subject: String::new(),
            body: "Your invoice is attached".to_string(),
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error.message, FAILURE_NOTICE);

    let Json(snapshot) = rest::state_handler(State(state)).await;
    assert_eq!(snapshot.phase, PhaseDto::Failed);
    assert_eq!(snapshot.notice.as_deref(), Some(FAILURE_NOTICE));
    assert!(snapshot.current_result.is_none());
    assert!(snapshot.history.is_empty());
}

#[tokio::test]
async fn select_toggle_and_clear_history() {
    let analyzer = ScriptedAnalyzer::new(vec![Ok(safe_verdict()), Ok(malicious_verdict())]);
    let storage = Arc::new(InMemoryHistoryStorage::new());
    let state = app(analyzer, storage.clone()).await;

    for (subject, body) in [("", "Team sync moved to 3pm"), ("Act now", "Wire the funds")] {
        rest::analyze_handler(
            State(state.clone()),
            Json(AnalyzePayload {
                subject: subject.to_string(),
                body: body.to_string(),
            }),
        )
        .await
        .unwrap();
    }

    let Json(toggled) = rest::toggle_view_handler(State(state.clone())).await;
    assert_eq!(toggled.view, ViewDto::History);
    assert_eq!(toggled.history[0].subject, "Act now");
    assert_eq!(toggled.history[1].subject, "Team sync moved to 3pm");

    let older_id = toggled.history[1].id.clone();
    let Json(selected) = rest::select_entry_handler(State(state.clone()), Path(older_id))
        .await
        .unwrap();
    assert_eq!(selected.analysis.risk_score, 8);
    assert_eq!(selected.view.red_flags, vec!["No significant red flags detected."]);

    let Json(after_select) = rest::state_handler(State(state.clone())).await;
    assert_eq!(after_select.view, ViewDto::NewAnalysis);
    assert_eq!(after_select.history.len(), 2);

    let (status, _) = rest::select_entry_handler(State(state.clone()), Path("missing".to_string()))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);

    let status = rest::clear_history_handler(State(state.clone()))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!storage.is_present().await);

    let reloaded = app(ScriptedAnalyzer::new(vec![]), storage).await;
    let Json(history) = rest::list_history_handler(State(reloaded)).await;
    assert!(history.is_empty());
}

#[tokio::test]
async fn history_is_reloaded_on_startup() {
    let storage = Arc::new(InMemoryHistoryStorage::new());
    let first = app(
        ScriptedAnalyzer::new(vec![Ok(safe_verdict()), Ok(malicious_verdict())]),
        storage.clone(),
    )
    .await;
    for body in ["first body", "second body"] {
        rest::analyze_handler(
            State(first.clone()),
            Json(AnalyzePayload {
                subject: String::new(),
                body: body.to_string(),
            }),
        )
        .await
        .unwrap();
    }
    let Json(before) = rest::list_history_handler(State(first)).await;

    let second = app(ScriptedAnalyzer::new(vec![]), storage).await;
    let Json(after) = rest::list_history_handler(State(second)).await;
    assert_eq!(after, before);
    assert_eq!(after[0].subject, "second body");
}

#[tokio::test]
async fn page_renders_result_after_form_submit() {
    let analyzer = ScriptedAnalyzer::new(vec![Ok(malicious_verdict())]);
    let state = app(analyzer, Arc::new(InMemoryHistoryStorage::new())).await;

    let html = page::index_page(State(state.clone())).await.unwrap().0;
    assert!(html.contains("Ready for input."));
    assert!(!html.contains("type=\"submit\" disabled"));

    page::analyze_form(
        State(state.clone()),
        Form(AnalyzeForm {
            subject: "Urgent: Verify your account".to_string(),
            body: "Click here immediately to avoid suspension".to_string(),
        }),
    )
    .await;

    let html = page::index_page(State(state.clone())).await.unwrap().0;
    assert!(html.contains("Detection Result: Malicious"));
    assert!(html.contains("92%"));
    assert!(html.contains("suspicious link"));
    assert!(html.contains("Report to IT"));
    assert!(html.contains("Simulated TF-IDF Model: 78%"));

    page::toggle_history_form(State(state.clone())).await;
    let html = page::index_page(State(state)).await.unwrap().0;
    assert!(html.contains("Urgent: Verify your account"));
    assert!(html.contains("Score: 92%"));
}

#[tokio::test]
async fn page_shows_failure_notice() {
    let analyzer = ScriptedAnalyzer::new(vec![Err(PortError::Unexpected(
        "connection refused".to_string(),
    ))]);
    let state = app(analyzer, Arc::new(InMemoryHistoryStorage::new())).await;

    page::analyze_form(
        State(state.clone()),
        Form(AnalyzeForm {
            subject: String::new(),
            body: "Please confirm your password".to_string(),
        }),
    )
    .await;

    let html = page::index_page(State(state)).await.unwrap().0;
    assert!(html.contains(FAILURE_NOTICE));
    assert!(!html.contains("Detection Result"));
}

#[tokio::test]
async fn page_selection_redisplays_a_past_verdict() {
    let analyzer = ScriptedAnalyzer::new(vec![Ok(malicious_verdict()), Ok(safe_verdict())]);
    let state = app(analyzer, Arc::new(InMemoryHistoryStorage::new())).await;

    for body in ["Click here immediately", "Team sync moved to 3pm"] {
        page::analyze_form(
            State(state.clone()),
            Form(AnalyzeForm {
                subject: String::new(),
                body: body.to_string(),
            }),
        )
        .await;
    }
    page::toggle_history_form(State(state.clone())).await;

    let Json(history) = rest::list_history_handler(State(state.clone())).await;
    let older_id = history[1].id.clone();
    let html = page::index_page(State(state.clone())).await.unwrap().0;
    assert!(html.contains(&format!("action=\"/history/{}/select\"", older_id)));

    assert!(page::select_entry_page(State(state.clone()), Path(older_id))
        .await
        .is_ok());
    let html = page::index_page(State(state.clone())).await.unwrap().0;
    assert!(html.contains("Detection Result: Malicious"));
    assert!(html.contains("Run AI Forensics"));

    let (status, _) = page::select_entry_page(State(state), Path("missing".to_string()))
        .await
        .unwrap_err();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[test]
fn openapi_document_is_written_with_every_route() {
    let dir = std::env::temp_dir().join(format!("phishguard-openapi-{}", uuid::Uuid::new_v4()));
    let output = dir.join("docs").join("openapi.json");

    let paths = rest::write_openapi(&output).unwrap();

    assert_eq!(paths, 5);
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["info"]["version"], env!("CARGO_PKG_VERSION"));
    for route in [
        "/api/analyze",
        "/api/state",
        "/api/history",
        "/api/history/{id}/select",
        "/api/view/toggle",
    ] {
        assert!(written["paths"].get(route).is_some(), "missing {}", route);
    }
    std::fs::remove_dir_all(dir).unwrap();
}
