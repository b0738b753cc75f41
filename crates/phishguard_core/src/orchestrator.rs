//! crates/phishguard_core/src/orchestrator.rs
//!
//! Drives one submission from the form through the analysis service and into
//! the history, and owns the screen state for every other user action.

use crate::domain::{AnalysisRequest, HistoryEntry, PhishingAnalysis};
use crate::history::HistoryStore;
use crate::ports::{AnalysisService, HistoryStorage, PortError, PortResult};
use crate::state::{ScreenEvent, ScreenState, View};
use chrono::Utc;
use futures::lock::Mutex;
use std::sync::{Arc, Mutex as SyncMutex, MutexGuard, PoisonError};
use tracing::{error, info, warn};

/// The notice shown to the user for any failed analysis.
pub const FAILURE_NOTICE: &str = "Error during analysis. Please check your API key and network.";

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("the email body is empty")]
    EmptyBody,
    #[error("an analysis is already in progress")]
    AnalysisInFlight,
    #[error("{notice}")]
    AnalysisFailed {
        notice: String,
        #[source]
        cause: PortError,
    },
}

/// A consistent copy of everything the screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub screen: ScreenState,
    pub history: Vec<HistoryEntry>,
}

pub struct Orchestrator {
    analyzer: Arc<dyn AnalysisService>,
    // Screen transitions are synchronous so they can also run from `Drop`.
    // Lock order is history, then screen. Neither is held across the analysis call.
    screen: SyncMutex<ScreenState>,
    history: Mutex<HistoryStore>,
}

/// Marks the screen as analyzing for as long as a submission is pending.
///
/// If the submission future is dropped before it settles (a client that went
/// away mid-call), the screen is moved out of `Analyzing` so later submissions
/// are accepted again.
struct PendingAnalysis<'a> {
    orchestrator: &'a Orchestrator,
    settled: bool,
}

impl<'a> PendingAnalysis<'a> {
    fn begin(orchestrator: &'a Orchestrator) -> Result<Self, SubmitError> {
        orchestrator
            .screen()
            .apply(ScreenEvent::Submit)
            .map_err(|_| SubmitError::AnalysisInFlight)?;
        Ok(Self {
            orchestrator,
            settled: false,
        })
    }

    fn settle(mut self, event: ScreenEvent) {
        self.settled = true;
        self.orchestrator.transition(event);
    }
}

impl Drop for PendingAnalysis<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Analysis abandoned before completion.");
            self.orchestrator.transition(ScreenEvent::AnalysisAbandoned);
        }
    }
}

impl Orchestrator {
    /// Loads the persisted history and starts with an idle screen.
    pub async fn start(analyzer: Arc<dyn AnalysisService>, storage: Arc<dyn HistoryStorage>) -> Self {
        let history = HistoryStore::load(storage).await;
        Self {
            analyzer,
            screen: SyncMutex::new(ScreenState::new()),
            history: Mutex::new(history),
        }
    }

    fn screen(&self) -> MutexGuard<'_, ScreenState> {
        self.screen.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, event: ScreenEvent) {
        if let Err(e) = self.screen().apply(event) {
            warn!("Unexpected screen transition: {}", e);
        }
    }

    /// Runs one analysis for the given form input.
    ///
    /// An empty body is rejected before anything changes. Otherwise the screen
    /// moves to analyzing, the service is called exactly once, and the outcome
    /// is either recorded in history and displayed, or turned into the failure
    /// notice. A submission while another one is pending is rejected.
    pub async fn submit(&self, subject: &str, body: &str) -> Result<HistoryEntry, SubmitError> {
        let request = AnalysisRequest::from_input(subject, body).ok_or(SubmitError::EmptyBody)?;
        let pending = PendingAnalysis::begin(self)?;

        let outcome = self
            .analyzer
            .analyze_email(request.subject.as_deref().unwrap_or(""), &request.body)
            .await;

        match outcome {
            Ok(analysis) => {
                let entry = HistoryEntry::new(request.display_subject(), analysis.clone(), Utc::now());
                info!(
                    "Analysis complete: status={}, risk_score={}",
                    analysis.status, analysis.risk_score
                );
                let mut history = self.history.lock().await;
                if let Err(e) = history.record(entry.clone()).await {
                    warn!("Failed to persist history entry {}: {}", entry.id, e);
                }
                pending.settle(ScreenEvent::AnalysisSucceeded(analysis));
                Ok(entry)
            }
            Err(cause) => {
                error!("Analysis failed: {}", cause);
                let notice = FAILURE_NOTICE.to_string();
                pending.settle(ScreenEvent::AnalysisFailed(notice.clone()));
                Err(SubmitError::AnalysisFailed { notice, cause })
            }
        }
    }

    /// Flips between the form and the history panel. Returns the new view.
    pub async fn toggle_history(&self) -> View {
        let mut screen = self.screen();
        if let Err(e) = screen.apply(ScreenEvent::ToggleHistory) {
            warn!("Unexpected screen transition: {}", e);
        }
        screen.view
    }

    /// Removes every history entry, in memory and in storage.
    pub async fn clear_history(&self) -> PortResult<()> {
        let mut history = self.history.lock().await;
        history.clear().await?;
        self.transition(ScreenEvent::HistoryCleared);
        info!("History cleared.");
        Ok(())
    }

    /// Puts a past analysis back on display. Returns `None` for unknown ids.
    pub async fn select_entry(&self, id: &str) -> Option<PhishingAnalysis> {
        let history = self.history.lock().await;
        let analysis = history.select(id).cloned()?;
        self.transition(ScreenEvent::EntrySelected(analysis.clone()));
        Some(analysis)
    }

    pub async fn snapshot(&self) -> Snapshot {
        let history = self.history.lock().await;
        Snapshot {
            screen: self.screen().clone(),
            history: history.entries().to_vec(),
        }
    }

    pub async fn is_analyzing(&self) -> bool {
        self.screen().is_analyzing()
    }
}
