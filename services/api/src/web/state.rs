//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use phishguard_core::orchestrator::Orchestrator;
use phishguard_core::ports::{AnalysisService, HistoryStorage};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// There is a single screen per server process, so every request sees and
/// drives the same orchestrator.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Loads the history through `storage` and wires up the orchestrator.
    pub async fn new(
        config: Arc<Config>,
        analyzer: Arc<dyn AnalysisService>,
        storage: Arc<dyn HistoryStorage>,
    ) -> Self {
        let orchestrator = Arc::new(Orchestrator::start(analyzer, storage).await);
        Self {
            orchestrator,
            config,
        }
    }
}
