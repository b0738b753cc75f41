pub mod domain;
pub mod history;
pub mod memory;
pub mod orchestrator;
pub mod ports;
pub mod presentation;
pub mod state;

pub use domain::{
    AnalysisRequest, DetectionStatus, HistoryEntry, PhishingAnalysis, FALLBACK_SUBJECT_CHARS,
    HISTORY_CAPACITY,
};
pub use history::HistoryStore;
pub use memory::InMemoryHistoryStorage;
pub use orchestrator::{Orchestrator, Snapshot, SubmitError, FAILURE_NOTICE};
pub use ports::{AnalysisService, HistoryStorage, PortError, PortResult};
pub use presentation::{AnalysisView, Gauge, HistoryRow, RiskBand, StatusStyle};
pub use state::{Phase, ScreenEvent, ScreenState, TransitionError, View};
