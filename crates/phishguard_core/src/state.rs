//! crates/phishguard_core/src/state.rs
//!
//! The explicit state of the single screen and its reducer-style transitions.

use crate::domain::PhishingAnalysis;

/// The analysis lifecycle shown on the screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing submitted yet, or the result was cleared.
    #[default]
    Idle,
    /// One analysis call is outstanding.
    Analyzing,
    /// A result is on display, either fresh or picked from history.
    Result(PhishingAnalysis),
    /// The last submission failed; carries the user-visible notice.
    Failed(String),
}

/// Which panel is visible next to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    NewAnalysis,
    History,
}

/// An event the screen reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Submit,
    AnalysisSucceeded(PhishingAnalysis),
    AnalysisFailed(String),
    /// The pending call was cancelled before it produced an outcome.
    AnalysisAbandoned,
    ToggleHistory,
    HistoryCleared,
    EntrySelected(PhishingAnalysis),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("an analysis is already in progress")]
    AnalysisInFlight,
    #[error("no analysis is in progress")]
    NotAnalyzing,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenState {
    pub phase: Phase,
    pub view: View,
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_analyzing(&self) -> bool {
        self.phase == Phase::Analyzing
    }

    /// The analysis currently on display, if any.
    pub fn current_result(&self) -> Option<&PhishingAnalysis> {
        match &self.phase {
            Phase::Result(analysis) => Some(analysis),
            _ => None,
        }
    }

    /// The failure notice currently on display, if any.
    pub fn notice(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(notice) => Some(notice),
            _ => None,
        }
    }

    /// Applies one event. On error the state is left unchanged.
    pub fn apply(&mut self, event: ScreenEvent) -> Result<(), TransitionError> {
        match event {
            ScreenEvent::Submit => {
                if self.is_analyzing() {
                    return Err(TransitionError::AnalysisInFlight);
                }
                self.phase = Phase::Analyzing;
            }
            ScreenEvent::AnalysisSucceeded(analysis) => {
                if !self.is_analyzing() {
                    return Err(TransitionError::NotAnalyzing);
                }
                self.phase = Phase::Result(analysis);
            }
            ScreenEvent::AnalysisFailed(notice) => {
                if !self.is_analyzing() {
                    return Err(TransitionError::NotAnalyzing);
                }
                self.phase = Phase::Failed(notice);
            }
            ScreenEvent::AnalysisAbandoned => {
                if !self.is_analyzing() {
                    return Err(TransitionError::NotAnalyzing);
                }
                self.phase = Phase::Idle;
            }
            ScreenEvent::ToggleHistory => {
                self.view = match self.view {
                    View::NewAnalysis => View::History,
                    View::History => View::NewAnalysis,
                };
            }
            // The displayed result is independent of the history list.
            ScreenEvent::HistoryCleared => {}
            ScreenEvent::EntrySelected(analysis) => {
                // A pending call keeps ownership of the result panel.
                if !self.is_analyzing() {
                    self.phase = Phase::Result(analysis);
                }
                self.view = View::NewAnalysis;
            }
        }
        Ok(())
    }
}
