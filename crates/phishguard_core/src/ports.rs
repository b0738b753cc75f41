//! crates/phishguard_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the language-model provider and of the storage backend.

use crate::domain::{HistoryEntry, PhishingAnalysis};
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, filesystem).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("The analysis service returned a malformed response: {0}")]
    InvalidResponse(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Asks the external service for a verdict on one email.
    ///
    /// `subject` may be empty. Implementations must only return analyses that
    /// passed shape validation; anything else is an error.
    async fn analyze_email(&self, subject: &str, body: &str) -> PortResult<PhishingAnalysis>;
}

/// The durable slot holding the serialized history list.
#[async_trait]
pub trait HistoryStorage: Send + Sync {
    /// Reads the stored list. A slot that was never written yields an empty list.
    async fn load(&self) -> PortResult<Vec<HistoryEntry>>;

    /// Overwrites the slot with `entries`.
    async fn save(&self, entries: &[HistoryEntry]) -> PortResult<()>;

    /// Removes the slot entirely.
    async fn clear(&self) -> PortResult<()>;
}
