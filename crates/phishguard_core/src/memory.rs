//! crates/phishguard_core/src/memory.rs
//!
//! An in-memory `HistoryStorage` used in tests and for running without a disk.

use crate::domain::HistoryEntry;
use crate::ports::{HistoryStorage, PortResult};
use async_trait::async_trait;
use futures::lock::Mutex;

/// Keeps the history slot in process memory. `None` means the slot does not exist.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStorage {
    slot: Mutex<Option<Vec<HistoryEntry>>>,
}

impl InMemoryHistoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an already written slot.
    pub fn with_entries(entries: Vec<HistoryEntry>) -> Self {
        Self {
            slot: Mutex::new(Some(entries)),
        }
    }

    /// Whether the slot currently exists.
    pub async fn is_present(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}

#[async_trait]
impl HistoryStorage for InMemoryHistoryStorage {
    async fn load(&self) -> PortResult<Vec<HistoryEntry>> {
        Ok(self.slot.lock().await.clone().unwrap_or_default())
    }

    async fn save(&self, entries: &[HistoryEntry]) -> PortResult<()> {
        *self.slot.lock().await = Some(entries.to_vec());
        Ok(())
    }

    async fn clear(&self) -> PortResult<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
