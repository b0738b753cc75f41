//! crates/phishguard_core/src/history.rs
//!
//! The bounded, most-recent-first list of past analyses.
//!
//! Every mutation writes the whole list through to the `HistoryStorage` port
//! before it is applied in memory, so the in-memory list always equals the
//! last successfully persisted one.

use crate::domain::{HistoryEntry, PhishingAnalysis, HISTORY_CAPACITY};
use crate::ports::{HistoryStorage, PortResult};
use std::sync::Arc;
use tracing::{info, warn};

pub struct HistoryStore {
    storage: Arc<dyn HistoryStorage>,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Reads the persisted list. Unreadable or corrupt data is logged and
    /// replaced by an empty history; it never fails startup. A list longer than
    /// the capacity is cut and written back.
    pub async fn load(storage: Arc<dyn HistoryStorage>) -> Self {
        let mut entries = match storage.load().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load analysis history, starting empty: {}", e);
                Vec::new()
            }
        };
        if entries.len() > HISTORY_CAPACITY {
            entries.truncate(HISTORY_CAPACITY);
            if let Err(e) = storage.save(&entries).await {
                warn!("Failed to write back the capped history: {}", e);
            }
        }
        info!("Loaded {} history entries.", entries.len());
        Self { storage, entries }
    }

    /// Prepends `entry`, drops anything beyond the capacity, and persists.
    pub async fn record(&mut self, entry: HistoryEntry) -> PortResult<()> {
        let mut next = Vec::with_capacity(HISTORY_CAPACITY);
        next.push(entry);
        next.extend(self.entries.iter().take(HISTORY_CAPACITY - 1).cloned());

        self.storage.save(&next).await?;
        self.entries = next;
        Ok(())
    }

    /// Empties the history and removes the persisted record.
    pub async fn clear(&mut self) -> PortResult<()> {
        self.storage.clear().await?;
        self.entries.clear();
        Ok(())
    }

    /// Looks up the analysis of one entry without touching the store.
    pub fn select(&self, id: &str) -> Option<&PhishingAnalysis> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.analysis)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
