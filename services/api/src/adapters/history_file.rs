//! services/api/src/adapters/history_file.rs
//!
//! This module contains the history storage adapter, which is the concrete
//! implementation of the `HistoryStorage` port from the `core` crate. The whole
//! list lives in one JSON file that is replaced on every write.

use crate::adapters::records::HistoryEntryRecord;
use async_trait::async_trait;
use phishguard_core::domain::HistoryEntry;
use phishguard_core::ports::{HistoryStorage, PortError, PortResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A history adapter that implements the `HistoryStorage` port on top of a JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileHistoryStorage {
    path: PathBuf,
}

impl JsonFileHistoryStorage {
    /// Creates a new `JsonFileHistoryStorage` writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

fn storage_error(action: &str, path: &Path, e: impl std::fmt::Display) -> PortError {
    PortError::Storage(format!("failed to {} {}: {}", action, path.display(), e))
}

//=========================================================================================
// `HistoryStorage` Trait Implementation
//=========================================================================================

#[async_trait]
impl HistoryStorage for JsonFileHistoryStorage {
    async fn load(&self) -> PortResult<Vec<HistoryEntry>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No history file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(storage_error("read", &self.path, e)),
        };

        let records: Vec<HistoryEntryRecord> = serde_json::from_str(&contents)
            .map_err(|e| storage_error("parse", &self.path, e))?;

        records
            .into_iter()
            .map(HistoryEntryRecord::to_domain)
            .collect::<PortResult<Vec<_>>>()
            .map_err(|e| storage_error("validate", &self.path, e))
    }

    async fn save(&self, entries: &[HistoryEntry]) -> PortResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| storage_error("create directory for", &self.path, e))?;
            }
        }

        let records: Vec<HistoryEntryRecord> =
            entries.iter().map(HistoryEntryRecord::from_domain).collect();
        let json = serde_json::to_vec(&records)
            .map_err(|e| storage_error("serialize", &self.path, e))?;

        // Write beside the target and rename so readers never see a partial file.
        let temp = self.temp_path();
        tokio::fs::write(&temp, json)
            .await
            .map_err(|e| storage_error("write", &temp, e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| storage_error("replace", &self.path, e))?;
        Ok(())
    }

    async fn clear(&self) -> PortResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", &self.path, e)),
        }
    }
}
