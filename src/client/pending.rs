// Single-slot local store for a diagnosis that could not be submitted
//
// One slot, last write wins. Written atomically so a crash never leaves a
// half-written draft behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::ClientConfig;
use crate::diagnosis::DiagnosisState;
use crate::utils::{atomic_write, pending_diagnosis_path};

#[derive(Debug, Error)]
pub enum PendingStoreError {
    #[error("Pending diagnosis I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize pending diagnosis: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No location for the pending diagnosis (home directory not found)")]
    NoLocation,
}

#[derive(Debug, Clone)]
pub struct PendingStore {
    path: PathBuf,
}

impl PendingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Configured slot, or `~/.diagnosis/pending_diagnosis.json`
    pub fn from_config(config: &ClientConfig) -> Result<Self, PendingStoreError> {
        config
            .pending_path
            .clone()
            .or_else(pending_diagnosis_path)
            .map(Self::new)
            .ok_or(PendingStoreError::NoLocation)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the slot with `state`
    pub fn save(&self, state: &DiagnosisState) -> Result<(), PendingStoreError> {
        let json = serde_json::to_vec_pretty(state)?;
        atomic_write(&self.path, &json)?;
        log::info!("[client] Saved pending diagnosis to {:?}", self.path);
        Ok(())
    }

    /// Read the slot. A corrupt slot is discarded and reads as empty.
    pub fn load(&self) -> Result<Option<DiagnosisState>, PendingStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                log::warn!(
                    "[client] Discarding unreadable pending diagnosis {:?}: {}",
                    self.path,
                    e
                );
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.path.exists()
    }

    pub fn clear(&self) -> Result<(), PendingStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::DiagnosisField;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> PendingStore {
        PendingStore::new(dir.path().join("pending_diagnosis.json"))
    }

    #[test]
    fn test_empty_slot_loads_none() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load().unwrap().is_none());
        assert!(!store(&dir).has_pending());
    }

    #[test]
    fn test_last_write_wins() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let first = DiagnosisState::new().with(DiagnosisField::Name, "Ana");
        let second = DiagnosisState::new().with(DiagnosisField::Name, "Luis");

        store.save(&first).unwrap();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), Some(second));
    }

    #[test]
    fn test_corrupt_slot_is_discarded() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.load().unwrap().is_none());
        assert!(!store.has_pending());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(&DiagnosisState::new()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.has_pending());
    }

    #[test]
    fn test_from_config_prefers_configured_path() {
        let config = ClientConfig {
            pending_path: Some(PathBuf::from("/tmp/slot.json")),
            ..Default::default()
        };
        let store = PendingStore::from_config(&config).unwrap();
        assert_eq!(store.path(), Path::new("/tmp/slot.json"));
    }
}
