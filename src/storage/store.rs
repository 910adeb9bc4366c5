use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::AppState;

/// Persists the whole application state as one JSON blob on disk.
/// Loading merges the blob over an all-empty default, so blobs missing any
/// of the top-level collections stay loadable.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<AppState> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "state file missing, starting empty");
            return Ok(AppState::default());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file {}", self.path.display()))?;
        let state = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse state file {}", self.path.display()))?;
        Ok(state)
    }

    /// Serialize the full snapshot. Written to a sibling temp file first
    /// and renamed, so an interrupted write never leaves a partial blob.
    pub fn save(&self, state: &AppState) -> Result<()> {
        let json = serde_json::to_string_pretty(state).context("Failed to serialize state")?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("Failed to write state file {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace state file {}", self.path.display()))?;

        debug!(path = %self.path.display(), "state saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Customer;

    #[test]
    fn test_load_missing_file_yields_empty_state() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = Store::new(dir.path().join("missing.json"));
        let state = store.load().unwrap();
        assert!(state.customers.is_empty());
        assert!(state.services.is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = Store::new(dir.path().join("state.json"));

        let mut state = AppState::default();
        state.customers.push(Customer::new("Ana".into()));
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.customers.len(), 1);
        assert_eq!(loaded.customers[0].name, "Ana");
    }

    #[test]
    fn test_load_blob_with_missing_keys() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"materials":[]}"#).unwrap();

        let state = Store::new(&path).load().unwrap();
        assert!(state.customers.is_empty());
        assert!(state.service_types.is_empty());
    }
}
