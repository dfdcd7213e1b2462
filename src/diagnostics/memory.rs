//! In-memory diagnostics display.
//!
//! Stores published diagnostics in a shared map, for embedders that render
//! diagnostics themselves and for the test suite.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::display::{DiagnosticsChannel, DiagnosticsDisplay};
use super::types::Diagnostic;

type Store = Arc<Mutex<HashMap<String, BTreeMap<PathBuf, Vec<Diagnostic>>>>>;

/// A `DiagnosticsDisplay` backed by a shared in-memory map.
///
/// Clones share the same store, so a clone kept by the host observes
/// everything the watcher publishes.
#[derive(Debug, Clone, Default)]
pub struct MemoryDisplay {
    store: Store,
}

impl MemoryDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics currently published for `path` under `key`.
    #[must_use]
    pub fn diagnostics_for(&self, key: &str, path: &Path) -> Vec<Diagnostic> {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store
            .get(key)
            .and_then(|by_path| by_path.get(path))
            .cloned()
            .unwrap_or_default()
    }

    /// Paths that currently have at least one diagnostic under `key`.
    #[must_use]
    pub fn paths_with_diagnostics(&self, key: &str) -> Vec<PathBuf> {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store
            .get(key)
            .map(|by_path| {
                by_path
                    .iter()
                    .filter(|(_, diagnostics)| !diagnostics.is_empty())
                    .map(|(path, _)| path.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether no diagnostics are published anywhere.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store
            .values()
            .all(|by_path| by_path.values().all(Vec::is_empty))
    }
}

impl DiagnosticsDisplay for MemoryDisplay {
    fn create_channel(&self, key: &str) -> Box<dyn DiagnosticsChannel> {
        Box::new(MemoryChannel {
            key: key.to_string(),
            store: Arc::clone(&self.store),
        })
    }
}

struct MemoryChannel {
    key: String,
    store: Store,
}

impl DiagnosticsChannel for MemoryChannel {
    fn set(&mut self, path: &Path, diagnostics: Vec<Diagnostic>) {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store
            .entry(self.key.clone())
            .or_default()
            .insert(path.to_path_buf(), diagnostics);
    }

    fn clear(&mut self) {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(by_path) = store.get_mut(&self.key) {
            by_path.clear();
        }
    }
}

impl Drop for MemoryChannel {
    fn drop(&mut self) {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.remove(&self.key);
    }
}
