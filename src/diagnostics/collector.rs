//! Per-target diagnostics collector.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::problems;

use super::display::DiagnosticsChannel;
use super::types::Diagnostic;

/// Owns the diagnostics published for one watched build log.
///
/// Created on the first successful parse of the log; disposed when the log
/// disappears, fails to parse, or the owning watch is torn down.
pub struct DiagnosticsCollector {
    channel: Box<dyn DiagnosticsChannel>,
    open_documents: HashSet<PathBuf>,
    diagnostics_by_path: BTreeMap<PathBuf, Vec<Diagnostic>>,
}

impl DiagnosticsCollector {
    /// Create a collector over a display channel.
    ///
    /// `initially_open` documents are marked open without publishing:
    /// nothing has been computed for them yet.
    #[must_use]
    pub fn new(
        channel: Box<dyn DiagnosticsChannel>,
        initially_open: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        Self {
            channel,
            open_documents: initially_open.into_iter().collect(),
            diagnostics_by_path: BTreeMap::new(),
        }
    }

    /// Replace the published diagnostics with the problems in `content`.
    ///
    /// Non-array content counts as zero problems. Paths currently open in
    /// the editor are computed but left unpublished, so the live document's
    /// own diagnostics are not overwritten with stale static data.
    pub fn update(&mut self, content: &Value) {
        let mut by_path: BTreeMap<PathBuf, Vec<Diagnostic>> = BTreeMap::new();
        for record in problems::records_from(content) {
            by_path
                .entry(PathBuf::from(&record.path))
                .or_default()
                .push(Diagnostic::from_record(&record));
        }
        self.diagnostics_by_path = by_path;

        self.channel.clear();
        for (path, diagnostics) in &self.diagnostics_by_path {
            if !self.open_documents.contains(path) {
                self.channel.set(path, diagnostics.clone());
            }
        }
    }

    /// Note that `path` was opened in the editor.
    ///
    /// Any stale entry for it is cleared immediately; the path stays
    /// unpublished until it is closed again.
    pub fn document_opened(&mut self, path: &Path) {
        self.channel.set(path, Vec::new());
        self.open_documents.insert(path.to_path_buf());
    }

    /// Note that `path` was closed in the editor.
    ///
    /// Republishes whatever the last update computed for it, possibly
    /// nothing.
    pub fn document_closed(&mut self, path: &Path) {
        self.open_documents.remove(path);
        let diagnostics = self
            .diagnostics_by_path
            .get(path)
            .cloned()
            .unwrap_or_default();
        self.channel.set(path, diagnostics);
    }

    /// Clear everything this collector published and release its channel.
    pub fn dispose(mut self) {
        self.channel.clear();
    }
}
