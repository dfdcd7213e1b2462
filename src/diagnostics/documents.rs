//! Open document tracking seam.

use std::path::PathBuf;

/// Editor-side enumeration of currently open local documents.
///
/// Open/close notifications are fed to the watcher through its handle; this
/// trait only answers the "what is open right now" question asked when a
/// collector is constructed.
pub trait OpenDocumentTracker: Send + Sync {
    /// Paths of all currently open local-file documents.
    fn open_documents(&self) -> Vec<PathBuf>;
}

/// Tracker for hosts without an editor: nothing is ever open.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpenDocuments;

impl OpenDocumentTracker for NoOpenDocuments {
    fn open_documents(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}
