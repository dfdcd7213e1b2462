//! File watch seam between the manager and the host filesystem.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use super::error::WatchError;

/// Kind of filesystem change reported for a watched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEventKind {
    Created,
    Changed,
    Deleted,
}

/// One change notification for a watched file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileWatchEvent {
    /// Path of the watched file the event is for.
    pub path: PathBuf,
    pub kind: FileEventKind,
}

/// Guard for one active file watch. Dropping it cancels the watch.
pub trait FileWatch: Send {
    /// Absolute path of the file being watched.
    fn path(&self) -> &Path;
}

/// Host-provided filesystem watching.
pub trait FileWatchService: Send + Sync {
    /// Watch `<folder>/<relative>`, delivering change events into `events`.
    ///
    /// Create, change and delete notifications all flow through the same
    /// channel; the watcher treats every kind as a reason to re-read.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying watch cannot be established.
    fn watch(
        &self,
        folder: &Path,
        relative: &Path,
        events: mpsc::UnboundedSender<FileWatchEvent>,
    ) -> Result<Box<dyn FileWatch>, WatchError>;
}
