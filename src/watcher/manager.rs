//! Build log watch management.
//!
//! Owns the active watch targets, routes filesystem and document events,
//! runs the read pipeline and the per-target diagnostics collectors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::WatchConfig;
use crate::diagnostics::{DiagnosticsCollector, DiagnosticsDisplay, OpenDocumentTracker};

use super::error::LogReadError;
use super::read::{load_build_log, FileReadService};
use super::service::{FileWatch, FileWatchEvent, FileWatchService};
use super::target::{ProjectFolder, TargetId, WatchTarget};

/// Messages handled by the manager's event loop.
enum ManagerEvent {
    FoldersChanged(Vec<ProjectFolder>),
    DocumentOpened(PathBuf),
    DocumentClosed(PathBuf),
    ReadComplete {
        target: TargetId,
        seq: u64,
        result: Result<Value, LogReadError>,
    },
    Shutdown,
}

/// Handle for feeding host notifications into a running watcher.
#[derive(Debug, Clone)]
pub struct WatcherHandle {
    tx: mpsc::UnboundedSender<ManagerEvent>,
}

impl WatcherHandle {
    /// Report that the set of project folders changed.
    pub fn folders_changed(&self, folders: Vec<ProjectFolder>) {
        let _ = self.tx.send(ManagerEvent::FoldersChanged(folders));
    }

    /// Report that a local document was opened in the editor.
    pub fn document_opened(&self, path: PathBuf) {
        let _ = self.tx.send(ManagerEvent::DocumentOpened(path));
    }

    /// Report that a local document was closed in the editor.
    pub fn document_closed(&self, path: PathBuf) {
        let _ = self.tx.send(ManagerEvent::DocumentClosed(path));
    }

    /// Ask the event loop to stop, tearing down every watch target.
    pub fn shutdown(&self) {
        let _ = self.tx.send(ManagerEvent::Shutdown);
    }
}

struct TargetState {
    target: WatchTarget,
    /// Dropping the guard cancels the file watch.
    _watch: Box<dyn FileWatch>,
    collector: Option<DiagnosticsCollector>,
    /// Sequence number of the newest triggered read for this target.
    read_seq: u64,
}

/// Watches every configured build log across the active project folders and
/// publishes their problems as per-file diagnostics.
///
/// All state lives on this instance; multiple isolated watchers can coexist
/// in one process.
pub struct BuildLogWatcher {
    config: WatchConfig,
    watch_service: Arc<dyn FileWatchService>,
    read_service: Arc<dyn FileReadService>,
    display: Arc<dyn DiagnosticsDisplay>,
    documents: Arc<dyn OpenDocumentTracker>,
    targets: HashMap<TargetId, TargetState>,
    next_target: u64,
    events: mpsc::UnboundedReceiver<ManagerEvent>,
    events_tx: mpsc::UnboundedSender<ManagerEvent>,
    file_events: mpsc::UnboundedReceiver<FileWatchEvent>,
    file_events_tx: mpsc::UnboundedSender<FileWatchEvent>,
}

impl BuildLogWatcher {
    /// Create a watcher over the given host services.
    ///
    /// No targets exist until the first [`refresh`](Self::refresh).
    #[must_use]
    pub fn new(
        config: WatchConfig,
        watch_service: Arc<dyn FileWatchService>,
        read_service: Arc<dyn FileReadService>,
        display: Arc<dyn DiagnosticsDisplay>,
        documents: Arc<dyn OpenDocumentTracker>,
    ) -> (Self, WatcherHandle) {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (file_events_tx, file_events) = mpsc::unbounded_channel();
        let handle = WatcherHandle {
            tx: events_tx.clone(),
        };
        let watcher = Self {
            config,
            watch_service,
            read_service,
            display,
            documents,
            targets: HashMap::new(),
            next_target: 0,
            events,
            events_tx,
            file_events,
            file_events_tx,
        };
        (watcher, handle)
    }

    /// Rebuild the watch set for `folders`.
    ///
    /// Every existing target is disposed first, clearing its published
    /// diagnostics; then one target is created per local-scheme folder and
    /// configured log file name, each with an initial read.
    pub fn refresh(&mut self, folders: &[ProjectFolder]) {
        self.dispose_all();

        let names = self.config.log_file_names.clone();
        for folder in folders {
            match folder.local_path() {
                Some(path) => {
                    for name in &names {
                        self.add_target(path.clone(), name);
                    }
                }
                None => {
                    tracing::debug!(uri = %folder.uri(), "Skipping non-local project folder");
                }
            }
        }
    }

    /// Number of live watch targets.
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Process events until shutdown is requested, then tear down.
    pub async fn run(&mut self) {
        while self.tick().await {}
        self.dispose_all();
    }

    /// Process one pending event.
    ///
    /// Returns `false` once shutdown was requested or every event source is
    /// gone. Embedding hosts may drive this directly instead of [`run`](Self::run).
    pub async fn tick(&mut self) -> bool {
        tokio::select! {
            event = self.events.recv() => match event {
                Some(event) => self.handle_event(event),
                None => false,
            },
            event = self.file_events.recv() => match event {
                Some(event) => {
                    self.handle_file_event(&event);
                    true
                }
                None => false,
            },
        }
    }

    fn handle_event(&mut self, event: ManagerEvent) -> bool {
        match event {
            ManagerEvent::FoldersChanged(folders) => {
                self.refresh(&folders);
                true
            }
            ManagerEvent::DocumentOpened(path) => {
                self.handle_document_opened(&path);
                true
            }
            ManagerEvent::DocumentClosed(path) => {
                self.handle_document_closed(&path);
                true
            }
            ManagerEvent::ReadComplete {
                target,
                seq,
                result,
            } => {
                self.handle_read_complete(target, seq, result);
                true
            }
            ManagerEvent::Shutdown => false,
        }
    }

    fn dispose_all(&mut self) {
        for (_, state) in self.targets.drain() {
            if let Some(collector) = state.collector {
                collector.dispose();
            }
            // Dropping `state._watch` cancels the file watch.
        }
    }

    fn add_target(&mut self, folder: PathBuf, log_file_name: &str) {
        let target = WatchTarget::new(folder, &self.config.build_dir, log_file_name);
        let watch = match self.watch_service.watch(
            target.folder(),
            target.relative(),
            self.file_events_tx.clone(),
        ) {
            Ok(watch) => watch,
            Err(e) => {
                tracing::warn!(
                    path = %target.log_path().display(),
                    error = %e,
                    "Failed to create build log watch"
                );
                return;
            }
        };

        let id = TargetId::new(self.next_target);
        self.next_target += 1;
        tracing::debug!(target = %id, path = %target.log_path().display(), "Watching build log");
        self.targets.insert(
            id,
            TargetState {
                target,
                _watch: watch,
                collector: None,
                read_seq: 0,
            },
        );
        self.trigger_read(id);
    }

    /// All event kinds re-read the log: a created or changed log parses
    /// fresh content, a deleted one reads as missing and tears down.
    fn handle_file_event(&mut self, event: &FileWatchEvent) {
        let ids: Vec<TargetId> = self
            .targets
            .iter()
            .filter(|(_, state)| state.target.log_path() == event.path)
            .map(|(id, _)| *id)
            .collect();

        if ids.is_empty() {
            tracing::debug!(path = %event.path.display(), "Watch event for unknown target discarded");
            return;
        }
        for id in ids {
            self.trigger_read(id);
        }
    }

    fn trigger_read(&mut self, id: TargetId) {
        let Some(state) = self.targets.get_mut(&id) else {
            return;
        };
        state.read_seq += 1;
        let seq = state.read_seq;
        let path = state.target.log_path().to_path_buf();
        let reader = Arc::clone(&self.read_service);
        let tx = self.events_tx.clone();

        tokio::spawn(async move {
            let result = load_build_log(reader.as_ref(), &path).await;
            let _ = tx.send(ManagerEvent::ReadComplete {
                target: id,
                seq,
                result,
            });
        });
    }

    /// Apply one read result, discarding completions that are stale or
    /// belong to a torn-down target.
    fn handle_read_complete(
        &mut self,
        id: TargetId,
        seq: u64,
        result: Result<Value, LogReadError>,
    ) {
        let Some(state) = self.targets.get_mut(&id) else {
            tracing::debug!(target = %id, "Read completion for disposed target discarded");
            return;
        };
        if seq != state.read_seq {
            tracing::debug!(
                target = %id,
                seq,
                newest = state.read_seq,
                "Stale read completion discarded"
            );
            return;
        }

        match result {
            Ok(content) => {
                if state.collector.is_none() {
                    let key = state.target.log_path().to_string_lossy().into_owned();
                    let channel = self.display.create_channel(&key);
                    state.collector = Some(DiagnosticsCollector::new(
                        channel,
                        self.documents.open_documents(),
                    ));
                }
                if let Some(collector) = state.collector.as_mut() {
                    collector.update(&content);
                }
            }
            Err(e) => {
                tracing::debug!(target = %id, error = %e, "Build log unavailable");
                if let Some(collector) = state.collector.take() {
                    collector.dispose();
                }
            }
        }
    }

    fn handle_document_opened(&mut self, path: &Path) {
        for state in self.targets.values_mut() {
            if let Some(collector) = state.collector.as_mut() {
                collector.document_opened(path);
            }
        }
    }

    fn handle_document_closed(&mut self, path: &Path) {
        for state in self.targets.values_mut() {
            if let Some(collector) = state.collector.as_mut() {
                collector.document_closed(path);
            }
        }
    }
}
