//! Notify-backed file watch service.
//!
//! Watches each target's project folder with a debounced notify watcher and
//! bridges the events it cares about from the worker thread into the
//! manager's tokio channel.

use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use notify_debouncer_full::{
    new_debouncer,
    notify::{self, RecursiveMode},
    DebounceEventResult,
};
use tokio::sync::mpsc;

use super::error::WatchError;
use super::service::{FileEventKind, FileWatch, FileWatchEvent, FileWatchService};

/// How often the bridge thread checks for a stop signal.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// `FileWatchService` implementation over `notify-debouncer-full`.
///
/// The project folder is watched recursively so the build directory and the
/// log file can appear after the watch is established.
#[derive(Debug, Clone)]
pub struct NotifyWatchService {
    debounce: Duration,
}

impl NotifyWatchService {
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self { debounce }
    }
}

impl Default for NotifyWatchService {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

impl FileWatchService for NotifyWatchService {
    fn watch(
        &self,
        folder: &Path,
        relative: &Path,
        events: mpsc::UnboundedSender<FileWatchEvent>,
    ) -> Result<Box<dyn FileWatch>, WatchError> {
        let watch_path = folder.join(relative);
        let relative = relative.to_path_buf();

        let (notify_tx, notify_rx) = std_mpsc::channel();
        let mut debouncer = new_debouncer(self.debounce, None, move |result| {
            let _ = notify_tx.send(result);
        })?;
        debouncer.watch(folder, RecursiveMode::Recursive)?;

        let (stop_tx, stop_rx) = std_mpsc::channel();
        let bridge_path = watch_path.clone();

        // Bridge thread: converts debounced notify events to tokio mpsc.
        let bridge_handle = thread::spawn(move || {
            loop {
                match stop_rx.try_recv() {
                    Ok(()) | Err(std_mpsc::TryRecvError::Disconnected) => break,
                    Err(std_mpsc::TryRecvError::Empty) => {}
                }

                match notify_rx.recv_timeout(POLL_INTERVAL) {
                    Ok(result) => {
                        if !forward_events(result, &bridge_path, &relative, &events) {
                            break;
                        }
                    }
                    Err(std_mpsc::RecvTimeoutError::Timeout) => {}
                    Err(std_mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }

            // Keep the debouncer alive until the thread exits.
            drop(debouncer);
        });

        Ok(Box::new(NotifyWatch {
            path: watch_path,
            stop_tx,
            bridge_handle,
        }))
    }
}

/// Forward one debounce result, filtered to the watched file.
///
/// Returns `false` once the receiving side is gone.
fn forward_events(
    result: DebounceEventResult,
    watch_path: &Path,
    relative: &Path,
    events: &mpsc::UnboundedSender<FileWatchEvent>,
) -> bool {
    match result {
        Ok(batch) => {
            for event in &batch {
                let Some(kind) = map_kind(&event.kind) else {
                    continue;
                };
                let affects = event
                    .paths
                    .iter()
                    .any(|p| p == watch_path || p.ends_with(relative));
                if !affects {
                    continue;
                }
                let forwarded = FileWatchEvent {
                    path: watch_path.to_path_buf(),
                    kind,
                };
                if events.send(forwarded).is_err() {
                    return false;
                }
            }
            true
        }
        Err(errors) => {
            for error in errors {
                tracing::warn!(
                    path = %watch_path.display(),
                    error = %error,
                    "File watch error"
                );
            }
            true
        }
    }
}

fn map_kind(kind: &notify::EventKind) -> Option<FileEventKind> {
    use notify::EventKind;

    match kind {
        EventKind::Create(_) => Some(FileEventKind::Created),
        EventKind::Modify(_) => Some(FileEventKind::Changed),
        EventKind::Remove(_) => Some(FileEventKind::Deleted),
        _ => None,
    }
}

struct NotifyWatch {
    path: PathBuf,
    stop_tx: std_mpsc::Sender<()>,
    #[allow(dead_code)]
    bridge_handle: thread::JoinHandle<()>,
}

impl FileWatch for NotifyWatch {
    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for NotifyWatch {
    fn drop(&mut self) {
        // The bridge exits within one poll interval; no need to join.
        let _ = self.stop_tx.send(());
    }
}
