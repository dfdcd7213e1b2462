//! Build log watching.
//!
//! Watches the configured build logs across the active project folders and
//! turns their problem records into published diagnostics.

mod error;
mod manager;
mod notify_service;
mod read;
mod service;
mod target;

pub use error::{LogReadError, WatchError};
pub use manager::{BuildLogWatcher, WatcherHandle};
pub use notify_service::NotifyWatchService;
pub use read::{load_build_log, FileReadService, TokioFileReader};
pub use service::{FileEventKind, FileWatch, FileWatchEvent, FileWatchService};
pub use target::{ProjectFolder, TargetId, WatchTarget};
