//! Watch target identification.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

/// A project folder identified by URI.
///
/// Only `file`-scheme folders are watched; anything else (remote and virtual
/// workspaces) is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFolder {
    uri: Url,
}

impl ProjectFolder {
    /// Create a folder from a URI.
    #[must_use]
    pub fn new(uri: Url) -> Self {
        Self { uri }
    }

    /// Create a `file`-scheme folder from an absolute local path.
    ///
    /// Returns `None` for paths that cannot form a file URI (e.g. relative
    /// paths).
    #[must_use]
    pub fn from_local_path(path: &Path) -> Option<Self> {
        Url::from_file_path(path).ok().map(|uri| Self { uri })
    }

    /// The folder URI.
    #[must_use]
    pub fn uri(&self) -> &Url {
        &self.uri
    }

    /// Local filesystem path, when the folder has the `file` scheme.
    #[must_use]
    pub fn local_path(&self) -> Option<PathBuf> {
        if self.uri.scheme() == "file" {
            self.uri.to_file_path().ok()
        } else {
            None
        }
    }
}

/// Identifier for one live watch target.
///
/// Fresh for every target created by a refresh; never reused within a
/// manager's lifetime, so a stale read completion can never be attributed to
/// a newer target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

/// One (project folder, log file name) pair under observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    folder: PathBuf,
    relative: PathBuf,
    log_path: PathBuf,
}

impl WatchTarget {
    /// Build a target for `folder` watching `<build_dir>/<log_file_name>`.
    #[must_use]
    pub fn new(folder: PathBuf, build_dir: &str, log_file_name: &str) -> Self {
        let relative = Path::new(build_dir).join(log_file_name);
        let log_path = folder.join(&relative);
        Self {
            folder,
            relative,
            log_path,
        }
    }

    /// The project folder being watched.
    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Path of the watched file relative to the folder.
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Absolute path of the watched log file.
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
