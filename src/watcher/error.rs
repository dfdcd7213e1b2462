//! Watcher error types.

/// Errors that can occur while establishing a file watch.
#[derive(thiserror::Error, Debug)]
pub enum WatchError {
    /// Notify backend error.
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of one read-and-parse pass over a build log.
///
/// Both variants collapse the target to the no-collector state; neither is
/// fatal.
#[derive(thiserror::Error, Debug)]
pub enum LogReadError {
    /// The log could not be read (missing, unreadable).
    #[error("Failed to read build log: {0}")]
    Read(#[from] std::io::Error),

    /// The log is not one well-formed JSON document.
    #[error("Failed to parse build log: {0}")]
    Parse(#[from] serde_json::Error),
}
