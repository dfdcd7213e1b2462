//! Configuration types.

use serde::{Deserialize, Serialize};

/// Watch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Log file names looked for under the build directory.
    pub log_file_names: Vec<String>,
    /// Directory under each project folder holding the logs.
    pub build_dir: String,
    /// Debounce window for filesystem events, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            log_file_names: vec!["log".to_string(), "log_extensions".to_string()],
            build_dir: ".build".to_string(),
            debounce_ms: 100,
        }
    }
}
