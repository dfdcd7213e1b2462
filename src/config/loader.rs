//! Configuration file loader.

use std::path::PathBuf;

use super::types::WatchConfig;

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        // 1. Current directory: .buildwatch.toml
        search_paths.push(PathBuf::from(".buildwatch.toml"));

        // 2. User config directory: ~/.config/buildwatch/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("buildwatch").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<WatchConfig, ConfigError> {
        for path in &self.search_paths {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Loading config file");
                return Self::load_from_path(path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(WatchConfig::default())
    }

    /// Load configuration from a specific path.
    fn load_from_path(path: &PathBuf) -> Result<WatchConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the search paths for debugging.
    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_loader_default_paths() {
        let loader = ConfigLoader::new();
        assert!(!loader.search_paths().is_empty());
        assert!(loader.search_paths()[0].ends_with(".buildwatch.toml"));
    }

    #[test]
    fn test_config_loader_returns_defaults_when_no_file() {
        let loader = ConfigLoader::with_path(PathBuf::from("/nonexistent/path.toml"));
        let config = loader.load().expect("defaults");
        assert_eq!(config, WatchConfig::default());
    }

    #[test]
    fn test_load_toml_config() {
        let mut file = NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"
            log_file_names = ["log", "log_tests"]
            build_dir = "out"
            debounce_ms = 50
            "#
        )
        .expect("write");
        file.flush().expect("flush");

        let loader = ConfigLoader::with_path(file.path().to_path_buf());
        let config = loader.load().expect("load");

        assert_eq!(config.log_file_names, vec!["log", "log_tests"]);
        assert_eq!(config.build_dir, "out");
        assert_eq!(config.debounce_ms, 50);
    }

    #[test]
    fn test_load_invalid_toml_is_parse_error() {
        let mut file = NamedTempFile::new().expect("tempfile");
        write!(file, "log_file_names = not-a-list").expect("write");
        file.flush().expect("flush");

        let loader = ConfigLoader::with_path(file.path().to_path_buf());
        let result = loader.load();

        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
