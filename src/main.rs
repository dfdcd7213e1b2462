//! Buildwatch - build-tool problems from watched logs as editor diagnostics.
//!
//! Standalone host around the library: resolves project folders from the
//! command line, wires the production services together and runs the watch
//! loop until interrupted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use buildwatch::config::{ConfigLoader, WatchConfig};
use buildwatch::diagnostics::{ConsoleDisplay, NoOpenDocuments};
use buildwatch::watcher::{BuildLogWatcher, NotifyWatchService, ProjectFolder, TokioFileReader};

#[derive(Parser)]
#[command(
    name = "buildwatch",
    about = "Surface build-tool problems from watched log files as editor diagnostics",
    version
)]
struct Cli {
    /// Project folders to watch.
    #[arg(required = true)]
    folders: Vec<PathBuf>,

    /// Path to a configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn load_config(config_path: Option<PathBuf>) -> WatchConfig {
    let loader = config_path.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    match loader.load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    }
}

/// Resolve CLI paths to `file`-scheme project folders, skipping the ones
/// that cannot be resolved.
fn resolve_folders(paths: &[PathBuf]) -> Vec<ProjectFolder> {
    let mut folders = Vec::new();
    for path in paths {
        match std::fs::canonicalize(path) {
            Ok(absolute) => match ProjectFolder::from_local_path(&absolute) {
                Some(folder) => folders.push(folder),
                None => {
                    tracing::warn!(path = %absolute.display(), "Skipping folder without a local path");
                }
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable folder");
            }
        }
    }
    folders
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config);
    let folders = resolve_folders(&cli.folders);
    if folders.is_empty() {
        tracing::error!("No watchable project folders");
        std::process::exit(1);
    }

    let debounce = Duration::from_millis(config.debounce_ms);
    let (mut watcher, handle) = BuildLogWatcher::new(
        config,
        Arc::new(NotifyWatchService::new(debounce)),
        Arc::new(TokioFileReader),
        Arc::new(ConsoleDisplay::new()),
        Arc::new(NoOpenDocuments),
    );

    watcher.refresh(&folders);
    tracing::info!(
        folders = folders.len(),
        targets = watcher.target_count(),
        "Watching for build logs"
    );

    {
        let handle = handle.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, shutting down");
                handle.shutdown();
            }
        });
    }

    watcher.run().await;
}
