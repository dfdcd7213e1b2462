//! End-to-end tests for the build log watcher over a real filesystem.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use buildwatch::config::WatchConfig;
use buildwatch::diagnostics::{MemoryDisplay, NoOpenDocuments, Position};
use buildwatch::watcher::{BuildLogWatcher, NotifyWatchService, ProjectFolder, TokioFileReader};
use tempfile::TempDir;

const PROBLEMS: &str = r#"[{"path":"/p/a.ts","line":5,"column":3,"message":"type error"}]"#;

fn single_log_config() -> WatchConfig {
    WatchConfig {
        log_file_names: vec!["log".to_string()],
        ..WatchConfig::default()
    }
}

fn new_watcher(
    folder: &ProjectFolder,
) -> Option<(BuildLogWatcher, buildwatch::watcher::WatcherHandle, MemoryDisplay)> {
    let display = MemoryDisplay::new();
    let (mut watcher, handle) = BuildLogWatcher::new(
        single_log_config(),
        Arc::new(NotifyWatchService::new(Duration::from_millis(20))),
        Arc::new(TokioFileReader),
        Arc::new(display.clone()),
        Arc::new(NoOpenDocuments),
    );
    watcher.refresh(std::slice::from_ref(folder));
    if watcher.target_count() == 0 {
        // Watch creation failed (e.g. system watcher limit); nothing to test.
        eprintln!("Skipping test: file watch could not be established");
        return None;
    }
    Some((watcher, handle, display))
}

async fn eventually<F: Fn() -> bool>(condition: F) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    condition()
}

#[tokio::test]
async fn test_full_lifecycle_over_real_filesystem() {
    let temp = TempDir::new().unwrap();
    let build_dir = temp.path().join(".build");
    std::fs::create_dir_all(&build_dir).unwrap();
    let log_path = build_dir.join("log");
    std::fs::write(&log_path, PROBLEMS).unwrap();

    let folder = ProjectFolder::from_local_path(temp.path()).unwrap();
    let Some((mut watcher, handle, display)) = new_watcher(&folder) else {
        return;
    };
    let key = log_path.to_string_lossy().into_owned();
    let task = tokio::spawn(async move { watcher.run().await });

    // The initial read publishes the problems.
    assert!(
        eventually(|| display.diagnostics_for(&key, Path::new("/p/a.ts")).len() == 1).await,
        "initial log content was never published"
    );
    let published = display.diagnostics_for(&key, Path::new("/p/a.ts"));
    assert_eq!(published[0].range.start, Position { line: 4, column: 2 });
    assert_eq!(published[0].message, "type error");

    // Replacing the log fully supersedes the previous content.
    std::fs::write(
        &log_path,
        r#"[{"path":"/p/b.ts","line":2,"column":1,"message":"unused"}]"#,
    )
    .unwrap();
    assert!(
        eventually(|| {
            display.diagnostics_for(&key, Path::new("/p/a.ts")).is_empty()
                && display.diagnostics_for(&key, Path::new("/p/b.ts")).len() == 1
        })
        .await,
        "replaced log content was never published"
    );

    // Deleting the log clears everything it had published.
    std::fs::remove_file(&log_path).unwrap();
    assert!(
        eventually(|| display.is_empty()).await,
        "diagnostics survived log deletion"
    );

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test]
async fn test_log_created_after_watch_is_published() {
    let temp = TempDir::new().unwrap();

    let folder = ProjectFolder::from_local_path(temp.path()).unwrap();
    let Some((mut watcher, handle, display)) = new_watcher(&folder) else {
        return;
    };
    let log_path = temp.path().join(".build").join("log");
    let key = log_path.to_string_lossy().into_owned();
    let task = tokio::spawn(async move { watcher.run().await });

    // Give the watch time to initialize, then create the log from nothing.
    tokio::time::sleep(Duration::from_millis(100)).await;
    std::fs::create_dir_all(temp.path().join(".build")).unwrap();
    std::fs::write(&log_path, PROBLEMS).unwrap();

    assert!(
        eventually(|| display.diagnostics_for(&key, Path::new("/p/a.ts")).len() == 1).await,
        "late-created log was never published"
    );

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test]
async fn test_folder_set_change_clears_previous_diagnostics() {
    let temp = TempDir::new().unwrap();
    let build_dir = temp.path().join(".build");
    std::fs::create_dir_all(&build_dir).unwrap();
    let log_path = build_dir.join("log");
    std::fs::write(&log_path, PROBLEMS).unwrap();

    let folder = ProjectFolder::from_local_path(temp.path()).unwrap();
    let Some((mut watcher, handle, display)) = new_watcher(&folder) else {
        return;
    };
    let key = log_path.to_string_lossy().into_owned();
    let task = tokio::spawn(async move { watcher.run().await });

    assert!(
        eventually(|| display.diagnostics_for(&key, Path::new("/p/a.ts")).len() == 1).await,
        "initial log content was never published"
    );

    // Removing every folder tears the targets down and clears the display.
    handle.folders_changed(Vec::new());
    assert!(
        eventually(|| display.is_empty()).await,
        "diagnostics survived folder removal"
    );

    handle.shutdown();
    task.await.unwrap();
}
