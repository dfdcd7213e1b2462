//! Colored terminal rendering for published diagnostics.
//!
//! Stands in for an editor display when the watcher runs standalone: every
//! publish prints the affected file's problems, every clear prints a reset
//! line for the owning log.

use std::io::{self, Write};
use std::path::Path;

use chrono::Utc;
use owo_colors::OwoColorize;

use super::display::{DiagnosticsChannel, DiagnosticsDisplay};
use super::types::Diagnostic;

/// Get current timestamp in the same format as tracing.
fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Format a diagnostic location as `path:line:column`, 1-based for humans.
#[must_use]
pub fn format_location(path: &Path, diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{}:{}",
        path.display(),
        diagnostic.range.start.line + 1,
        diagnostic.range.start.column + 1
    )
}

/// A `DiagnosticsDisplay` that prints to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDisplay;

impl ConsoleDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticsDisplay for ConsoleDisplay {
    fn create_channel(&self, key: &str) -> Box<dyn DiagnosticsChannel> {
        Box::new(ConsoleChannel {
            key: key.to_string(),
        })
    }
}

struct ConsoleChannel {
    key: String,
}

impl DiagnosticsChannel for ConsoleChannel {
    fn set(&mut self, path: &Path, diagnostics: Vec<Diagnostic>) {
        let ts = timestamp();
        if diagnostics.is_empty() {
            println!(
                "{} {} {}",
                ts.dimmed(),
                "[CLEAN]".green().bold(),
                path.display()
            );
        } else {
            for diagnostic in &diagnostics {
                println!(
                    "{} {} {} {}",
                    ts.dimmed(),
                    "[PROBLEM]".red().bold(),
                    format_location(path, diagnostic).bold(),
                    diagnostic.message
                );
            }
        }
        let _ = io::stdout().flush();
    }

    fn clear(&mut self) {
        println!(
            "{} {} {}",
            timestamp().dimmed(),
            "[CLEAR]".yellow().bold(),
            self.key.dimmed()
        );
        let _ = io::stdout().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_location_is_one_based() {
        let diagnostic = Diagnostic::at(4, 2, "type error");
        assert_eq!(
            format_location(Path::new("/p/a.ts"), &diagnostic),
            "/p/a.ts:5:3"
        );
    }

    #[test]
    fn test_format_location_at_origin() {
        let diagnostic = Diagnostic::at(0, 0, "boom");
        assert_eq!(
            format_location(Path::new("src/main.rs"), &diagnostic),
            "src/main.rs:1:1"
        );
    }
}
