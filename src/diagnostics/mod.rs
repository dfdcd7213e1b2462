//! Diagnostics publishing for build log problems.

mod collector;
mod console;
mod display;
mod documents;
mod memory;
mod types;

pub use collector::DiagnosticsCollector;
pub use console::ConsoleDisplay;
pub use display::{DiagnosticsChannel, DiagnosticsDisplay};
pub use documents::{NoOpenDocuments, OpenDocumentTracker};
pub use memory::MemoryDisplay;
pub use types::{Diagnostic, Position, Range, DIAGNOSTIC_SOURCE};
