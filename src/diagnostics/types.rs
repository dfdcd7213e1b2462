//! Diagnostic types published to a display.

use serde::Serialize;

use crate::problems::ProblemRecord;

/// Source label attached to every diagnostic produced by this tool.
pub const DIAGNOSTIC_SOURCE: &str = "build watch";

/// A zero-based position in a text document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// A range between two zero-based positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// A positioned problem message shown inline in an editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub message: String,
    /// Label identifying the tool the diagnostic came from.
    pub source: String,
}

impl Diagnostic {
    /// Create a diagnostic with a zero-length range at the given zero-based
    /// position, tagged with this tool's source label.
    #[must_use]
    pub fn at(line: u32, column: u32, message: impl Into<String>) -> Self {
        let position = Position { line, column };
        Self {
            range: Range {
                start: position,
                end: position,
            },
            message: message.into(),
            source: DIAGNOSTIC_SOURCE.to_string(),
        }
    }

    /// Build a diagnostic from a problem record, converting its 1-based
    /// position to zero-based (saturating at zero).
    #[must_use]
    pub fn from_record(record: &ProblemRecord) -> Self {
        Self::at(
            record.line.saturating_sub(1),
            record.column.saturating_sub(1),
            record.message.clone(),
        )
    }
}
