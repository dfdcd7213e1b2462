//! Problem record extraction from build log documents.

use serde::Deserialize;
use serde_json::Value;

/// One problem reported by the build tool.
///
/// `line` and `column` are 1-based, as written to the log.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProblemRecord {
    /// Source file the problem was reported against.
    pub path: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Human-readable problem description.
    pub message: String,
}

/// Extract well-typed problem records from a parsed build log document.
///
/// The expected top-level shape is a JSON array of record objects; any other
/// top-level shape yields no records. Entries with missing fields or wrong
/// field types are skipped, keeping the rest of the batch in input order.
/// Unknown extra fields are tolerated.
#[must_use]
pub fn records_from(content: &Value) -> Vec<ProblemRecord> {
    let Some(items) = content.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match ProblemRecord::deserialize(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed problem record");
                None
            }
        })
        .collect()
}
