//! Problem records reported by the build tool.

mod record;

pub use record::{records_from, ProblemRecord};
