use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised when an event catalog violates its configuration invariants.
///
/// These only surface while a catalog is being built; queries against a
/// validated catalog never fail.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("event `{name}` has an inverted window (start {start} is not before end {end})")]
    InvertedWindow {
        name: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("event at index {index} has no name")]
    MissingName { index: usize },
    #[error("event `{event}` has an empty identifier in `{field}`")]
    MissingIdentifier { event: String, field: &'static str },
    #[error("event `{event}` has an invalid `{field}` value ({value})")]
    InvalidValue {
        event: String,
        field: &'static str,
        value: f64,
    },
    #[error("catalog JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("a roster needs at least one choice")]
    EmptyRoster,
}
