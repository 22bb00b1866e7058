//! Error taxonomy for lineup search.
//!
//! Every variant is fatal for the current run. The search engine never
//! substitutes default data or retries; callers decide what to do.

use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, LineupError>;

/// Errors raised while loading data, validating a run, or searching.
#[derive(Debug, thiserror::Error)]
pub enum LineupError {
    /// The run configuration is malformed for the given rating table.
    #[error("invalid configuration: {}", join_messages(.0))]
    Configuration(Vec<ValidationError>),

    /// A schedule references a program/slot combination with no rating.
    #[error("schedule references program '{program}' at slot {slot}, which has no rating")]
    InvalidSchedule { program: String, slot: usize },

    /// A schedule does not cover exactly one program per slot.
    #[error("schedule has {actual} slots, rating table has {expected}")]
    ScheduleLength { expected: usize, actual: usize },

    /// The rating table has no programs or no slots.
    #[error("empty rating data: {0}")]
    EmptyData(String),

    /// The rating table is structurally unusable (ragged rows, non-finite values).
    #[error("malformed rating table: {0}")]
    MalformedTable(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl LineupError {
    /// Validation issues carried by a `Configuration` error, if any.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            LineupError::Configuration(errors) => errors,
            _ => &[],
        }
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
