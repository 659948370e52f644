//! Error types for learning-core.

use thiserror::Error;

/// Result type alias using EngineError.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Invariant violations raised by the engine.
///
/// These always indicate a caller bug (malformed state handed in, answers
/// for unknown questions) and are never repaired silently. Degenerate but
/// legal inputs (empty pools, empty sessions) produce degenerate values
/// instead of errors.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("interval index {index} outside ladder range 0..={max}")]
    IntervalIndexOutOfRange { index: usize, max: usize },

    #[error("retention {value} outside 0..=100")]
    RetentionOutOfRange { value: u8 },

    #[error("duplicate response for question {question_id}")]
    DuplicateResponse { question_id: String },

    #[error("question {question_id} is not part of this session")]
    UnknownQuestion { question_id: String },

    #[error("targeting bounds inverted: min {min} > ideal {ideal}")]
    TargetingBounds { min: usize, ideal: usize },
}
