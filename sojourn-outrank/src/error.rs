//! Errors raised by the outranking stages.

use sojourn_core::RankingError;
use thiserror::Error;

/// Shape or content problems in outranking inputs.
///
/// These indicate programmer errors: the engine builds its own matrices, so
/// any of these surfacing from a ranking call is a bug to fix rather than a
/// condition to recover from.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutrankError {
    /// A credibility matrix row had the wrong length.
    #[error("credibility row {row} has {found} columns, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Expected column count.
        expected: usize,
        /// Actual column count.
        found: usize,
    },
    /// A credibility value was not finite or outside `0.0..=1.0`.
    #[error("credibility ({row}, {column}) = {value} is outside [0, 1]")]
    InvalidCredibility {
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
        /// Offending value.
        value: f64,
    },
    /// A per-candidate input did not match the number of candidates.
    #[error("{what} has {found} entries for {expected} candidates")]
    LengthMismatch {
        /// Name of the mismatching input.
        what: &'static str,
        /// Number of candidates.
        expected: usize,
        /// Number of entries supplied.
        found: usize,
    },
}

impl From<OutrankError> for RankingError {
    fn from(err: OutrankError) -> Self {
        Self::Malformed(err.to_string())
    }
}
