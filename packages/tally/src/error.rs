use std::num::{NonZero, ParseIntError};

use thiserror::Error;

use crate::Value;

/// Errors that can occur when recording values or querying snapshots.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The caller attempted to record (or look up) a value that does not fit in the
    /// counting table.
    #[error("value {value} is out of range: expected 0 <= value < {capacity}")]
    OutOfRange {
        /// The rejected value.
        value: Value,

        /// The capacity of the counting table. Valid values are `0..capacity`.
        capacity: NonZero<usize>,
    },

    /// The arguments of a query did not pass validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Reasons why the arguments of a query may be rejected.
///
/// Validation always happens before any lookup, so a rejected query has no side effects
/// and produces no partial result.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum ValidationError {
    /// A threshold was outside the range of values that the snapshot can hold.
    #[error("threshold {threshold} is out of range: expected 0 <= threshold < {capacity}")]
    ThresholdOutOfRange {
        /// The rejected threshold.
        threshold: Value,

        /// The capacity of the snapshot. Valid thresholds are `0..capacity`.
        capacity: NonZero<usize>,
    },

    /// The lower bound of a range query was greater than the upper bound.
    #[error("range {lower}..={upper} is inverted: lower bound must be <= upper bound")]
    InvertedRange {
        /// The lower bound of the rejected range.
        lower: Value,

        /// The upper bound of the rejected range.
        upper: Value,
    },

    /// A query argument was expected to be an integer but could not be parsed as one.
    #[error("threshold '{input}' is not an integer")]
    NotAnInteger {
        /// The text that failed to parse.
        input: String,

        /// The underlying parse failure.
        #[source]
        source: ParseIntError,
    },

    /// A textual query did not match any known query form.
    #[error("invalid query '{input}': {problem}")]
    InvalidQuery {
        /// The query text that was rejected.
        input: String,

        /// A human-readable description of the problem.
        problem: &'static str,
    },
}

/// A specialized `Result` type for tally operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
