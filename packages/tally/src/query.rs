use std::fmt::{self, Display};
use std::str::FromStr;

use crate::{Snapshot, ValidationError, Value};

/// A range-count query that can be answered by a [`Snapshot`].
///
/// Queries can be constructed directly or parsed from text. The text form is a verb followed by
/// whitespace-separated integer arguments:
///
/// * `less <threshold>`
/// * `greater <threshold>`
/// * `between <lower> <upper>`
///
/// # Example
///
/// ```
/// use tally::{Query, Recorder};
///
/// let mut recorder = Recorder::new();
///
/// for value in [3, 9, 3, 4, 6] {
///     recorder.record(value).unwrap();
/// }
///
/// let snapshot = recorder.snapshot();
///
/// let query: Query = "greater 4".parse().unwrap();
/// assert_eq!(query, Query::Greater(4));
/// assert_eq!(snapshot.answer(&query).unwrap(), 2);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Query {
    /// Count of recorded values strictly less than the threshold.
    Less(Value),

    /// Count of recorded values strictly greater than the threshold.
    Greater(Value),

    /// Count of recorded values in the inclusive range `lower..=upper`.
    Between {
        /// Inclusive lower bound.
        lower: Value,

        /// Inclusive upper bound.
        upper: Value,
    },
}

impl FromStr for Query {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parts = input.split_whitespace().collect::<Vec<_>>();

        match parts.as_slice() {
            ["less", threshold] => Ok(Self::Less(parse_threshold(threshold)?)),
            ["greater", threshold] => Ok(Self::Greater(parse_threshold(threshold)?)),
            ["between", lower, upper] => Ok(Self::Between {
                lower: parse_threshold(lower)?,
                upper: parse_threshold(upper)?,
            }),
            ["less" | "greater", ..] => Err(invalid_query(input, "expected exactly one threshold")),
            ["between", ..] => Err(invalid_query(
                input,
                "expected a lower and an upper bound",
            )),
            [] => Err(invalid_query(input, "query is empty")),
            _ => Err(invalid_query(
                input,
                "expected one of 'less', 'greater' or 'between'",
            )),
        }
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Less(threshold) => write!(f, "less {threshold}"),
            Self::Greater(threshold) => write!(f, "greater {threshold}"),
            Self::Between { lower, upper } => write!(f, "between {lower} {upper}"),
        }
    }
}

/// Parses a query threshold from text.
///
/// Only checks that the text is an integer. Whether the threshold is within range can only be
/// decided by the [`Snapshot`] that answers the query.
///
/// # Example
///
/// ```
/// assert_eq!(tally::parse_threshold("42").unwrap(), 42);
///
/// tally::parse_threshold("4.2").unwrap_err();
/// tally::parse_threshold("10a").unwrap_err();
/// ```
///
/// # Errors
///
/// Returns [`ValidationError::NotAnInteger`] if the text is not an integer.
pub fn parse_threshold(text: &str) -> Result<Value, ValidationError> {
    text.parse::<Value>()
        .map_err(|source| ValidationError::NotAnInteger {
            input: text.to_string(),
            source,
        })
}

fn invalid_query(input: &str, problem: &'static str) -> ValidationError {
    ValidationError::InvalidQuery {
        input: input.to_string(),
        problem,
    }
}

impl Snapshot {
    /// Answers a [`Query`] by dispatching to the matching query method.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`less()`][Self::less], [`greater()`][Self::greater] and
    /// [`between()`][Self::between].
    pub fn answer(&self, query: &Query) -> crate::Result<u64> {
        match *query {
            Query::Less(threshold) => self.less(threshold),
            Query::Greater(threshold) => self.greater(threshold),
            Query::Between { lower, upper } => self.between(lower, upper),
        }
    }
}
