#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! # tally
//!
//! Count occurrences of integer values within a bounded range and answer range-count
//! queries in constant time.
//!
//! Usage happens in two phases:
//!
//! 1. Observations are recorded into a [`Recorder`], a fixed-capacity counting table.
//! 2. A [`Snapshot`] is taken from the recorder. The snapshot performs a single linear pass
//!    over the counts when it is created, after which every query is a constant-time lookup.
//!
//! # Valid values
//!
//! A recorder with capacity `N` accepts values in the range `0..N` (zero-based, upper bound
//! exclusive). Query thresholds are validated against the same range. Anything outside it is
//! rejected with an error - values are never clamped.
//!
//! # Example
//!
//! ```
//! use tally::Recorder;
//!
//! let mut recorder = Recorder::new();
//!
//! for value in [3, 9, 3, 4, 6] {
//!     recorder.record(value).unwrap();
//! }
//!
//! let snapshot = recorder.snapshot();
//!
//! assert_eq!(snapshot.less(4).unwrap(), 2); // 3, 3
//! assert_eq!(snapshot.greater(4).unwrap(), 2); // 6, 9
//! assert_eq!(snapshot.between(3, 6).unwrap(), 4); // 3, 3, 4, 6
//! ```
//!
//! # Snapshots are point-in-time copies
//!
//! A snapshot owns a copy of the counts it was built from. Recording more values into the
//! recorder afterwards does not affect snapshots that already exist, so a single recorder can be
//! used for periodic reporting:
//!
//! ```
//! use tally::Recorder;
//!
//! let mut recorder = Recorder::new();
//! recorder.record(5).unwrap();
//!
//! let before = recorder.snapshot();
//! recorder.record(1).unwrap();
//! let after = recorder.snapshot();
//!
//! assert_eq!(before.less(5).unwrap(), 0);
//! assert_eq!(after.less(5).unwrap(), 1);
//! ```
//!
//! # Configuration
//!
//! The default capacity is [`DEFAULT_CAPACITY`]. Use the builder to choose another one:
//!
//! ```
//! use new_zealand::nz;
//! use tally::Recorder;
//!
//! let mut recorder = Recorder::builder().capacity(nz!(10)).build();
//!
//! recorder.record(9).unwrap();
//! recorder.record(10).unwrap_err();
//! ```
//!
//! # Recording from multiple threads
//!
//! [`Recorder`] requires exclusive access to record. If observations arrive on many threads,
//! build a [`SyncRecorder`] instead, which records via shared references:
//!
//! ```
//! use std::thread;
//!
//! use tally::Recorder;
//!
//! let recorder = Recorder::builder().build_sync();
//!
//! thread::scope(|s| {
//!     for value in 0..4 {
//!         let recorder = &recorder;
//!         s.spawn(move || recorder.record(value).unwrap());
//!     }
//! });
//!
//! assert_eq!(recorder.snapshot().total(), 4);
//! ```
//!
//! # Textual queries
//!
//! Queries can also be parsed from text, for example when they arrive from user input:
//!
//! ```
//! use tally::{Query, Recorder};
//!
//! let mut recorder = Recorder::new();
//! recorder.record(7).unwrap();
//!
//! let query: Query = "between 5 10".parse().unwrap();
//! assert_eq!(recorder.snapshot().answer(&query).unwrap(), 1);
//!
//! "less seven".parse::<Query>().unwrap_err();
//! ```
//!
//! # Panic policy
//!
//! This crate does not panic for "mathematical" reasons. Counters use wrapping arithmetic, so
//! recording more than `u64::MAX` observations mangles the data instead of panicking. Do not
//! stray near `u64` boundaries and you should be fine.

mod error;
mod query;
mod recorder;
mod recorder_builder;
mod snapshot;
mod sync_recorder;

pub use error::*;
pub use query::*;
pub use recorder::*;
pub use recorder_builder::*;
pub use snapshot::*;
pub use sync_recorder::*;

/// A value that can be recorded, or a threshold used in a query.
///
/// Signed so that negative inputs can be expressed and rejected by validation. Only values in
/// `0..capacity` are ever accepted.
pub type Value = i64;

/// Converts a value to a table index, if the value is within `0..capacity`.
pub(crate) fn index_of(value: Value, capacity: usize) -> Option<usize> {
    usize::try_from(value).ok().filter(|&index| index < capacity)
}
