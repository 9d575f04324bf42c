use std::cmp;
use std::fmt::{self, Display, Write};
use std::num::NonZero;

use tracing::debug;

use crate::{Error, ValidationError, Value, index_of};

/// An immutable point-in-time view of the counts in a recorder, answering range-count queries
/// in constant time.
///
/// Created via [`Recorder::snapshot()`][1] or [`SyncRecorder::snapshot()`][2]. Creating a
/// snapshot takes time and memory proportional to the recorder capacity; every query after
/// that is a constant-time lookup.
///
/// Thresholds are validated against the same range as recordable values: `0..capacity`.
/// A threshold outside this range is rejected with [`ValidationError::ThresholdOutOfRange`],
/// it is never clamped.
///
/// Snapshots are immutable, so they can be shared between threads without synchronization.
///
/// # Example
///
/// ```
/// use tally::Recorder;
///
/// let mut recorder = Recorder::new();
///
/// for value in [3, 9, 3, 4, 6] {
///     recorder.record(value).unwrap();
/// }
///
/// let snapshot = recorder.snapshot();
///
/// assert_eq!(snapshot.total(), 5);
/// assert_eq!(snapshot.less(4).unwrap(), 2);
/// assert_eq!(snapshot.greater(4).unwrap(), 2);
/// assert_eq!(snapshot.between(3, 6).unwrap(), 4);
///
/// snapshot.less(-1).unwrap_err();
/// ```
///
/// [1]: crate::Recorder::snapshot
/// [2]: crate::SyncRecorder::snapshot
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snapshot {
    // Owned copy, never a view into the recorder. Length equals `capacity`.
    counts: Box<[u64]>,

    // Exclusive prefix sums: `prefix_below[i]` is the sum of `counts[..i]`.
    // Non-decreasing (modulo wrapping), same length as `counts`.
    prefix_below: Box<[u64]>,

    total: u64,
    capacity: NonZero<usize>,
}

impl Snapshot {
    pub(crate) fn new(counts: Box<[u64]>, capacity: NonZero<usize>) -> Self {
        debug_assert_eq!(
            counts.len(),
            capacity.get(),
            "recorders always have exactly `capacity` counters"
        );

        let mut prefix_below = Vec::with_capacity(counts.len());
        let mut running_total = 0_u64;

        for &count in &counts {
            prefix_below.push(running_total);
            running_total = running_total.wrapping_add(count);
        }

        debug!(
            capacity = capacity.get(),
            total = running_total,
            "built snapshot"
        );

        Self {
            counts,
            prefix_below: prefix_below.into_boxed_slice(),
            total: running_total,
            capacity,
        }
    }

    /// The number of distinct values the snapshot holds counts for.
    /// Valid thresholds are `0..capacity`.
    #[must_use]
    pub fn capacity(&self) -> NonZero<usize> {
        self.capacity
    }

    /// The total number of recorded occurrences of all values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The number of times `value` had been recorded when the snapshot was taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `value` is not in `0..capacity`.
    pub fn count(&self, value: Value) -> crate::Result<u64> {
        index_of(value, self.capacity.get())
            .and_then(|i| self.counts.get(i))
            .copied()
            .ok_or(Error::OutOfRange {
                value,
                capacity: self.capacity,
            })
    }

    /// Counts the recorded values that are strictly less than `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ThresholdOutOfRange`] if `threshold` is not in `0..capacity`.
    pub fn less(&self, threshold: Value) -> crate::Result<u64> {
        let index = self.validate(threshold)?;

        Ok(self.count_below(index))
    }

    /// Counts the recorded values that are strictly greater than `threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ThresholdOutOfRange`] if `threshold` is not in `0..capacity`.
    pub fn greater(&self, threshold: Value) -> crate::Result<u64> {
        let index = self.validate(threshold)?;

        Ok(self.total.wrapping_sub(self.count_at_or_below(index)))
    }

    /// Counts the recorded values in the inclusive range `lower..=upper`.
    ///
    /// # Example
    ///
    /// ```
    /// use tally::Recorder;
    ///
    /// let mut recorder = Recorder::new();
    /// recorder.record(10).unwrap();
    /// recorder.record(20).unwrap();
    ///
    /// let snapshot = recorder.snapshot();
    ///
    /// assert_eq!(snapshot.between(10, 20).unwrap(), 2);
    /// assert_eq!(snapshot.between(11, 19).unwrap(), 0);
    /// assert_eq!(snapshot.between(20, 20).unwrap(), 1);
    ///
    /// // An inverted range is not an empty range, it is an error.
    /// snapshot.between(20, 10).unwrap_err();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ThresholdOutOfRange`] if either bound is not in
    /// `0..capacity`.
    ///
    /// Returns [`ValidationError::InvertedRange`] if `lower` is greater than `upper`.
    pub fn between(&self, lower: Value, upper: Value) -> crate::Result<u64> {
        let lower_index = self.validate(lower)?;
        let upper_index = self.validate(upper)?;

        if lower_index > upper_index {
            return Err(ValidationError::InvertedRange { lower, upper }.into());
        }

        Ok(self
            .count_at_or_below(upper_index)
            .wrapping_sub(self.count_below(lower_index)))
    }

    /// Iterates over the values that have been recorded at least once, in ascending order,
    /// together with their counts.
    ///
    /// # Example
    ///
    /// ```
    /// use tally::Recorder;
    ///
    /// let mut recorder = Recorder::new();
    /// recorder.record(4).unwrap();
    /// recorder.record(2).unwrap();
    /// recorder.record(4).unwrap();
    ///
    /// let occurrences = recorder.snapshot().occurrences().collect::<Vec<_>>();
    ///
    /// assert_eq!(occurrences, vec![(2, 1), (4, 2)]);
    /// ```
    pub fn occurrences(&self) -> impl Iterator<Item = (Value, u64)> {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count != 0)
            .filter_map(|(index, &count)| Value::try_from(index).ok().map(|value| (value, count)))
    }

    fn validate(&self, threshold: Value) -> Result<usize, ValidationError> {
        index_of(threshold, self.capacity.get()).ok_or(ValidationError::ThresholdOutOfRange {
            threshold,
            capacity: self.capacity,
        })
    }

    /// Count of values below `index`, for any `index` in `0..=capacity`.
    fn count_below(&self, index: usize) -> u64 {
        // The only index past the end of the table is `capacity`, below which everything lies.
        self.prefix_below.get(index).copied().unwrap_or(self.total)
    }

    fn count_at_or_below(&self, index: usize) -> u64 {
        #[expect(
            clippy::arithmetic_side_effects,
            reason = "index is a valid table index, so it is less than usize::MAX"
        )]
        let next_index = index + 1;

        self.count_below(next_index)
    }
}

/// We auto-scale the bars when rendering a snapshot. This is the number of characters used to
/// represent the most frequent value. Aliasing may make bars slightly wider than this.
const BAR_WIDTH_CHARS: u64 = 50;

const BAR_CHAR: char = '∎';

impl Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "total {} across values 0..{}",
            self.total, self.capacity
        )?;

        let Some(max_count) = self.occurrences().map(|(_, count)| count).max() else {
            return Ok(());
        };

        let widest_value = self
            .occurrences()
            .map(|(value, _)| value.to_string().len())
            .max()
            .unwrap_or_default();

        let widest_count = max_count.to_string().len();

        #[expect(
            clippy::integer_division,
            reason = "we accept the loss of precision - bars only need to be roughly right"
        )]
        let count_per_char = NonZero::new(cmp::max(max_count / BAR_WIDTH_CHARS, 1))
            .unwrap_or(NonZero::<u64>::MIN);

        for (value, count) in self.occurrences() {
            write!(f, "value {value:>widest_value$} [ {count:>widest_count$} ]: ")?;

            #[expect(
                clippy::integer_division,
                reason = "we accept the loss of precision - bars only need to be roughly right"
            )]
            let bar_width = count / count_per_char;
            for _ in 0..bar_width {
                f.write_char(BAR_CHAR)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::indexing_slicing, reason = "panic is fine in tests")]

    use std::fmt::Debug;

    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::Recorder;

    assert_impl_all!(Snapshot: Send, Sync, Debug, Clone);

    fn snapshot_of(capacity: NonZero<usize>, values: &[Value]) -> Snapshot {
        let mut recorder = Recorder::builder().capacity(capacity).build();

        for &value in values {
            recorder.record(value).unwrap();
        }

        recorder.snapshot()
    }

    #[test]
    fn prefix_sums_are_exclusive() {
        let snapshot = snapshot_of(nz!(5), &[0, 1, 1, 3, 4, 4, 4]);

        assert_eq!(&*snapshot.counts, &[1, 2, 0, 1, 3]);
        assert_eq!(&*snapshot.prefix_below, &[0, 1, 3, 3, 4]);
        assert_eq!(snapshot.total, 7);
    }

    #[test]
    fn empty_snapshot_answers_zero() {
        let snapshot = snapshot_of(nz!(10), &[]);

        assert_eq!(snapshot.total(), 0);

        for threshold in 0..10 {
            assert_eq!(snapshot.less(threshold).unwrap(), 0);
            assert_eq!(snapshot.greater(threshold).unwrap(), 0);
            assert_eq!(snapshot.between(0, threshold).unwrap(), 0);
        }
    }

    #[test]
    fn example_scenario() {
        let snapshot = snapshot_of(nz!(1000), &[3, 9, 3, 4, 6]);

        assert_eq!(snapshot.count(3).unwrap(), 2);
        assert_eq!(snapshot.count(9).unwrap(), 1);
        assert_eq!(snapshot.less(4).unwrap(), 2);
        assert_eq!(snapshot.greater(4).unwrap(), 2);
        assert_eq!(snapshot.between(3, 6).unwrap(), 4);
    }

    #[test]
    fn queries_at_range_extremes() {
        let snapshot = snapshot_of(nz!(10), &[0, 0, 5, 9]);

        assert_eq!(snapshot.less(0).unwrap(), 0);
        assert_eq!(snapshot.less(9).unwrap(), 3);

        assert_eq!(snapshot.greater(0).unwrap(), 2);
        assert_eq!(snapshot.greater(9).unwrap(), 0);

        assert_eq!(snapshot.between(0, 9).unwrap(), 4);
        assert_eq!(snapshot.between(0, 0).unwrap(), 2);
        assert_eq!(snapshot.between(9, 9).unwrap(), 1);
    }

    #[test]
    fn less_and_greater_of_predecessor_cover_total() {
        let snapshot = snapshot_of(nz!(10), &[3, 9, 3, 4, 6]);

        for threshold in 1..10 {
            assert_eq!(
                snapshot.less(threshold).unwrap() + snapshot.greater(threshold - 1).unwrap(),
                snapshot.total()
            );
        }

        snapshot.less(10).unwrap_err();
        snapshot.less(11).unwrap_err();
        assert_eq!(snapshot.between(9, 9).unwrap(), 1);
    }

    #[test]
    fn single_value_capacity() {
        let snapshot = snapshot_of(nz!(1), &[0, 0, 0]);

        assert_eq!(snapshot.less(0).unwrap(), 0);
        assert_eq!(snapshot.greater(0).unwrap(), 0);
        assert_eq!(snapshot.between(0, 0).unwrap(), 3);

        snapshot.less(1).unwrap_err();
    }

    #[test]
    fn out_of_range_thresholds_are_rejected() {
        let snapshot = snapshot_of(nz!(1000), &[3, 9, 3, 4, 6]);

        for threshold in [-1, 1000, 1001, Value::MIN, Value::MAX] {
            let expected = Error::Validation(ValidationError::ThresholdOutOfRange {
                threshold,
                capacity: nz!(1000),
            });

            assert_eq!(snapshot.less(threshold).unwrap_err(), expected);
            assert_eq!(snapshot.greater(threshold).unwrap_err(), expected);
        }
    }

    #[test]
    fn between_validates_both_bounds() {
        let snapshot = snapshot_of(nz!(1000), &[3, 9, 3, 4, 6]);

        snapshot.between(-1, 10).unwrap_err();
        snapshot.between(15, 1001).unwrap_err();
        snapshot.between(-1, 1001).unwrap_err();
    }

    #[test]
    fn between_reports_lower_bound_first() {
        let snapshot = snapshot_of(nz!(10), &[]);

        assert_eq!(
            snapshot.between(-5, 50).unwrap_err(),
            Error::Validation(ValidationError::ThresholdOutOfRange {
                threshold: -5,
                capacity: nz!(10),
            })
        );
    }

    #[test]
    fn between_with_inverted_range_is_error() {
        let snapshot = snapshot_of(nz!(10), &[1, 2, 3]);

        assert_eq!(
            snapshot.between(6, 3).unwrap_err(),
            Error::Validation(ValidationError::InvertedRange { lower: 6, upper: 3 })
        );
    }

    #[test]
    fn count_of_out_of_range_value_is_error() {
        let snapshot = snapshot_of(nz!(10), &[1]);

        assert_eq!(
            snapshot.count(10).unwrap_err(),
            Error::OutOfRange {
                value: 10,
                capacity: nz!(10),
            }
        );
    }

    #[test]
    fn occurrences_skip_unrecorded_values() {
        let snapshot = snapshot_of(nz!(10), &[9, 0, 9]);

        assert_eq!(
            snapshot.occurrences().collect::<Vec<_>>(),
            vec![(0, 1), (9, 2)]
        );
    }

    #[test]
    fn display_empty() {
        let snapshot = snapshot_of(nz!(10), &[]);

        assert_eq!(snapshot.to_string(), "total 0 across values 0..10\n");
    }

    #[test]
    fn display_renders_padded_bars() {
        let snapshot = snapshot_of(nz!(1000), &[3, 3, 250]);

        let expected = "total 3 across values 0..1000\n\
                        value   3 [ 2 ]: ∎∎\n\
                        value 250 [ 1 ]: ∎\n";

        assert_eq!(snapshot.to_string(), expected);
    }

    #[test]
    fn display_scales_large_counts() {
        let mut recorder = Recorder::builder().capacity(nz!(10)).build();
        recorder.record_many(1, 5000).unwrap();
        recorder.record_many(2, 100).unwrap();

        let rendered = recorder.snapshot().to_string();
        let lines = rendered.lines().collect::<Vec<_>>();

        // 5000 / 50 = 100 per character.
        assert_eq!(lines[1].matches(BAR_CHAR).count(), 50);
        assert_eq!(lines[2].matches(BAR_CHAR).count(), 1);
    }
}
