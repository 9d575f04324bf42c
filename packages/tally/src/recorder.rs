use std::num::NonZero;

use tracing::debug;

use crate::{DEFAULT_CAPACITY, Error, RecorderBuilder, Snapshot, Value, index_of};

/// A fixed-capacity table counting how many times each value has been recorded.
///
/// A recorder with capacity `N` accepts the values `0..N`. Attempting to record anything else
/// fails with [`Error::OutOfRange`] and leaves the table unchanged.
///
/// Recording requires exclusive access. For concurrent recording, see [`SyncRecorder`][1].
///
/// # Example
///
/// ```
/// use tally::Recorder;
///
/// let mut recorder = Recorder::new();
///
/// recorder.record(3).unwrap();
/// recorder.record(3).unwrap();
/// recorder.record(-1).unwrap_err();
///
/// assert_eq!(recorder.count(3).unwrap(), 2);
/// assert_eq!(recorder.total(), 2);
/// ```
///
/// [1]: crate::SyncRecorder
#[derive(Clone, Debug)]
pub struct Recorder {
    // Length always equals `capacity`.
    counts: Box<[u64]>,
    capacity: NonZero<usize>,
}

impl Recorder {
    /// Creates a recorder with [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a builder that can be used to customize the recorder.
    #[must_use]
    pub fn builder() -> RecorderBuilder {
        RecorderBuilder::new()
    }

    pub(crate) fn with_capacity(capacity: NonZero<usize>) -> Self {
        Self {
            counts: vec![0; capacity.get()].into_boxed_slice(),
            capacity,
        }
    }

    /// The number of distinct values the recorder can count. Valid values are `0..capacity`.
    #[must_use]
    pub fn capacity(&self) -> NonZero<usize> {
        self.capacity
    }

    /// Records one occurrence of `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `value` is not in `0..capacity`.
    pub fn record(&mut self, value: Value) -> crate::Result<()> {
        self.record_many(value, 1)
    }

    /// Records `count` occurrences of `value` in one operation.
    ///
    /// # Example
    ///
    /// ```
    /// use tally::Recorder;
    ///
    /// let mut recorder = Recorder::new();
    /// recorder.record_many(8, 500).unwrap();
    ///
    /// assert_eq!(recorder.count(8).unwrap(), 500);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `value` is not in `0..capacity`.
    pub fn record_many(&mut self, value: Value, count: u64) -> crate::Result<()> {
        let capacity = self.capacity;

        let Some(counter) = index_of(value, capacity.get()).and_then(|i| self.counts.get_mut(i))
        else {
            debug!(
                value,
                capacity = capacity.get(),
                "rejected value outside of recorder range"
            );
            return Err(Error::OutOfRange { value, capacity });
        };

        // Wrapping instead of panicking on overflow - see crate panic policy.
        *counter = counter.wrapping_add(count);

        Ok(())
    }

    /// The number of times `value` has been recorded.
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

    /// The total number of recorded occurrences of all values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .fold(0_u64, |total, &count| total.wrapping_add(count))
    }

    /// Builds a [`Snapshot`] of the counts as they are right now.
    ///
    /// The snapshot owns a copy of the counts, so recording more values afterwards does not
    /// change the answers of a snapshot that already exists. This method can be called any
    /// number of times.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.counts.clone(), self.capacity)
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}
