use std::iter;
use std::num::NonZero;
use std::sync::atomic::{self, AtomicU64};

use tracing::debug;

use crate::{DEFAULT_CAPACITY, Error, Snapshot, Value, index_of};

/// We use `Relaxed` ordering for all counter access. Each counter is independent and the
/// recording path must stay as cheap as possible. The cost is that a snapshot taken while other
/// threads are recording may see some counters before and others after a concurrent update.
const COUNTER_ORDERING: atomic::Ordering = atomic::Ordering::Relaxed;

/// A fixed-capacity counting table that can be recorded into from multiple threads at once.
///
/// This has the same contract as [`Recorder`][1] but all operations take `&self`, so a single
/// instance can be shared between threads (e.g. via `Arc` or scoped threads).
///
/// Use `Recorder::builder().build_sync()` to create an instance.
///
/// # Consistency
///
/// Each counter is updated atomically, so no observation is ever lost. However, a snapshot
/// taken while other threads are still recording is not guaranteed to be consistent across
/// values. If you need an exact point-in-time view, ensure recording has stopped (e.g. all
/// recording threads have been joined) before calling [`snapshot()`][Self::snapshot].
///
/// [1]: crate::Recorder
#[derive(Debug)]
pub struct SyncRecorder {
    // Length always equals `capacity`.
    counts: Box<[AtomicU64]>,
    capacity: NonZero<usize>,
}

impl SyncRecorder {
    pub(crate) fn with_capacity(capacity: NonZero<usize>) -> Self {
        Self {
            counts: iter::repeat_with(|| AtomicU64::new(0))
                .take(capacity.get())
                .collect::<Vec<_>>()
                .into_boxed_slice(),
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
    pub fn record(&self, value: Value) -> crate::Result<()> {
        self.record_many(value, 1)
    }

    /// Records `count` occurrences of `value` in one operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `value` is not in `0..capacity`.
    pub fn record_many(&self, value: Value, count: u64) -> crate::Result<()> {
        // `fetch_add` always wraps on overflow, which matches the crate panic policy.
        self.counter(value)?.fetch_add(count, COUNTER_ORDERING);

        Ok(())
    }

    /// The number of times `value` has been recorded so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `value` is not in `0..capacity`.
    pub fn count(&self, value: Value) -> crate::Result<u64> {
        Ok(self.counter(value)?.load(COUNTER_ORDERING))
    }

    /// The total number of recorded occurrences of all values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().fold(0_u64, |total, count| {
            total.wrapping_add(count.load(COUNTER_ORDERING))
        })
    }

    /// Builds a [`Snapshot`] of the counts as they are right now.
    ///
    /// See the type-level documentation for the consistency guarantees when other threads
    /// are recording concurrently.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let counts = self
            .counts
            .iter()
            .map(|count| count.load(COUNTER_ORDERING))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Snapshot::new(counts, self.capacity)
    }

    fn counter(&self, value: Value) -> crate::Result<&AtomicU64> {
        index_of(value, self.capacity.get())
            .and_then(|i| self.counts.get(i))
            .ok_or_else(|| {
                debug!(
                    value,
                    capacity = self.capacity.get(),
                    "rejected value outside of recorder range"
                );

                Error::OutOfRange {
                    value,
                    capacity: self.capacity,
                }
            })
    }
}

impl Default for SyncRecorder {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
