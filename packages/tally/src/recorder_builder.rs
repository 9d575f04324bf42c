use std::num::NonZero;

use new_zealand::nz;

use crate::{Recorder, SyncRecorder};

/// The capacity of a recorder when no capacity is specified.
///
/// With this capacity, the values `0..1000` can be recorded.
pub const DEFAULT_CAPACITY: NonZero<usize> = nz!(1000);

/// Creates instances of [`Recorder`] and [`SyncRecorder`].
///
/// All parameters are optional. Use `Recorder::builder()` to create a new instance of this
/// builder.
///
/// See [crate-level documentation][crate] for more details on how to record values.
#[derive(Clone, Copy, Debug)]
pub struct RecorderBuilder {
    capacity: NonZero<usize>,
}

impl RecorderBuilder {
    pub(crate) fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Sets the number of distinct values the recorder can count.
    ///
    /// A recorder with capacity `N` accepts the values `0..N`. Defaults to
    /// [`DEFAULT_CAPACITY`].
    ///
    /// # Example
    ///
    /// ```
    /// use new_zealand::nz;
    /// use tally::Recorder;
    ///
    /// let recorder = Recorder::builder().capacity(nz!(100)).build();
    ///
    /// assert_eq!(recorder.capacity().get(), 100);
    /// ```
    #[must_use]
    pub fn capacity(self, capacity: NonZero<usize>) -> Self {
        Self { capacity }
    }

    /// Builds a recorder for use on a single thread.
    #[must_use]
    pub fn build(self) -> Recorder {
        Recorder::with_capacity(self.capacity)
    }

    /// Builds a recorder that can be shared between threads.
    ///
    /// # Example
    ///
    /// ```
    /// use tally::Recorder;
    ///
    /// let recorder = Recorder::builder().build_sync();
    /// recorder.record(42).unwrap();
    ///
    /// assert_eq!(recorder.count(42).unwrap(), 1);
    /// ```
    #[must_use]
    pub fn build_sync(self) -> SyncRecorder {
        SyncRecorder::with_capacity(self.capacity)
    }
}
