//! Mutex-guarded shared statistics
//!
//! The result log and both counters live behind one lock, so readers never
//! observe a log entry without its matching counter update.

use parking_lot::Mutex;
use serde::Serialize;

/// Consistent copy of the shared state
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot<T> {
    /// Entries in completion order
    pub log: Vec<T>,
    /// Sum of the sizes of every recorded entry
    pub total_size: u64,
    /// Number of recorded entries
    pub completed: u64,
}

impl<T> Default for StatsSnapshot<T> {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            total_size: 0,
            completed: 0,
        }
    }
}

/// Shared result log plus counters
pub struct SharedStats<T> {
    inner: Mutex<StatsSnapshot<T>>,
}

impl<T> SharedStats<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StatsSnapshot::default()),
        }
    }

    /// Append an entry and bump the counters
    ///
    /// Returns the 1-based completion position of the entry.
    pub fn record(&self, entry: T, size: u64) -> usize {
        self.record_with(entry, size, |position, _| position)
    }

    /// Append an entry, then run `f` while still holding the lock
    ///
    /// `f` receives the completion position and the entry. Used to print
    /// a line that must agree with the position just assigned.
    pub fn record_with<R>(&self, entry: T, size: u64, f: impl FnOnce(usize, &T) -> R) -> R {
        let mut inner = self.inner.lock();
        inner.total_size += size;
        inner.completed += 1;
        inner.log.push(entry);
        let position = inner.log.len();
        f(position, &inner.log[position - 1])
    }

    /// Number of recorded entries
    pub fn completed(&self) -> u64 {
        self.inner.lock().completed
    }

    /// Sum of recorded sizes
    pub fn total_size(&self) -> u64 {
        self.inner.lock().total_size
    }

    /// Clear the log and zero the counters (between runs)
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.log.clear();
        inner.total_size = 0;
        inner.completed = 0;
    }
}

impl<T: Clone> SharedStats<T> {
    /// Consistent copy of log and counters
    pub fn snapshot(&self) -> StatsSnapshot<T> {
        self.inner.lock().clone()
    }
}

impl<T> Default for SharedStats<T> {
    fn default() -> Self {
        Self::new()
    }
}
