//! Atomic run counters
//!
//! Tracks how many tasks are in flight right now and the highest value
//! ever observed, plus started/finished/failed totals. These counters are
//! observational only; the result log itself lives in `SharedStats`.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Counters shared between all workers of a run
#[derive(Debug, Default)]
pub struct PoolCounters {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    started: AtomicU64,
    finished: AtomicU64,
    failed: AtomicU64,
}

impl PoolCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a task as running until the returned guard is dropped
    pub fn enter(&self) -> InFlightGuard<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.started.fetch_add(1, Ordering::Relaxed);
        InFlightGuard { counters: self }
    }

    /// Record a successful task
    #[inline]
    pub fn record_finished(&self) {
        self.finished.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed task
    #[inline]
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Tasks currently running
    pub fn current(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of tasks observed running at once
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// (started, finished, failed)
    pub fn progress(&self) -> (u64, u64, u64) {
        (
            self.started.load(Ordering::Relaxed),
            self.finished.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }

    /// Zero everything (between runs)
    pub fn reset(&self) {
        self.in_flight.store(0, Ordering::SeqCst);
        self.peak.store(0, Ordering::SeqCst);
        self.started.store(0, Ordering::SeqCst);
        self.finished.store(0, Ordering::SeqCst);
        self.failed.store(0, Ordering::SeqCst);
    }
}

/// Decrements the in-flight count on drop
pub struct InFlightGuard<'a> {
    counters: &'a PoolCounters,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
