//! Work items and the pluggable unit of work
//!
//! The runners never sleep themselves: they hand each [`WorkItem`] to a
//! [`Work`] implementation. Production code plugs in [`SleepWork`] (or a
//! simulation-specific type); tests plug in closures with fixed durations.

use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::utils::Result;

/// Description of one piece of simulated work
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkItem {
    /// Submission index
    pub id: usize,
    pub name: String,
    /// Simulated size (MB for downloads, patients for shifts, ...)
    pub size: u64,
    /// How long the work is meant to take
    pub duration: Duration,
}

impl WorkItem {
    pub fn new(id: usize, name: impl Into<String>, size: u64, duration: Duration) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            duration,
        }
    }
}

/// A completed item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutcome {
    pub id: usize,
    pub name: String,
    pub size: u64,
    /// Measured wall-clock time of this item
    pub elapsed: Duration,
    /// Name of the thread, process or task that ran it
    pub worker: String,
    /// Captured standard output (child processes only)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub output: String,
}

/// An item that failed and was excluded from the results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskFailure {
    pub id: usize,
    pub name: String,
    pub reason: String,
}

/// Where a work item is running
#[derive(Debug, Clone)]
pub struct WorkContext {
    /// Label of the executing worker
    pub worker: String,
    /// Stable slot used to pick a console colour
    pub slot: usize,
}

/// A blocking unit of work
pub trait Work: Send + Sync {
    fn execute(&self, item: &WorkItem, ctx: &WorkContext) -> Result<()>;
}

impl<F> Work for F
where
    F: Fn(&WorkItem, &WorkContext) -> Result<()> + Send + Sync,
{
    fn execute(&self, item: &WorkItem, ctx: &WorkContext) -> Result<()> {
        self(item, ctx)
    }
}

/// Sleeps for the item's duration, split into `steps` slices
#[derive(Debug, Clone, Copy)]
pub struct SleepWork {
    steps: u32,
}

impl SleepWork {
    pub fn new(steps: u32) -> Self {
        Self {
            steps: steps.max(1),
        }
    }
}

impl Default for SleepWork {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Work for SleepWork {
    fn execute(&self, item: &WorkItem, _ctx: &WorkContext) -> Result<()> {
        let slice = item.duration / self.steps;
        for _ in 0..self.steps {
            thread::sleep(slice);
        }
        Ok(())
    }
}

/// Scale a duration in seconds by the configured time multiplier
///
/// Saturates at `Duration::MAX`; negative or NaN products give zero.
pub fn scaled(secs: f64, time_scale: f64) -> Duration {
    let product = secs * time_scale;
    if product.is_nan() || product <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(product).unwrap_or(Duration::MAX)
}
