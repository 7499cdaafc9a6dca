//! Three-mode task runner
//!
//! Executes a batch of [`WorkItem`]s sequentially, on one thread per item,
//! or on a fixed-size [`WorkerPool`]. Successful items are appended to the
//! shared stats under its lock; results also travel back to the caller
//! over a channel so the report lists them in completion order.
//!
//! A failing (or panicking) item is logged with its name and recorded as a
//! [`TaskFailure`]; its siblings keep running.

use std::fmt;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::counters::PoolCounters;
use super::work::{TaskFailure, TaskOutcome, Work, WorkContext, WorkItem};
use super::worker_pool::WorkerPool;
use crate::sync::SharedStats;
use crate::utils::{Result, SimError};

/// How a batch is executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One item at a time on the calling thread
    Sequential,
    /// One OS thread per item
    ThreadPerTask,
    /// Fixed number of long-lived workers
    Pool { size: usize },
}

impl ExecutionMode {
    pub fn label(&self) -> String {
        match self {
            Self::Sequential => "SEQUENTIAL".to_string(),
            Self::ThreadPerTask => "THREADS".to_string(),
            Self::Pool { size } => format!("POOL ({} workers)", size),
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Result of one batch
#[derive(Debug, Clone)]
pub struct RunReport {
    pub label: String,
    /// Successful items in completion order
    pub outcomes: Vec<TaskOutcome>,
    pub failures: Vec<TaskFailure>,
    /// Wall-clock time of the whole batch
    pub elapsed: Duration,
    /// Most items observed running at once
    pub peak_in_flight: usize,
}

impl RunReport {
    /// Sum of the sizes of successful items
    pub fn total_size(&self) -> u64 {
        self.outcomes.iter().map(|o| o.size).sum()
    }

    /// Size units per second of wall clock
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_size() as f64 / secs
        } else {
            0.0
        }
    }

    /// Submitted items (successes and failures)
    pub fn submitted(&self) -> usize {
        self.outcomes.len() + self.failures.len()
    }
}

type TaskResult = std::result::Result<TaskOutcome, TaskFailure>;

/// Runs batches of work against shared stats
pub struct Runner {
    work: Arc<dyn Work>,
    stats: Arc<SharedStats<TaskOutcome>>,
    counters: Arc<PoolCounters>,
}

impl Runner {
    pub fn new(work: Arc<dyn Work>, stats: Arc<SharedStats<TaskOutcome>>) -> Self {
        Self {
            work,
            stats,
            counters: Arc::new(PoolCounters::new()),
        }
    }

    pub fn stats(&self) -> &Arc<SharedStats<TaskOutcome>> {
        &self.stats
    }

    pub fn counters(&self) -> &Arc<PoolCounters> {
        &self.counters
    }

    /// Execute `items` in `mode` and wait for all of them
    pub fn run(&self, items: Vec<WorkItem>, mode: ExecutionMode) -> Result<RunReport> {
        self.counters.reset();
        info!("Running {} items in {} mode", items.len(), mode);

        let start = Instant::now();
        let results = match mode {
            ExecutionMode::Sequential => self.run_sequential(items),
            ExecutionMode::ThreadPerTask => self.run_threads(items)?,
            ExecutionMode::Pool { size } => self.run_pool(items, size)?,
        };
        let elapsed = start.elapsed();

        let mut outcomes = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(failure) => failures.push(failure),
            }
        }

        info!(
            "{} finished: {} ok, {} failed in {:.2}s",
            mode,
            outcomes.len(),
            failures.len(),
            elapsed.as_secs_f64()
        );

        Ok(RunReport {
            label: mode.label(),
            outcomes,
            failures,
            elapsed,
            peak_in_flight: self.counters.peak(),
        })
    }

    fn run_sequential(&self, items: Vec<WorkItem>) -> Vec<TaskResult> {
        let worker = thread::current()
            .name()
            .unwrap_or("main")
            .to_string();
        items
            .into_iter()
            .map(|item| {
                let ctx = WorkContext {
                    worker: worker.clone(),
                    slot: item.id,
                };
                run_one(self.work.as_ref(), &item, &ctx, &self.stats, &self.counters)
            })
            .collect()
    }

    fn run_threads(&self, items: Vec<WorkItem>) -> Result<Vec<TaskResult>> {
        let (tx, rx) = mpsc::channel();

        let handles = spawn_all(items, |item| {
            let name = format!("thread-{}", item.id + 1);
            let work = Arc::clone(&self.work);
            let stats = Arc::clone(&self.stats);
            let counters = Arc::clone(&self.counters);
            let tx = tx.clone();

            thread::Builder::new().name(name.clone()).spawn(move || {
                let ctx = WorkContext {
                    worker: name,
                    slot: item.id,
                };
                let result = run_one(work.as_ref(), &item, &ctx, &stats, &counters);
                let _ = tx.send(result);
            })
        })?;
        drop(tx);

        join_all(handles)?;
        Ok(rx.into_iter().collect())
    }

    fn run_pool(&self, items: Vec<WorkItem>, size: usize) -> Result<Vec<TaskResult>> {
        let pool = WorkerPool::new(size, "pool")?;
        debug!("pool ready with {} workers", pool.size());
        let (tx, rx) = mpsc::channel();

        for item in items {
            let work = Arc::clone(&self.work);
            let stats = Arc::clone(&self.stats);
            let counters = Arc::clone(&self.counters);
            let tx = tx.clone();

            pool.execute(move |worker| {
                let ctx = WorkContext {
                    worker: worker.to_string(),
                    slot: item.id,
                };
                let result = run_one(work.as_ref(), &item, &ctx, &stats, &counters);
                let _ = tx.send(result);
            })?;
        }
        drop(tx);

        pool.join()?;
        Ok(rx.into_iter().collect())
    }
}

/// Spawn one thread per item
///
/// If a spawn fails, the threads already started are joined before the
/// error is returned.
fn spawn_all<T, F>(items: Vec<T>, mut spawn: F) -> Result<Vec<JoinHandle<()>>>
where
    F: FnMut(T) -> io::Result<JoinHandle<()>>,
{
    let mut handles = Vec::with_capacity(items.len());
    for item in items {
        match spawn(item) {
            Ok(handle) => handles.push(handle),
            Err(e) => {
                let started = handles.len();
                if let Err(join_err) = join_all(handles) {
                    warn!("{}", join_err);
                }
                return Err(SimError::Worker(format!(
                    "failed to spawn worker thread after {} started: {}",
                    started, e
                )));
            }
        }
    }
    Ok(handles)
}

/// Join every handle, counting the ones that panicked
fn join_all(handles: Vec<JoinHandle<()>>) -> Result<()> {
    let mut panicked = 0;
    for handle in handles {
        if handle.join().is_err() {
            panicked += 1;
        }
    }

    if panicked > 0 {
        Err(SimError::Worker(format!("{} worker thread(s) panicked", panicked)))
    } else {
        Ok(())
    }
}

/// Run a single item, containing errors and panics to that item
fn run_one(
    work: &dyn Work,
    item: &WorkItem,
    ctx: &WorkContext,
    stats: &SharedStats<TaskOutcome>,
    counters: &PoolCounters,
) -> TaskResult {
    let _in_flight = counters.enter();
    debug!("[{}] starting {}", ctx.worker, item.name);

    let start = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| work.execute(item, ctx)));
    let elapsed = start.elapsed();

    let reason = match result {
        Ok(Ok(())) => {
            let outcome = TaskOutcome {
                id: item.id,
                name: item.name.clone(),
                size: item.size,
                elapsed,
                worker: ctx.worker.clone(),
                output: String::new(),
            };
            stats.record(outcome.clone(), item.size);
            counters.record_finished();
            return Ok(outcome);
        }
        Ok(Err(e)) => e.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };

    counters.record_failed();
    warn!(task = item.id, "error running {}: {}", item.name, reason);
    Err(TaskFailure {
        id: item.id,
        name: item.name.clone(),
        reason,
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<WorkItem> {
        (0..n)
            .map(|i| WorkItem::new(i, format!("item-{i}"), (i as u64 + 1) * 10, Duration::from_millis(5)))
            .collect()
    }

    fn sleeper() -> Arc<dyn Work> {
        Arc::new(|item: &WorkItem, _: &WorkContext| -> Result<()> {
            thread::sleep(item.duration);
            Ok(())
        })
    }

    #[test]
    fn test_every_mode_returns_all_items() {
        let modes = [
            ExecutionMode::Sequential,
            ExecutionMode::ThreadPerTask,
            ExecutionMode::Pool { size: 2 },
        ];
        for mode in modes {
            let stats = Arc::new(SharedStats::new());
            let runner = Runner::new(sleeper(), Arc::clone(&stats));
            let report = runner.run(items(7), mode).unwrap();

            assert_eq!(report.outcomes.len(), 7, "{mode}");
            assert!(report.failures.is_empty());
            assert_eq!(report.total_size(), 280);
            assert_eq!(stats.total_size(), 280);
            assert_eq!(stats.completed(), 7);
        }
    }

    #[test]
    fn test_sequential_preserves_submission_order() {
        let runner = Runner::new(sleeper(), Arc::new(SharedStats::new()));
        let report = runner.run(items(4), ExecutionMode::Sequential).unwrap();
        let ids: Vec<_> = report.outcomes.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(report.peak_in_flight, 1);
    }

    #[test]
    fn test_failures_are_excluded_not_fatal() {
        let work: Arc<dyn Work> = Arc::new(|item: &WorkItem, _: &WorkContext| -> Result<()> {
            match item.id {
                1 => Err(SimError::task(&item.name, "simulated timeout")),
                3 => panic!("corrupt archive"),
                _ => Ok(()),
            }
        });

        for mode in [ExecutionMode::ThreadPerTask, ExecutionMode::Pool { size: 2 }] {
            let stats = Arc::new(SharedStats::new());
            let runner = Runner::new(Arc::clone(&work), Arc::clone(&stats));
            let report = runner.run(items(5), mode).unwrap();

            assert_eq!(report.outcomes.len(), 3);
            assert_eq!(report.failures.len(), 2);
            assert_eq!(report.submitted(), 5);

            let mut failed: Vec<_> = report.failures.iter().map(|f| f.id).collect();
            failed.sort();
            assert_eq!(failed, vec![1, 3]);
            assert!(report
                .failures
                .iter()
                .any(|f| f.reason.contains("corrupt archive")));
            assert_eq!(stats.completed(), 3);
            assert_eq!(runner.counters().progress(), (5, 3, 2));
        }
    }

    #[test]
    fn test_pool_workers_are_named() {
        let runner = Runner::new(sleeper(), Arc::new(SharedStats::new()));
        let report = runner.run(items(4), ExecutionMode::Pool { size: 2 }).unwrap();
        assert!(report
            .outcomes
            .iter()
            .all(|o| o.worker == "pool-1" || o.worker == "pool-2"));
    }

    #[test]
    fn test_spawn_failure_joins_started_threads() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let finished = Arc::new(AtomicUsize::new(0));
        let result = spawn_all(vec![0, 1, 2, 3], |n| {
            if n == 2 {
                return Err(io::Error::new(io::ErrorKind::Other, "no more threads"));
            }
            let finished = Arc::clone(&finished);
            thread::Builder::new().spawn(move || {
                thread::sleep(Duration::from_millis(30));
                finished.fetch_add(1, Ordering::SeqCst);
            })
        });

        let err = result.unwrap_err();
        assert!(matches!(err, SimError::Worker(_)));
        assert!(err.to_string().contains("no more threads"));
        // Both threads started before the failure ran to completion.
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(ExecutionMode::Sequential.to_string(), "SEQUENTIAL");
        assert_eq!(ExecutionMode::Pool { size: 3 }.label(), "POOL (3 workers)");
    }

    #[test]
    fn test_throughput() {
        let report = RunReport {
            label: "x".to_string(),
            outcomes: vec![TaskOutcome {
                id: 0,
                name: "a".to_string(),
                size: 100,
                elapsed: Duration::from_secs(1),
                worker: "w".to_string(),
                output: String::new(),
            }],
            failures: Vec::new(),
            elapsed: Duration::from_secs(2),
            peak_in_flight: 1,
        };
        assert!((report.throughput() - 50.0).abs() < f64::EPSILON);
    }
}
