//! Single-threaded cooperative runner
//!
//! All items run as tasks on one current-thread tokio runtime. Tasks only
//! yield at their awaited delay, so total wall clock is roughly the longest
//! single delay rather than the sum.

use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::info;

use super::counters::PoolCounters;
use super::runner::RunReport;
use super::work::{TaskOutcome, WorkItem};
use crate::sync::Console;
use crate::utils::{Result, SimError};

/// Await one simulated call
pub async fn simulate_call(item: WorkItem, console: Arc<Console>, counters: Arc<PoolCounters>) -> TaskOutcome {
    let _in_flight = counters.enter();
    console.worker_line(item.id, format!("  Querying API: {}", item.name));

    let start = Instant::now();
    tokio::time::sleep(item.duration).await;
    let elapsed = start.elapsed();

    console.worker_line(
        item.id,
        format!(
            "  Response received from {} in {:.1} seconds",
            item.name,
            elapsed.as_secs_f64()
        ),
    );
    counters.record_finished();

    TaskOutcome {
        id: item.id,
        name: item.name,
        size: item.size,
        elapsed,
        worker: format!("task-{}", item.id + 1),
        output: String::new(),
    }
}

/// Run every item concurrently on the current runtime and wait for all
pub async fn gather(items: Vec<WorkItem>, console: Arc<Console>) -> Result<RunReport> {
    let counters = Arc::new(PoolCounters::new());
    let start = Instant::now();

    let mut set = JoinSet::new();
    for item in items {
        set.spawn(simulate_call(item, Arc::clone(&console), Arc::clone(&counters)));
    }

    let mut outcomes = Vec::with_capacity(set.len());
    while let Some(joined) = set.join_next().await {
        let outcome = joined.map_err(|e| SimError::Worker(format!("async task failed: {}", e)))?;
        outcomes.push(outcome);
    }

    Ok(RunReport {
        label: "ASYNC (single thread)".to_string(),
        outcomes,
        failures: Vec::new(),
        elapsed: start.elapsed(),
        peak_in_flight: counters.peak(),
    })
}

/// Build a current-thread runtime and drive [`gather`] to completion
pub fn run_cooperative(items: Vec<WorkItem>, console: Arc<Console>) -> Result<RunReport> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    info!("Running {} async tasks on a single thread", items.len());
    rt.block_on(gather(items, console))
}
