//! Task execution
//!
//! - WorkItem / Work: what to run and how
//! - PoolCounters: in-flight and progress counters
//! - WorkerPool: fixed-size thread pool
//! - Runner: sequential, thread-per-task and pooled execution
//! - cooperative: single-threaded async execution
//! - ProcessRunner: one child process per item

pub mod cooperative;
pub mod counters;
pub mod process;
pub mod runner;
pub mod work;
pub mod worker_pool;

pub use cooperative::{gather, run_cooperative, simulate_call};
pub use counters::{InFlightGuard, PoolCounters};
pub use process::ProcessRunner;
pub use runner::{ExecutionMode, RunReport, Runner};
pub use work::{scaled, SleepWork, TaskFailure, TaskOutcome, Work, WorkContext, WorkItem};
pub use worker_pool::WorkerPool;
