//! conc-sims library
//!
//! Concurrency primitive simulations: worker threads, a fixed-size pool,
//! mutex-guarded shared state, a one-shot gate, cooperative async tasks
//! and child processes.

pub mod config;
pub mod pool;
pub mod report;
pub mod sims;
pub mod sync;
pub mod utils;
