//! Synchronization primitives shared by the simulations
//!
//! - Gate: one-shot broadcast signal
//! - SharedStats: result log and counters behind one mutex
//! - Console: line-serialized output

pub mod console;
pub mod gate;
pub mod stats;

pub use console::{worker_color, Console, MemoryWriter};
pub use gate::Gate;
pub use stats::{SharedStats, StatsSnapshot};
