//! Reporting - console summaries, comparison chart and JSON export

pub mod export;
pub mod summary;

pub use export::{write_json_file, SimRuns};
pub use summary::{format_count, latency_histogram, print_summary, Comparison, ComparisonRow};
