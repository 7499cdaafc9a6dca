//! CPU-style work in child processes
//!
//! The parent re-runs its own executable once per number with the hidden
//! `--compute-square` flag. Each child sleeps, prints the square and exits;
//! the parent waits for every child before printing its summary.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::thread;

use crate::config::SimConfig;
use crate::pool::{scaled, ProcessRunner, RunReport, WorkItem};
use crate::sync::console::RED;
use crate::sync::Console;
use crate::utils::{ProcessError, Result};

pub const NUMBERS: [u64; 3] = [1, 2, 3];

/// Simulated computation time per child
const COMPUTE_SECS: f64 = 2.0;

/// Flag that turns an invocation into a child
pub const CHILD_FLAG: &str = "--compute-square";

/// Arguments passed to each child
pub fn child_args(n: u64, time_scale: f64) -> Vec<String> {
    vec![
        CHILD_FLAG.to_string(),
        n.to_string(),
        "--time-scale".to_string(),
        time_scale.to_string(),
    ]
}

/// Parse child arguments (everything after the program name)
///
/// Returns `None` when the arguments are not a child invocation.
pub fn parse_child_args(args: &[String]) -> Option<(u64, f64)> {
    let pos = args.iter().position(|a| a == CHILD_FLAG)?;
    let n = args.get(pos + 1)?.parse().ok()?;
    let time_scale = args
        .iter()
        .position(|a| a == "--time-scale")
        .and_then(|p| args.get(p + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(1.0);
    Some((n, time_scale))
}

/// Body of a child process
pub fn child_main(n: u64, time_scale: f64) {
    println!("Calculating square of {}", n);
    thread::sleep(scaled(COMPUTE_SECS, time_scale));
    println!("Result: {}", n * n);
}

/// Run using the current executable as the child program
pub fn run(config: &SimConfig, console: Arc<Console>) -> Result<RunReport> {
    let exe = std::env::current_exe().map_err(ProcessError::NoExecutable)?;
    run_with_program(&exe, config, console)
}

/// Run using `program` as the child program
pub fn run_with_program(program: &Path, config: &SimConfig, console: Arc<Console>) -> Result<RunReport> {
    let items: Vec<WorkItem> = NUMBERS
        .iter()
        .enumerate()
        .map(|(i, n)| {
            WorkItem::new(
                i,
                format!("square({})", n),
                *n,
                scaled(COMPUTE_SECS, config.time_scale),
            )
        })
        .collect();

    let time_scale = config.time_scale;
    let report = ProcessRunner::new().run(&items, |item| {
        let mut cmd = Command::new(program);
        cmd.args(child_args(item.size, time_scale));
        cmd
    })?;

    for outcome in &report.outcomes {
        console.worker_line(
            outcome.id,
            format!("[{}] {}", outcome.worker, outcome.output.trim_end()),
        );
    }
    for failure in &report.failures {
        console.line(console.paint(RED, &format!("{} failed: {}", failure.name, failure.reason)));
    }

    console.line("All calculations finished.");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_args_round_trip() {
        let args = child_args(3, 0.5);
        assert_eq!(parse_child_args(&args), Some((3, 0.5)));
    }

    #[test]
    fn test_time_scale_defaults_to_one() {
        let args = vec![CHILD_FLAG.to_string(), "2".to_string()];
        assert_eq!(parse_child_args(&args), Some((2, 1.0)));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_children_are_reported() {
        use crate::config::SimKind;
        use crate::sync::MemoryWriter;

        let sink = MemoryWriter::new();
        let console = Arc::new(Console::with_writer(sink.clone(), false));
        let config = SimConfig::for_tests(SimKind::Squares, 0.01);

        // `false` ignores its arguments and exits 1
        let report = run_with_program(Path::new("false"), &config, console).unwrap();

        assert!(report.outcomes.is_empty());
        assert_eq!(report.failures.len(), NUMBERS.len());
        let text = sink.contents();
        for n in NUMBERS {
            assert!(text.contains(&format!("square({}) failed", n)), "{}", text);
        }
    }

    #[test]
    fn test_not_a_child() {
        assert_eq!(parse_child_args(&[]), None);
        let args = vec![CHILD_FLAG.to_string(), "x".to_string()];
        assert_eq!(parse_child_args(&args), None);
    }
}
