//! One child process per work item
//!
//! Every child is spawned before any is waited on, so they run in
//! parallel. Each child's stdout is captured and kept on its outcome. A
//! child that cannot be spawned or exits non-zero becomes a per-item
//! failure.

use std::process::{Child, Command, Stdio};
use std::time::Instant;

use tracing::{debug, info, warn};

use super::runner::RunReport;
use super::work::{TaskFailure, TaskOutcome, WorkItem};
use crate::utils::{ProcessError, Result, SimError};

/// Spawns and joins child processes
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Spawn `command_for(item)` for each item and wait for all of them
    pub fn run<F>(&self, items: &[WorkItem], command_for: F) -> Result<RunReport>
    where
        F: Fn(&WorkItem) -> Command,
    {
        info!("Spawning {} child processes", items.len());
        let start = Instant::now();

        let mut running: Vec<(&WorkItem, Child)> = Vec::with_capacity(items.len());
        let mut failures = Vec::new();

        for item in items {
            let mut command = command_for(item);
            command.stdout(Stdio::piped());
            let program = command.get_program().to_string_lossy().into_owned();
            match command.spawn() {
                Ok(child) => {
                    debug!("spawned pid {} for {}", child.id(), item.name);
                    running.push((item, child));
                }
                Err(source) => {
                    let err = ProcessError::SpawnFailed { program, source };
                    warn!(task = item.id, "error running {}: {}", item.name, err);
                    failures.push(failure(item, SimError::from(err)));
                }
            }
        }

        let peak_in_flight = running.len();
        let mut outcomes = Vec::with_capacity(running.len());

        for (item, child) in running {
            let pid = child.id();
            let output = match child.wait_with_output() {
                Ok(output) => output,
                Err(source) => {
                    let err = ProcessError::WaitFailed { pid, source };
                    warn!(task = item.id, "error running {}: {}", item.name, err);
                    failures.push(failure(item, SimError::from(err)));
                    continue;
                }
            };

            let status = output.status;
            if status.success() {
                outcomes.push(TaskOutcome {
                    id: item.id,
                    name: item.name.clone(),
                    size: item.size,
                    elapsed: start.elapsed(),
                    worker: format!("pid-{}", pid),
                    output: String::from_utf8_lossy(&output.stdout).into_owned(),
                });
            } else {
                let err = ProcessError::NonZeroExit {
                    pid,
                    status: status.to_string(),
                };
                warn!(task = item.id, "error running {}: {}", item.name, err);
                failures.push(failure(item, SimError::from(err)));
            }
        }

        Ok(RunReport {
            label: "PROCESSES".to_string(),
            outcomes,
            failures,
            elapsed: start.elapsed(),
            peak_in_flight,
        })
    }
}

fn failure(item: &WorkItem, err: SimError) -> TaskFailure {
    TaskFailure {
        id: item.id,
        name: item.name.clone(),
        reason: err.to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    fn items(n: usize) -> Vec<WorkItem> {
        (0..n)
            .map(|i| WorkItem::new(i, format!("job-{}", i + 1), 1, Duration::ZERO))
            .collect()
    }

    #[test]
    fn test_children_run_in_parallel() {
        let report = ProcessRunner::new()
            .run(&items(3), |_| {
                let mut cmd = Command::new("sh");
                cmd.args(["-c", "sleep 0.3"]);
                cmd
            })
            .unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert!(report.failures.is_empty());
        assert!(report.elapsed < Duration::from_millis(850));
    }

    #[test]
    fn test_child_stdout_is_collected() {
        let report = ProcessRunner::new()
            .run(&items(2), |item| {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(format!("echo Result: {}", (item.id + 1) * (item.id + 1)));
                cmd
            })
            .unwrap();

        assert_eq!(report.outcomes.len(), 2);
        let second = report.outcomes.iter().find(|o| o.id == 1).unwrap();
        assert_eq!(second.output.trim(), "Result: 4");
    }

    #[test]
    fn test_non_zero_exit_is_a_failure() {
        let report = ProcessRunner::new()
            .run(&items(3), |item| {
                let mut cmd = Command::new("sh");
                let code = if item.id == 1 { 3 } else { 0 };
                cmd.arg("-c").arg(format!("exit {}", code));
                cmd
            })
            .unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "job-2");
    }

    #[test]
    fn test_missing_program_is_a_failure() {
        let report = ProcessRunner::new()
            .run(&items(1), |_| Command::new("/definitely/not/a/program"))
            .unwrap();
        assert!(report.outcomes.is_empty());
        assert!(report.failures[0].reason.contains("Failed to spawn"));
    }
}
