//! Error types for conc-sims

use std::io;
use thiserror::Error;

/// Top-level simulation error
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("Task '{name}' failed: {reason}")]
    Task { name: String, reason: String },

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Shorthand for a simulated per-task failure
    pub fn task(name: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::Task {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Child process errors
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed { program: String, source: io::Error },

    #[error("Child {pid} exited with {status}")]
    NonZeroExit { pid: u32, status: String },

    #[error("Failed to wait for child {pid}: {source}")]
    WaitFailed { pid: u32, source: io::Error },

    #[error("Could not locate current executable: {0}")]
    NoExecutable(io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_message() {
        let err = SimError::task("video_4K.mp4", "connection reset");
        assert_eq!(
            err.to_string(),
            "Task 'video_4K.mp4' failed: connection reset"
        );
    }

    #[test]
    fn test_process_error_converts() {
        let err: SimError = ProcessError::NonZeroExit {
            pid: 42,
            status: "exit status: 3".to_string(),
        }
        .into();
        assert!(matches!(err, SimError::Process(_)));
        assert!(err.to_string().contains("Child 42"));
    }
}
