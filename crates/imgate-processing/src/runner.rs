//! Bounded execution of external tools.
//!
//! Every invocation waits for a permit from a shared semaphore, runs under a
//! deadline, and is killed when the deadline passes or the runner's
//! cancellation token fires. The outcome is returned as a value; nothing here
//! panics or blocks on a stuck child.

use crate::error::ProcessingError;
use crate::operation::CommandSpec;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Keep at most this many bytes of a failing tool's stderr
const MAX_STDERR_BYTES: usize = 4096;

/// How one tool invocation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Exit status 0 and the expected output file exists
    Success(PathBuf),
    ProcessFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
    Timeout(Duration),
    Cancelled,
    SpawnError(String),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success(_))
    }

    /// Convert into the produced output path or a [`ProcessingError`]
    pub fn into_result(self, program: &str) -> Result<PathBuf, ProcessingError> {
        match self {
            TaskOutcome::Success(path) => Ok(path),
            TaskOutcome::ProcessFailed { exit_code, stderr } => {
                Err(ProcessingError::ProcessFailed {
                    program: program.to_string(),
                    exit_code,
                    stderr,
                })
            }
            TaskOutcome::Timeout(timeout) => Err(ProcessingError::Timeout {
                program: program.to_string(),
                timeout,
            }),
            TaskOutcome::Cancelled => Err(ProcessingError::Cancelled {
                program: program.to_string(),
            }),
            TaskOutcome::SpawnError(message) => Err(ProcessingError::Spawn {
                program: program.to_string(),
                message,
            }),
        }
    }
}

/// Runs external tools with a deadline, a concurrency cap and cancellation.
///
/// Clones share the same permits and cancellation token.
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    timeout: Duration,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    shutdown: CancellationToken,
}

impl ProcessRunner {
    pub fn new(timeout: Duration, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            timeout,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            shutdown: CancellationToken::new(),
        }
    }

    /// Use an externally owned token, typically the server's shutdown token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Permits not currently held by a running tool
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `spec` and check that it produced `expected_output`.
    ///
    /// The deadline covers the child process only, not the wait for a permit.
    /// Waiting for a permit still ends early on cancellation.
    #[tracing::instrument(skip(self, spec, expected_output), fields(program = %spec.program))]
    pub async fn run(&self, spec: &CommandSpec, expected_output: &Path) -> TaskOutcome {
        let _permit = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => return TaskOutcome::Cancelled,
            permit = self.permits.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return TaskOutcome::Cancelled,
            },
        };

        let start = Instant::now();
        tracing::debug!(command = %spec, "Starting external tool");

        let child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(error = %e, "Failed to start external tool");
                return TaskOutcome::SpawnError(e.to_string());
            }
        };

        // Dropping the wait future drops the child, which kills it.
        let outcome = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => TaskOutcome::Cancelled,
            result = tokio::time::timeout(self.timeout, child.wait_with_output()) => match result {
                Err(_) => TaskOutcome::Timeout(self.timeout),
                Ok(Err(e)) => TaskOutcome::ProcessFailed {
                    exit_code: None,
                    stderr: e.to_string(),
                },
                Ok(Ok(output)) if output.status.success() => {
                    match tokio::fs::try_exists(expected_output).await {
                        Ok(true) => TaskOutcome::Success(expected_output.to_path_buf()),
                        _ => TaskOutcome::ProcessFailed {
                            exit_code: output.status.code(),
                            stderr: format!(
                                "exited successfully but did not produce {}",
                                expected_output.display()
                            ),
                        },
                    }
                }
                Ok(Ok(output)) => TaskOutcome::ProcessFailed {
                    exit_code: output.status.code(),
                    stderr: stderr_tail(&output.stderr),
                },
            },
        };

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        match &outcome {
            TaskOutcome::Success(_) => {
                tracing::debug!(duration_ms = duration_ms, "External tool finished")
            }
            TaskOutcome::ProcessFailed { exit_code, stderr } => tracing::warn!(
                exit_code = ?exit_code,
                stderr = %stderr,
                duration_ms = duration_ms,
                "External tool failed"
            ),
            TaskOutcome::Timeout(timeout) => tracing::warn!(
                timeout_secs = timeout.as_secs_f64(),
                "External tool timed out and was killed"
            ),
            TaskOutcome::Cancelled => tracing::info!("External tool cancelled by shutdown"),
            TaskOutcome::SpawnError(_) => {}
        }

        outcome
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.len() <= MAX_STDERR_BYTES {
        return text.to_string();
    }
    let mut start = text.len() - MAX_STDERR_BYTES;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}
