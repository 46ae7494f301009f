//! Runs the external fetch tool that does all actual media retrieval.
//!
//! One invocation per accepted request: `<program> -f <format> -o <path>
//! --no-playlist <url>`, the user URL always the final argument. The tool is
//! a black box; this module cares about its exit status, its stderr (for the
//! log), and whatever it left on disk after a failure.

mod error;
mod scrub;

pub use error::FetchError;

use std::collections::VecDeque;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::config::FetchConfig;

/// Stderr lines kept for the failure log.
const STDERR_TAIL_LINES: usize = 20;

/// Invokes the external tool with a fixed argument shape.
#[derive(Debug, Clone)]
pub struct Fetcher {
    program: String,
    format: String,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(cfg: &FetchConfig) -> Self {
        Fetcher {
            program: cfg.program.clone(),
            format: cfg.format.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }

    /// Fetch `url` into `output`. Returns once the tool has exited (or been
    /// killed on timeout); on failure, partial output has been scrubbed.
    pub async fn fetch(&self, url: &str, output: &Path) -> Result<(), FetchError> {
        let result = self.run_tool(url, output).await;
        if result.is_err() {
            scrub::remove_partial_output(output).await;
        }
        result
    }

    async fn run_tool(&self, url: &str, output: &Path) -> Result<(), FetchError> {
        tracing::info!(program = %self.program, output = %output.display(), "starting fetch");
        let mut child = Command::new(&self.program)
            .arg("-f")
            .arg(&self.format)
            .arg("-o")
            .arg(output)
            .arg("--no-playlist")
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| FetchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let tail_task = child.stderr.take().map(|stderr| {
            tokio::spawn(async move {
                let mut tail: VecDeque<String> = VecDeque::with_capacity(STDERR_TAIL_LINES);
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!("fetch tool: {line}");
                    if tail.len() == STDERR_TAIL_LINES {
                        tail.pop_front();
                    }
                    tail.push_back(line);
                }
                Vec::from(tail)
            })
        });

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => Some(status),
            Ok(Err(source)) => return Err(FetchError::Wait { source }),
            Err(_elapsed) => {
                if let Err(err) = child.start_kill() {
                    tracing::warn!(error = %err, "could not kill timed-out fetch tool");
                }
                let _ = child.wait().await;
                // Orphaned grandchildren may still hold the stderr pipe open;
                // don't wait on them for the tail.
                if let Some(task) = &tail_task {
                    task.abort();
                }
                None
            }
        };

        let stderr_tail = collect_tail(tail_task).await;

        match status {
            Some(status) if status.success() => {
                tracing::info!(output = %output.display(), "fetch complete");
                Ok(())
            }
            Some(status) => {
                let stderr_tail = stderr_tail.join("\n");
                // The per-line feed is debug-only; the failure record must
                // carry the tail even under an info-level filter.
                if stderr_tail.is_empty() {
                    tracing::warn!(%status, "fetch tool failed");
                } else {
                    tracing::warn!(%status, %stderr_tail, "fetch tool failed");
                }
                Err(FetchError::Failed { status, stderr_tail })
            }
            None => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "fetch tool timed out, killed"
                );
                Err(FetchError::TimedOut {
                    after: self.timeout,
                })
            }
        }
    }
}

async fn collect_tail(task: Option<JoinHandle<Vec<String>>>) -> Vec<String> {
    match task {
        Some(task) => task.await.unwrap_or_default(),
        None => Vec::new(),
    }
}
