//! Fetch failure classification.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

/// Why a fetch-tool invocation produced no artifact.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The tool could not be started (missing binary, permissions).
    #[error("could not start fetch tool `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The tool started but waiting on it failed.
    #[error("could not wait on fetch tool: {source}")]
    Wait {
        #[source]
        source: io::Error,
    },

    /// The tool ran to completion and reported failure.
    #[error("fetch tool failed: {status}")]
    Failed {
        status: ExitStatus,
        /// Last stderr lines, newline-joined; for the log, not the client.
        stderr_tail: String,
    },

    /// The tool was killed after exceeding the configured time limit.
    #[error("fetch tool timed out after {after:?}")]
    TimedOut { after: Duration },
}
