//! Removes aged artifacts that were fetched but never collected.
//!
//! Served artifacts are already deleted by the file server, so everything the
//! sweep finds past the threshold is an abandoned fetch (client never clicked
//! the link, or disconnected mid-fetch). Runs at the start of each form-page
//! request, not on a timer.

use anyhow::{Context, Result};
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime};

use tokio::fs;

/// Counts from one janitor sweep.
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepStats {
    /// Regular files inspected.
    pub scanned: usize,
    /// Files removed for exceeding the age threshold.
    pub removed: usize,
}

/// Delete every regular file in `dir` whose modification time is more than
/// `max_age` in the past. Entries that cannot be inspected or removed are
/// logged and skipped; only an unreadable directory fails the sweep itself.
pub async fn sweep(dir: &Path, max_age: Duration) -> Result<SweepStats> {
    let now = SystemTime::now();
    let mut stats = SweepStats::default();

    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("read scratch dir {}", dir.display()))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("read scratch dir {}", dir.display()))?
    {
        let path = entry.path();
        let meta = match entry.metadata().await {
            Ok(meta) => meta,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "janitor could not stat entry");
                continue;
            }
        };
        if !meta.is_file() {
            continue;
        }
        stats.scanned += 1;

        let mtime = match meta.modified() {
            Ok(mtime) => mtime,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "janitor could not read mtime");
                continue;
            }
        };
        // A file dated in the future counts as fresh.
        let age = now.duration_since(mtime).unwrap_or(Duration::ZERO);
        if age <= max_age {
            continue;
        }

        match fs::remove_file(&path).await {
            Ok(()) => {
                stats.removed += 1;
                tracing::debug!(path = %path.display(), age_secs = age.as_secs(), "janitor removed aged artifact");
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "janitor could not remove artifact")
            }
        }
    }

    Ok(stats)
}
