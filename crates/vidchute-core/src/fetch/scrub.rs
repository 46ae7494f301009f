//! Best-effort removal of partial output after a failed fetch.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

/// Temp suffixes the tool appends next to its output path while downloading.
const PARTIAL_SUFFIXES: &[&str] = &["part", "ytdl"];

/// Remove `output` and its tool temp siblings (`<output>.part`,
/// `<output>.ytdl`). Problems are logged; the fetch has already failed and
/// nothing here changes that.
pub(super) async fn remove_partial_output(output: &Path) {
    let mut targets: Vec<PathBuf> = vec![output.to_path_buf()];
    if let Some(name) = output.file_name().and_then(|n| n.to_str()) {
        for suffix in PARTIAL_SUFFIXES {
            targets.push(output.with_file_name(format!("{name}.{suffix}")));
        }
    }

    for path in targets {
        match fs::remove_file(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "removed partial fetch output"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "could not remove partial fetch output")
            }
        }
    }
}
