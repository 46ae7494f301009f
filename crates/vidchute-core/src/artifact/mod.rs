//! Download artifacts: transient files in a scratch directory.
//!
//! The store owns the directory path; callers never build paths into it
//! themselves. Serving hands out the open file plus a guard that removes the
//! file once the response is done with it, however that ends.

mod name;

pub use name::ArtifactName;

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};

/// Scratch-directory handle, passed explicitly to everything that touches
/// artifacts. Tests construct one over a temp dir.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open a store over `dir`, creating the directory if absent.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create scratch dir {}", dir.display()))?;
        Ok(ArtifactStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of an artifact inside the store. `name` is validated, so the
    /// result is always directly under the scratch directory.
    pub fn path_of(&self, name: &ArtifactName) -> PathBuf {
        self.dir.join(name.as_str())
    }

    /// Open an artifact for its one serve.
    ///
    /// `Ok(None)` when the artifact does not exist (never fetched, already
    /// collected, or reaped by the janitor). On success the returned guard
    /// keeps the artifact alive exactly until the caller drops it.
    pub async fn open_for_serve(&self, name: &ArtifactName) -> Result<Option<ServedArtifact>> {
        let path = self.path_of(name);
        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("open artifact {}", path.display()))
            }
        };
        let len = file
            .metadata()
            .await
            .with_context(|| format!("stat artifact {}", path.display()))?
            .len();
        Ok(Some(ServedArtifact {
            file,
            len,
            cleanup: RemoveOnDrop { path },
        }))
    }
}

/// An artifact opened for its single serve.
pub struct ServedArtifact {
    pub file: tokio::fs::File,
    pub len: u64,
    pub cleanup: RemoveOnDrop,
}

/// Removes a file when dropped. A missing file is fine: the janitor or a
/// competing request may have won the race.
pub struct RemoveOnDrop {
    path: PathBuf,
}

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed served artifact"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "could not remove served artifact")
            }
        }
    }
}
