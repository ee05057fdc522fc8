//! Scoped work directory for intermediate build artifacts.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::paths::{absolute, ensure_dir_exists};

/// Where intermediate artifacts go during a run.
///
/// An owned directory is deleted when the value is dropped, on every exit path
/// that unwinds through the orchestrator. A caller-supplied directory is never
/// deleted.
#[derive(Debug)]
pub enum WorkDir {
    Owned(TempDir),
    Supplied(PathBuf),
}

impl WorkDir {
    /// Use `supplied` if given (creating it if missing), otherwise create a
    /// fresh temporary directory.
    ///
    /// The resulting path is always absolute.
    pub fn acquire(supplied: Option<&Path>) -> Result<Self> {
        match supplied {
            Some(dir) => {
                ensure_dir_exists(dir)?;
                let dir = absolute(dir)?;
                log::debug!("using supplied work directory {}", dir.display());
                Ok(WorkDir::Supplied(dir))
            }
            None => {
                let dir = tempfile::Builder::new()
                    .prefix("make-build-env-")
                    .tempdir()
                    .context("Failed to create temporary work directory")?;
                log::debug!("created work directory {}", dir.path().display());
                Ok(WorkDir::Owned(dir))
            }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            WorkDir::Owned(dir) => dir.path(),
            WorkDir::Supplied(dir) => dir,
        }
    }

    /// True when dropping this value removes the directory.
    pub fn is_owned(&self) -> bool {
        matches!(self, WorkDir::Owned(_))
    }

    /// CMake build tree for JTL.
    pub fn cmake_dir(&self) -> PathBuf {
        self.path().join("cmake")
    }
}
