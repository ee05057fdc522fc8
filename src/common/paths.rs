//! Path resolution and directory helpers.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Ensure a directory exists, creating it and its parents if necessary.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

/// Make `path` absolute against the current directory without touching the
/// filesystem.
pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .with_context(|| format!("Failed to resolve {}", path.display()))
}

/// Fully resolve an existing path (symlinks included).
pub fn canonical(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).with_context(|| format!("Failed to resolve {}", path.display()))
}

/// Copy a file, replacing whatever is at `dst`. Permission bits are copied too.
pub fn copy_file_overwrite(src: &Path, dst: &Path) -> Result<u64> {
    fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))
}
