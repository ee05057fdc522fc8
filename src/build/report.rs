//! What a run produced.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::common::paths::ensure_dir_exists;

/// The installed svaluer binary.
#[derive(Debug, Clone, Serialize)]
pub struct SvaluerArtifact {
    pub path: PathBuf,
    pub size: u64,
    pub sha256: String,
    pub elapsed_secs: f64,
}

/// Result of the JTL install step.
#[derive(Debug, Clone, Serialize)]
pub struct JtlInstall {
    /// `CMAKE_INSTALL_PREFIX` as passed to CMake.
    pub prefix: PathBuf,
    pub installed: Vec<PathBuf>,
    pub elapsed_secs: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub out: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svaluer: Option<SvaluerArtifact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jtl: Option<JtlInstall>,
}

impl BuildReport {
    pub fn new(out: &Path) -> Self {
        Self {
            out: out.to_path_buf(),
            svaluer: None,
            jtl: None,
        }
    }

    /// True when no component was built.
    pub fn is_empty(&self) -> bool {
        self.svaluer.is_none() && self.jtl.is_none()
    }

    pub fn print(&self) {
        println!("\n=== Build environment ready: {} ===", self.out.display());
        if let Some(svaluer) = &self.svaluer {
            println!(
                "  svaluer: {} ({} bytes, sha256 {})",
                svaluer.path.display(),
                svaluer.size,
                svaluer.sha256
            );
        }
        if let Some(jtl) = &self.jtl {
            println!(
                "  jtl: {} file(s) installed to {}",
                jtl.installed.len(),
                jtl.prefix.display()
            );
            for file in &jtl.installed {
                println!("    {}", file.display());
            }
        }
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir_exists(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write report to {}", path.display()))
    }
}
