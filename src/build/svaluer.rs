//! svaluer: built with cargo, copied into `<out>/bin`.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io;
use std::path::Path;

use super::report::SvaluerArtifact;
use crate::common::{copy_file_overwrite, WorkDir};
use crate::config::Config;
use crate::process::Cmd;

/// Cargo package (and binary) name.
pub const PACKAGE: &str = "svaluer";

/// `--out-dir` is still unstable; this lets a stable toolchain accept it.
pub const BOOTSTRAP_ENV: (&str, &str) = ("RUSTC_BOOTSTRAP", "1");

/// The cargo invocation that drops the svaluer binary into the work directory.
pub fn command(config: &Config, work: &WorkDir) -> Cmd {
    Cmd::new(&config.tools.cargo)
        .args(["build", "-p", PACKAGE, "--manifest-path"])
        .arg_path(&config.source.join("Cargo.toml"))
        .args(["-Zunstable-options", "--out-dir"])
        .arg_path(work.path())
        .env(BOOTSTRAP_ENV.0, BOOTSTRAP_ENV.1)
}

/// Build svaluer and install it as `<out>/bin/svaluer`.
pub fn build(config: &Config, work: &WorkDir) -> Result<SvaluerArtifact> {
    println!("Building svaluer");
    command(config, work).run_interactive()?;

    let built = work.path().join(PACKAGE);
    let installed = config.bin_dir().join(PACKAGE);
    let size = copy_file_overwrite(&built, &installed)?;
    let sha256 = sha256_file(&installed)?;
    log::debug!("installed {} ({} bytes, sha256 {})", installed.display(), size, sha256);

    Ok(SvaluerArtifact {
        path: installed,
        size,
        sha256,
        elapsed_secs: 0.0,
    })
}

/// Hex SHA-256 of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(format!("{:x}", hasher.finalize()))
}
