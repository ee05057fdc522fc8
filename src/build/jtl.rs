//! JTL: configured, built and installed with CMake.
//!
//! The install step writes directly under the prefix (the output root), not
//! under `bin/`. JTL's own install rules decide the layout.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::report::JtlInstall;
use super::svaluer;
use crate::common::{absolute, canonical, WorkDir};
use crate::config::{Config, PrefixMode};
use crate::process::Cmd;

/// Written by `cmake --install` into the build tree.
const INSTALL_MANIFEST: &str = "install_manifest.txt";

/// The value passed as `CMAKE_INSTALL_PREFIX`.
///
/// In absolute mode `config.out` must already exist.
pub fn install_prefix(config: &Config) -> Result<PathBuf> {
    match config.prefix_mode {
        PrefixMode::Absolute => canonical(&config.out),
        PrefixMode::AsGiven => Ok(config.out.clone()),
    }
}

pub fn configure_command(config: &Config, work: &WorkDir, prefix: &Path) -> Cmd {
    Cmd::new(&config.tools.cmake)
        .arg("-S")
        .arg_path(&config.jtl_source())
        .arg("-B")
        .arg_path(&work.cmake_dir())
        .arg_os(prefix_define(prefix))
}

/// `-DCMAKE_INSTALL_PREFIX=<prefix>`, keeping the path's bytes intact.
fn prefix_define(prefix: &Path) -> OsString {
    let mut define = OsString::from("-DCMAKE_INSTALL_PREFIX=");
    define.push(prefix.as_os_str());
    define
}

pub fn build_command(config: &Config, work: &WorkDir) -> Cmd {
    Cmd::new(&config.tools.cmake)
        .arg("--build")
        .arg_path(&work.cmake_dir())
}

pub fn install_command(config: &Config, work: &WorkDir) -> Cmd {
    Cmd::new(&config.tools.cmake)
        .arg("--install")
        .arg_path(&work.cmake_dir())
}

/// Configure, build and install JTL into the output root.
pub fn build(config: &Config, work: &WorkDir) -> Result<JtlInstall> {
    let prefix = install_prefix(config)?;

    println!("Configuring JTL");
    configure_command(config, work, &prefix).run_interactive()?;

    println!("Building JTL");
    build_command(config, work).run_interactive()?;

    println!("Installing JTL to {}", prefix.display());
    install_command(config, work).run_interactive()?;

    let installed = installed_files(work, &config.out, &prefix)?;
    log::debug!("JTL installed {} file(s)", installed.len());

    Ok(JtlInstall {
        prefix,
        installed,
        elapsed_secs: 0.0,
    })
}

/// Files the install step produced, relative to the output root.
///
/// Read from CMake's install manifest when there is one. Manifest entries
/// outside the output root are kept as written.
///
/// Without a manifest this is every file under `out` except `bin/svaluer` and
/// the work directory (when `--tmp` points inside `out`). Files that were in
/// `out` before the run are listed too.
pub fn installed_files(work: &WorkDir, out: &Path, prefix: &Path) -> Result<Vec<PathBuf>> {
    let manifest = work.cmake_dir().join(INSTALL_MANIFEST);
    if manifest.is_file() {
        let content = fs::read_to_string(&manifest)
            .with_context(|| format!("Failed to read {}", manifest.display()))?;
        let roots = output_roots(out, prefix);
        return Ok(parse_install_manifest(&content)
            .into_iter()
            .map(|entry| relative_to_roots(entry, &roots))
            .collect());
    }

    let skip = Path::new("bin").join(svaluer::PACKAGE);
    let work_dir = canonical(work.path()).ok();
    let mut files = Vec::new();
    let walker = WalkDir::new(out).sort_by_file_name().into_iter().filter_entry(|e| {
        let inside_work = work_dir
            .as_deref()
            .is_some_and(|w| fs::canonicalize(e.path()).is_ok_and(|p| p == w));
        !inside_work
    });
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", out.display()))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel = entry.path().strip_prefix(out).unwrap_or(entry.path());
        if rel != skip.as_path() {
            files.push(rel.to_path_buf());
        }
    }
    Ok(files)
}

/// Spellings of the output root CMake may have written into the manifest.
fn output_roots(out: &Path, prefix: &Path) -> Vec<PathBuf> {
    let mut roots = vec![prefix.to_path_buf()];
    roots.extend(absolute(prefix).ok());
    roots.extend(absolute(out).ok());
    roots.extend(canonical(out).ok());
    roots.dedup();
    roots
}

fn relative_to_roots(entry: PathBuf, roots: &[PathBuf]) -> PathBuf {
    roots
        .iter()
        .find_map(|root| entry.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .unwrap_or(entry)
}

fn parse_install_manifest(content: &str) -> Vec<PathBuf> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}
