//! Invocation configuration.
//!
//! Assembled from CLI flags in `main`. Tool programs can also come from the
//! environment (`BUILD_ENV_CARGO`, `BUILD_ENV_CMAKE`), which `main` may have
//! populated from a `.env` file.

use std::path::PathBuf;

use crate::component::{ComponentFilter, DEFAULT_FILTER};

pub const DEFAULT_SOURCE: &str = ".";
pub const DEFAULT_OUT: &str = "./out";

/// How the output path is handed to CMake as `CMAKE_INSTALL_PREFIX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixMode {
    /// Canonicalize the output path first (symlinks resolved).
    #[default]
    Absolute,
    /// Pass the output path exactly as given on the command line.
    ///
    /// CMake resolves a relative prefix against its own working directory,
    /// which is not necessarily where `--out` points.
    AsGiven,
}

/// External programs the build shells out to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub cargo: String,
    pub cmake: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            cargo: "cargo".to_string(),
            cmake: "cmake".to_string(),
        }
    }
}

/// Everything one run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    /// Checkout containing the cargo workspace and `jtl/`.
    pub source: PathBuf,
    /// Output root. `bin/` lives directly under it.
    pub out: PathBuf,
    /// Caller-supplied work directory. `None` means a fresh temp directory.
    pub tmp: Option<PathBuf>,
    pub filter: ComponentFilter,
    pub prefix_mode: PrefixMode,
    pub tools: Toolchain,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            out: PathBuf::from(DEFAULT_OUT),
            tmp: None,
            filter: ComponentFilter::parse(DEFAULT_FILTER),
            prefix_mode: PrefixMode::default(),
            tools: Toolchain::default(),
        }
    }
}

impl Config {
    /// `<out>/bin`
    pub fn bin_dir(&self) -> PathBuf {
        self.out.join("bin")
    }

    /// `<source>/jtl`
    pub fn jtl_source(&self) -> PathBuf {
        self.source.join("jtl")
    }

    /// Print configuration before doing anything.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  source: {}", self.source.display());
        println!("  out: {}", self.out.display());
        match &self.tmp {
            Some(tmp) => println!("  tmp: {}", tmp.display()),
            None => println!("  tmp: (temporary directory)"),
        }
        println!("  filter: {}", self.filter);
        if !self.filter.unknown().is_empty() {
            println!("  ignored: {}", self.filter.unknown().join(","));
        }
        let prefix = match self.prefix_mode {
            PrefixMode::Absolute => "absolute",
            PrefixMode::AsGiven => "as given",
        };
        println!("  install prefix: {}", prefix);
        println!("  cargo: {}", self.tools.cargo);
        println!("  cmake: {}", self.tools.cmake);
    }
}
