//! make-build-env - builds the PPS problem build environment.
//!
//! The environment contains files used when compiling or importing problems:
//! - `bin/svaluer` (cargo)
//! - the JTL install tree (CMake), rooted at the output directory

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use make_build_env::component::DEFAULT_FILTER;
use make_build_env::config::{DEFAULT_OUT, DEFAULT_SOURCE};
use make_build_env::interrupt::{self, Interrupted};
use make_build_env::process::ToolFailed;
use make_build_env::{build, preflight, ComponentFilter, Config, PrefixMode, Toolchain};

#[derive(Parser)]
#[command(name = "make-build-env")]
#[command(about = "Creates the PPS problem build environment")]
#[command(
    after_help = "EXAMPLES:\n  make-build-env --out /opt/jjs            Build svaluer and JTL\n  make-build-env --filter jtl --tmp build  Build JTL only, keep intermediates\n  make-build-env --preflight               Check tools without building"
)]
struct Cli {
    /// Path to jjs-pps repository checkout
    #[arg(long, default_value = DEFAULT_SOURCE)]
    source: PathBuf,

    /// Path to directory that will contain files
    #[arg(long, default_value = DEFAULT_OUT)]
    out: PathBuf,

    /// Path to directory that will contain temporary files (kept after the run)
    #[arg(long)]
    tmp: Option<PathBuf>,

    /// Comma-separated list of components that should be built
    #[arg(long, default_value = DEFAULT_FILTER)]
    filter: ComponentFilter,

    /// Pass --out to CMake as given instead of resolving it to an absolute path
    #[arg(long)]
    relative_prefix: bool,

    /// Cargo program used to build svaluer
    #[arg(long, env = "BUILD_ENV_CARGO", default_value = "cargo")]
    cargo: String,

    /// CMake program used to build JTL
    #[arg(long, env = "BUILD_ENV_CMAKE", default_value = "cmake")]
    cmake: String,

    /// Run preflight checks and exit without building
    #[arg(long)]
    preflight: bool,

    /// Also write the build report as JSON to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            source: self.source.clone(),
            out: self.out.clone(),
            tmp: self.tmp.clone(),
            filter: self.filter.clone(),
            prefix_mode: if self.relative_prefix {
                PrefixMode::AsGiven
            } else {
                PrefixMode::Absolute
            },
            tools: Toolchain {
                cargo: self.cargo.clone(),
                cmake: self.cmake.clone(),
            },
        }
    }
}

fn main() -> ExitCode {
    // Load .env if present
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = interrupt::install() {
        eprintln!("Error: {:#}", err);
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    let config = cli.config();

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => failure_code(&err),
    }
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    if cli.preflight {
        return preflight::run_preflight_or_fail(config);
    }

    let report = build::run(config)?;
    report.print();
    if let Some(path) = &cli.report {
        report.write_json(path)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

/// A failing tool already printed its own diagnostics; only its exit code is
/// passed on. Anything else gets a message and exit code 1.
fn failure_code(err: &anyhow::Error) -> ExitCode {
    if let Some(interrupted) = err.downcast_ref::<Interrupted>() {
        eprintln!("Interrupted");
        return exit_code(interrupted.exit_code());
    }
    if let Some(failed) = err.downcast_ref::<ToolFailed>() {
        log::debug!("{}", failed);
        return exit_code(failed.code);
    }
    eprintln!("Error: {:#}", err);
    ExitCode::FAILURE
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1))
}
