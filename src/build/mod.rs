//! Build orchestration for the problem build environment.
//!
//! A run is strictly sequential and fail-fast:
//!
//! 1. print the configuration
//! 2. create `<out>/bin`
//! 3. acquire the work directory
//! 4. build svaluer (if selected)
//! 5. configure, build and install JTL (if selected)
//!
//! The first failing step aborts the run. The work directory is released when
//! `run` returns, whether it succeeded or not.

pub mod jtl;
pub mod report;
pub mod svaluer;

use anyhow::Result;

use crate::common::{ensure_dir_exists, WorkDir};
use crate::component::Component;
use crate::config::Config;
use crate::interrupt;
use crate::timing::Timer;

pub use report::{BuildReport, JtlInstall, SvaluerArtifact};

/// Build every selected component into `config.out`.
pub fn run(config: &Config) -> Result<BuildReport> {
    config.print();
    println!();

    for name in config.filter.unknown() {
        eprintln!("[WARN] Ignoring unknown component '{}'", name);
    }

    ensure_dir_exists(&config.bin_dir())?;

    let work = WorkDir::acquire(config.tmp.as_deref())?;
    println!("Work directory: {}", work.path().display());

    let mut report = BuildReport::new(&config.out);

    for component in config.filter.components() {
        interrupt::check()?;
        let timer = Timer::start(component.name());
        match component {
            Component::Svaluer => {
                let mut artifact = svaluer::build(config, &work)?;
                artifact.elapsed_secs = timer.finish().as_secs_f64();
                report.svaluer = Some(artifact);
            }
            Component::Jtl => {
                let mut install = jtl::build(config, &work)?;
                install.elapsed_secs = timer.finish().as_secs_f64();
                report.jtl = Some(install);
            }
        }
    }

    if report.is_empty() {
        println!("Nothing to build.");
    }

    Ok(report)
}
