//! Preflight checks.
//!
//! Verifies that the tools and source layout the selected components need are
//! present, without building anything. Run with `make-build-env --preflight`.

use anyhow::{bail, Result};
use std::path::Path;

use crate::component::Component;
use crate::config::Config;
use crate::process::{self, Cmd};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// The build will fail.
    Fail,
    Warn,
}

impl CheckStatus {
    fn label(self) -> &'static str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Warn => "WARN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            details,
        }
    }

    pub fn pass(name: &str, details: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Pass, Some(details.into()))
    }

    pub fn fail(name: &str, details: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Fail, Some(details.into()))
    }

    pub fn warn(name: &str, details: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warn, Some(details.into()))
    }
}

pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    pub fn all_passed(&self) -> bool {
        self.fail_count() == 0
    }

    pub fn fail_count(&self) -> usize {
        self.count(CheckStatus::Fail)
    }

    fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn print(&self) {
        println!("=== Preflight Check Results ===\n");
        for check in &self.checks {
            print!("  [{}] {}", check.status.label(), check.name);
            match &check.details {
                Some(details) => println!(": {}", details),
                None => println!(),
            }
        }
        println!();
        println!(
            "Summary: {}/{} passed",
            self.count(CheckStatus::Pass),
            self.checks.len()
        );
        let failed = self.fail_count();
        if failed > 0 {
            println!("         {} FAILED - build will not succeed", failed);
        }
        let warned = self.count(CheckStatus::Warn);
        if warned > 0 {
            println!("         {} warnings", warned);
        }
    }
}

/// Run every check that applies to the selected components.
pub fn run_preflight(config: &Config) -> PreflightReport {
    let mut checks = Vec::new();

    if config.filter.is_empty() {
        checks.push(CheckResult::warn(
            "filter",
            format!("'{}' selects no components", config.filter),
        ));
    }
    for name in config.filter.unknown() {
        checks.push(CheckResult::warn(
            "filter",
            format!("unknown component '{}' will be ignored", name),
        ));
    }

    for component in config.filter.components() {
        match component {
            Component::Svaluer => {
                checks.push(check_tool(&config.tools.cargo, component));
                checks.push(check_file(
                    "cargo workspace",
                    &config.source.join("Cargo.toml"),
                ));
            }
            Component::Jtl => {
                checks.push(check_tool(&config.tools.cmake, component));
                checks.push(check_file(
                    "jtl sources",
                    &config.jtl_source().join("CMakeLists.txt"),
                ));
            }
        }
    }

    PreflightReport { checks }
}

/// Run preflight, print the report and bail if anything failed.
pub fn run_preflight_or_fail(config: &Config) -> Result<()> {
    let report = run_preflight(config);
    report.print();

    if !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed",
            report.fail_count()
        );
    }

    println!("All preflight checks passed!");
    Ok(())
}

fn check_tool(program: &str, component: Component) -> CheckResult {
    let Some(path) = process::which(program) else {
        return CheckResult::fail(
            program,
            format!("Not found. Required to build {}", component),
        );
    };

    let version = Cmd::new(program)
        .arg("--version")
        .allow_fail()
        .run()
        .ok()
        .filter(|r| r.success())
        .and_then(|r| r.stdout.lines().next().map(str::to_string));

    match version {
        Some(version) => CheckResult::pass(program, format!("{} ({})", path.display(), version)),
        None => CheckResult::warn(
            program,
            format!("{} found but '--version' failed", path.display()),
        ),
    }
}

fn check_file(name: &str, path: &Path) -> CheckResult {
    if path.is_file() {
        CheckResult::pass(name, path.display().to_string())
    } else {
        CheckResult::fail(name, format!("{} not found", path.display()))
    }
}
