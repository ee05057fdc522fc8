//! External tool execution.
//!
//! Every cargo/cmake invocation goes through [`Cmd`]. Build steps run with
//! inherited stdio so the tool's own diagnostics reach the terminal untouched;
//! version probes capture output instead.

use crate::interrupt;
use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// An external tool exited unsuccessfully.
///
/// Carried inside `anyhow::Error` so the binary can recover the exit code
/// with `downcast_ref` and hand it back to the shell.
#[derive(Debug, thiserror::Error)]
#[error("'{program}' failed (exit code {code})")]
pub struct ToolFailed {
    pub program: String,
    pub code: i32,
}

impl ToolFailed {
    fn from_status(program: &str, status: ExitStatus) -> Self {
        Self {
            program: program.to_string(),
            code: exit_code(status),
        }
    }
}

/// Exit code of a finished child. Signal deaths map to `128 + signo`, the way
/// shells report them.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    1
}

/// Result of a captured command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub status: ExitStatus,
    pub stdout: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

}

/// Builder for a single external command.
#[derive(Debug, Clone)]
pub struct Cmd {
    program: String,
    args: Vec<OsString>,
    envs: Vec<(String, String)>,
    allow_fail: bool,
}

impl Cmd {
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_string(),
            args: Vec::new(),
            envs: Vec::new(),
            allow_fail: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().into());
        }
        self
    }

    /// Add a path argument without lossy conversion.
    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.as_os_str().to_owned());
        self
    }

    /// Add a raw OS string argument, e.g. a `-DNAME=<path>` define.
    pub fn arg_os(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Add an environment override for this child only. The rest of the
    /// parent environment is inherited as-is.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.envs
            .push((key.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Allow non-zero exit codes without failing.
    pub fn allow_fail(mut self) -> Self {
        self.allow_fail = true;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn env_overrides(&self) -> &[(String, String)] {
        &self.envs
    }

    /// Command line as a single display string, for logs.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run the command and capture its output.
    pub fn run(self) -> Result<CommandResult> {
        log::debug!("capturing: {}", self.display());

        let output = self
            .command()
            .output()
            .with_context(|| format!("Failed to execute '{}'. Is it installed?", self.program))?;

        let result = CommandResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        };

        if !self.allow_fail && !result.success() {
            return Err(ToolFailed::from_status(&self.program, result.status).into());
        }

        Ok(result)
    }

    /// Run the command with inherited stdio and wait for it.
    ///
    /// Output goes directly to the terminal. A non-zero exit becomes a
    /// [`ToolFailed`] error. A SIGINT/SIGTERM received before or while the
    /// child runs becomes [`interrupt::Interrupted`], whatever the child did.
    pub fn run_interactive(self) -> Result<ExitStatus> {
        interrupt::check()?;
        log::debug!("running: {}", self.display());
        for (key, value) in &self.envs {
            log::trace!("  env override: {}={}", key, value);
        }

        let mut cmd = self.command();
        cmd.stdin(Stdio::inherit());
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());

        let status = cmd
            .status()
            .with_context(|| format!("Failed to execute '{}'. Is it installed?", self.program))?;
        interrupt::check()?;

        if !self.allow_fail && !status.success() {
            return Err(ToolFailed::from_status(&self.program, status).into());
        }

        Ok(status)
    }
}

/// Locate a program the same way the child spawn will.
///
/// Absolute or relative paths are checked directly; bare names go through
/// `PATH`.
pub fn which(program: &str) -> Option<PathBuf> {
    ::which::which(program).ok()
}
