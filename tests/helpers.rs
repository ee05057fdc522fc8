//! Shared test utilities: a scratch checkout plus fake `cargo` and `cmake`.
//!
//! The fakes are shell scripts that append their command line to an
//! invocation log and produce the same files the real tools would.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command as StdCommand, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

use make_build_env::{ComponentFilter, Config, PrefixMode, Toolchain};

/// Contents the fake cargo writes as the svaluer binary.
pub const SVALUER_BYTES: &[u8] = b"\x7fELF fake svaluer\n";

pub struct TestEnv {
    /// Kept alive for the lifetime of the environment.
    pub _temp_dir: TempDir,
    /// Fake jjs-pps checkout (has `Cargo.toml` and `jtl/CMakeLists.txt`).
    pub source: PathBuf,
    /// Output root handed to the build.
    pub out: PathBuf,
    /// Directory holding the fake tools.
    pub tools: PathBuf,
    /// Every fake tool invocation, one line each.
    pub log: PathBuf,
    pub root: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let source = root.join("pps");
        let tools = root.join("tools");
        let out = root.join("out");
        let log = root.join("invocations.log");

        fs::create_dir_all(source.join("jtl")).expect("Failed to create jtl dir");
        fs::create_dir_all(&tools).expect("Failed to create tools dir");
        fs::write(source.join("Cargo.toml"), "[workspace]\n").expect("Failed to write Cargo.toml");
        fs::write(source.join("jtl/CMakeLists.txt"), "project(jtl)\n")
            .expect("Failed to write CMakeLists.txt");
        fs::write(&log, "").expect("Failed to create log");

        let env = Self {
            _temp_dir: temp_dir,
            source,
            out,
            tools,
            log,
            root,
        };
        env.install_cargo(0);
        env.install_cmake(None);
        env
    }

    pub fn cargo(&self) -> PathBuf {
        self.tools.join("cargo")
    }

    pub fn cmake(&self) -> PathBuf {
        self.tools.join("cmake")
    }

    /// Install a fake cargo. A non-zero `exit_code` makes it fail without
    /// producing the binary.
    pub fn install_cargo(&self, exit_code: i32) {
        self.install_cargo_after(0, exit_code);
    }

    /// Like [`install_cargo`](Self::install_cargo), but the fake sleeps for
    /// `delay_secs` after logging its invocation.
    pub fn install_cargo_after(&self, delay_secs: u32, exit_code: i32) {
        let delay = format!("sleep {}\n", delay_secs);
        let body = if exit_code == 0 {
            r#"[ "$RUSTC_BOOTSTRAP" = "1" ] || { echo "error: -Z flags need nightly" >&2; exit 2; }
out=""
while [ $# -gt 0 ]; do
  [ "$1" = "--out-dir" ] && out="$2"
  shift
done
printf '\177ELF fake svaluer\n' > "$out/svaluer"
"#
            .to_string()
        } else {
            format!("echo 'error: could not compile `svaluer`' >&2\nexit {}\n", exit_code)
        };
        write_script(&self.cargo(), "cargo", &self.log, &(delay + &body));
    }

    /// Install a fake cmake. `fail_step` is one of `configure`, `build` or
    /// `install`; that step exits with code 2.
    pub fn install_cmake(&self, fail_step: Option<&str>) {
        let fail = |step: &str| {
            if fail_step == Some(step) {
                "echo 'CMake Error' >&2; exit 2"
            } else {
                ":"
            }
        };
        let body = format!(
            r#"case "$1" in
  -S)
    {configure}
    [ -f "$2/CMakeLists.txt" ] || {{ echo "CMake Error: no CMakeLists.txt in $2" >&2; exit 1; }}
    mkdir -p "$4"
    printf '%s' "${{5#-DCMAKE_INSTALL_PREFIX=}}" > "$4/prefix"
    ;;
  --build)
    {build}
    [ -f "$2/prefix" ] || exit 1
    touch "$2/built"
    ;;
  --install)
    {install}
    [ -f "$2/built" ] || exit 1
    prefix=$(cat "$2/prefix")
    mkdir -p "$prefix/lib" "$prefix/include/jtl"
    printf 'archive' > "$prefix/lib/libjtl.a"
    printf 'header' > "$prefix/include/jtl/jtl.h"
    ;;
esac
"#,
            configure = fail("configure"),
            build = fail("build"),
            install = fail("install"),
        );
        write_script(&self.cmake(), "cmake", &self.log, &body);
    }

    pub fn config(&self, filter: &str) -> Config {
        Config {
            source: self.source.clone(),
            out: self.out.clone(),
            tmp: None,
            filter: ComponentFilter::parse(filter),
            prefix_mode: PrefixMode::Absolute,
            tools: Toolchain {
                cargo: self.cargo().to_string_lossy().into_owned(),
                cmake: self.cmake().to_string_lossy().into_owned(),
            },
        }
    }

    /// System temp directory handed to the CLI, so auto-created work
    /// directories land somewhere the test can inspect.
    pub fn system_tmp(&self) -> PathBuf {
        self.root.join("system-tmp")
    }

    /// The `make-build-env` binary, run from the scratch root with the fake
    /// tools configured through the environment. `--out` is left at its
    /// default, which resolves to `self.out`.
    pub fn cli(&self) -> assert_cmd::Command {
        fs::create_dir_all(self.system_tmp()).expect("Failed to create system tmp");
        let mut cmd =
            assert_cmd::Command::cargo_bin("make-build-env").expect("Failed to locate binary");
        cmd.current_dir(&self.root)
            .env("BUILD_ENV_CARGO", self.cargo())
            .env("BUILD_ENV_CMAKE", self.cmake())
            .env("TMPDIR", self.system_tmp())
            .env_remove("RUST_LOG")
            .arg("--source")
            .arg(&self.source);
        cmd
    }

    /// Same setup as [`cli`](Self::cli), but spawned in the background so the
    /// test can signal the running process.
    pub fn spawn_cli(&self, args: &[&str]) -> Child {
        fs::create_dir_all(self.system_tmp()).expect("Failed to create system tmp");
        StdCommand::new(assert_cmd::cargo::cargo_bin("make-build-env"))
            .current_dir(&self.root)
            .env("BUILD_ENV_CARGO", self.cargo())
            .env("BUILD_ENV_CMAKE", self.cmake())
            .env("TMPDIR", self.system_tmp())
            .env_remove("RUST_LOG")
            .arg("--source")
            .arg(&self.source)
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn binary")
    }

    /// Block until a logged invocation starts with `prefix`.
    pub fn wait_for_invocation(&self, prefix: &str, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        while !self.invocations().iter().any(|line| line.starts_with(prefix)) {
            assert!(
                Instant::now() < deadline,
                "No '{}' invocation within {:?}",
                prefix,
                timeout
            );
            thread::sleep(Duration::from_millis(20));
        }
    }

    /// Logged invocations, in order.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .expect("Failed to read invocation log")
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Work directory the fake cargo was pointed at (its `--out-dir`).
    pub fn cargo_work_dir(&self) -> Option<PathBuf> {
        self.invocations()
            .iter()
            .find(|line| line.starts_with("cargo "))
            .and_then(|line| line.rsplit(' ').next())
            .map(PathBuf::from)
    }

    /// Work directory the fake cmake configured into (parent of `-B`).
    pub fn cmake_work_dir(&self) -> Option<PathBuf> {
        let line = self
            .invocations()
            .into_iter()
            .find(|line| line.starts_with("cmake -S "))?;
        let mut words = line.split(' ');
        words.find(|w| *w == "-B")?;
        let build_dir = PathBuf::from(words.next()?);
        build_dir.parent().map(Path::to_path_buf)
    }
}

fn write_script(path: &Path, name: &str, log: &Path, body: &str) {
    let script = format!(
        "#!/bin/sh\necho \"{} $*\" >> '{}'\n{}",
        name,
        log.display(),
        body
    );
    fs::write(path, script).expect("Failed to write fake tool");
    let mut perms = fs::metadata(path).expect("Failed to get metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to set permissions");
}

pub fn assert_file_exists(path: &Path) {
    assert!(path.is_file(), "Expected file to exist: {}", path.display());
}

pub fn assert_dir_exists(path: &Path) {
    assert!(path.is_dir(), "Expected directory to exist: {}", path.display());
}
