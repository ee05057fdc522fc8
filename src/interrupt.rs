//! SIGINT/SIGTERM handling.
//!
//! The handlers only set a flag. The process then unwinds through the
//! orchestrator like any other failure, so the owned work directory is removed.
//! A foreground child gets the terminal's SIGINT itself; the flag is checked
//! around every child run.

use anyhow::{Context, Result};
use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// The run was stopped by a signal.
#[derive(Debug, thiserror::Error)]
#[error("interrupted by signal {signal}")]
pub struct Interrupted {
    pub signal: i32,
}

impl Interrupted {
    /// Shell convention: `128 + signo`.
    pub fn exit_code(&self) -> i32 {
        128 + self.signal
    }
}

struct Flags {
    int: Arc<AtomicBool>,
    term: Arc<AtomicBool>,
}

static FLAGS: OnceLock<Flags> = OnceLock::new();

/// Replace the default (terminating) action for SIGINT and SIGTERM.
pub fn install() -> Result<()> {
    let flags = FLAGS.get_or_init(|| Flags {
        int: Arc::new(AtomicBool::new(false)),
        term: Arc::new(AtomicBool::new(false)),
    });
    signal_hook::flag::register(SIGINT, Arc::clone(&flags.int))
        .context("Failed to install SIGINT handler")?;
    signal_hook::flag::register(SIGTERM, Arc::clone(&flags.term))
        .context("Failed to install SIGTERM handler")?;
    Ok(())
}

/// Signal received since `install`, if any.
pub fn pending() -> Option<i32> {
    let flags = FLAGS.get()?;
    if flags.int.load(Ordering::SeqCst) {
        Some(SIGINT)
    } else if flags.term.load(Ordering::SeqCst) {
        Some(SIGTERM)
    } else {
        None
    }
}

/// Fail with [`Interrupted`] if a signal arrived.
pub fn check() -> Result<()> {
    match pending() {
        Some(signal) => {
            log::debug!("signal {} received, stopping", signal);
            Err(Interrupted { signal }.into())
        }
        None => Ok(()),
    }
}
