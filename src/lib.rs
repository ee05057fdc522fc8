//! Builder for the JJS problem build environment.
//!
//! Produces the directory that problem compilation and import expect to find
//! JJS binaries in: `bin/svaluer` built with cargo, plus the JTL install tree
//! produced by CMake.

pub mod build;
pub mod common;
pub mod component;
pub mod config;
pub mod interrupt;
pub mod preflight;
pub mod process;
pub mod timing;

pub use build::{run, BuildReport};
pub use component::{Component, ComponentFilter};
pub use config::{Config, PrefixMode, Toolchain};
