//! Shared filesystem utilities.

pub mod paths;
pub mod temp;

pub use paths::{absolute, canonical, copy_file_overwrite, ensure_dir_exists};
pub use temp::WorkDir;
