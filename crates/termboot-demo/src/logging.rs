#![forbid(unsafe_code)]

//! Diagnostics logging.
//!
//! The screen owns the terminal, so logs only go to a file. Filtering follows
//! `RUST_LOG`; without it the boot runtime logs at debug and everything else
//! at warn.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,termboot_runtime=debug,termboot_demo=debug";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global subscriber writing plain-text lines to `path`.
///
/// # Errors
///
/// Fails if the file cannot be created or a global subscriber is already set.
pub fn init_file_logging(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(io::Error::other)
}
