//! Diagnostic tracing for the terminal UI.
//!
//! The chat panel owns the terminal, so traces only go to a file named by
//! `SIDECHAT_LOG`. Without it no subscriber is installed and the `tracing`
//! macros are no-ops.

use crate::core::constants::DIAGNOSTICS_ENV_VAR;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "sidechat=info";

pub fn init() -> std::io::Result<()> {
    match std::env::var_os(DIAGNOSTICS_ENV_VAR) {
        Some(path) if !path.is_empty() => init_to_file(Path::new(&path)),
        _ => Ok(()),
    }
}

pub fn init_to_file(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}
