use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "safeguard=info,safeguard_core=info";

/// Directory the log file lives in. The terminal belongs to the UI, so
/// logs never go to stdout or stderr.
pub fn log_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?;
    Ok(data_dir.join("safeguard"))
}

/// Route `tracing` output to `<data dir>/safeguard/safeguard.log`.
/// `RUST_LOG` overrides the default filter.
pub fn init() -> Result<PathBuf> {
    let dir = log_dir()?;
    fs::create_dir_all(&dir)?;
    let path = dir.join("safeguard.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))?;

    Ok(path)
}
