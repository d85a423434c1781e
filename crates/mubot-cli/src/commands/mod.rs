//! CLI command implementations.

pub mod hex_utils;
pub mod hexdump;
pub mod init;
pub mod license;
pub mod run;
pub mod status;

use anyhow::Result;
use mubot::{Config, ProcessHandle, ProcessLocator};
use std::path::Path;
use tracing::info;

/// Load the configuration; a missing file yields defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = Config::load(path)?;
    info!("Using configuration {}", path.display());
    Ok(config)
}

/// Attach by PID, or to the first process matching the configured names.
pub fn attach(config: &Config, pid: Option<u32>) -> Result<ProcessHandle> {
    let handle = match pid {
        Some(pid) => ProcessHandle::open(pid, &format!("PID {pid}"))?,
        None => ProcessLocator::new(config.process_names.iter().cloned()).attach()?,
    };
    Ok(handle)
}
