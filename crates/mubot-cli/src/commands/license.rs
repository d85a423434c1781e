//! License command implementation.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use mubot::{DEFAULT_LICENSE_PATHS, LicenseFile, LicenseStatus};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use super::load_config;

/// Candidate paths in search order: explicit path, configured path, defaults.
pub fn candidates(explicit: Option<&Path>, configured: Option<&Path>) -> Vec<PathBuf> {
    match explicit.or(configured) {
        Some(path) => vec![path.to_path_buf()],
        None => DEFAULT_LICENSE_PATHS.iter().map(PathBuf::from).collect(),
    }
}

/// Print the state of the license that `run` would use.
pub fn check(config_path: &Path, path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let paths = candidates(path, config.license_path.as_deref());

    let (license, found) = match LicenseFile::discover(&paths) {
        Ok(found) => found,
        Err(e) => {
            println!("{} {}", "License:".bold(), "missing".red());
            println!("  {}", e);
            return Ok(());
        }
    };

    let status = LicenseStatus::check(&license);
    let state = if status.permits_running() {
        status.describe().green().to_string()
    } else {
        status.describe().red().to_string()
    };
    println!("{} {}", "License:".bold(), state);
    println!("  File:    {}", found.display());
    println!("  Holder:  {}", license.holder);
    println!("  Expires: {}", license.expires);
    Ok(())
}

/// Write a new license file.
pub fn issue(path: Option<&Path>, holder: &str, expires: &str) -> Result<()> {
    let expires = NaiveDate::parse_from_str(expires, "%Y-%m-%d")
        .with_context(|| format!("Invalid expiry date {expires:?}, expected YYYY-MM-DD"))?;
    let path = path.unwrap_or(Path::new(DEFAULT_LICENSE_PATHS[0]));

    LicenseFile::new(holder, expires).save(path)?;
    println!("Wrote license for {} (expires {}) to {}", holder, expires, path.display());
    Ok(())
}
