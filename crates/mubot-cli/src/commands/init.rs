//! Init command implementation.

use anyhow::{Result, bail};
use mubot::{Config, OffsetTable, save_offsets};
use std::path::Path;

/// Write a sample configuration and an offset table template next to it.
pub fn run(config_path: &Path, force: bool) -> Result<()> {
    let config = Config::sample();

    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    config.save(config_path)?;
    println!("Wrote {}", config_path.display());

    if config.offsets_path.exists() && !force {
        println!(
            "Kept existing {} (use --force to overwrite)",
            config.offsets_path.display()
        );
    } else {
        save_offsets(&config.offsets_path, &OffsetTable::template())?;
        println!(
            "Wrote {} (template: replace the base addresses for your client build)",
            config.offsets_path.display()
        );
    }

    Ok(())
}
