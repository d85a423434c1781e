//! Hexdump command implementation.
//!
//! Prints raw bytes from the attached process, for locating structures when
//! building an offset table.

use anyhow::Result;
use mubot::MemoryDump;
use std::path::Path;

use super::{attach, load_config};

/// Run the hexdump command
pub fn run(config_path: &Path, address: u64, size: usize, ascii: bool, pid: Option<u32>) -> Result<()> {
    let config = load_config(config_path)?;
    let process = attach(&config, pid)?;
    let dump = MemoryDump::capture(&process, address, size)?;

    println!("Hexdump at 0x{:X} ({} bytes):", address, size);
    println!();
    print!("{}", dump.to_hexdump(ascii));

    Ok(())
}
