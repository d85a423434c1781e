//! Status command implementation.

use anyhow::Result;
use mubot::{OffsetTable, StatusInfo, load_offsets};
use owo_colors::OwoColorize;
use std::path::Path;
use tracing::warn;

use super::{attach, load_config};

/// Attach once and print what the offset table decodes to.
pub fn run(config_path: &Path, pid: Option<u32>) -> Result<()> {
    let config = load_config(config_path)?;
    let offsets = match load_offsets(&config.offsets_path) {
        Ok(offsets) => offsets,
        Err(e) => {
            warn!(
                "Failed to load offsets from {}: {}",
                config.offsets_path.display(),
                e
            );
            OffsetTable::default()
        }
    };

    let process = attach(&config, pid)?;
    let status = StatusInfo::collect(&process, &offsets);

    println!("{}", "=== mubot status ===".bold());
    println!("Process:  {} (PID {})", process.name, process.pid);
    println!("Base:     0x{:X}", status.base_address);
    println!(
        "Offsets:  {} [{}]",
        status.offsets_version,
        if status.offsets_valid {
            "valid".green().to_string()
        } else {
            "incomplete".red().to_string()
        }
    );

    println!();
    for region in &status.regions {
        let state = if region.readable {
            "readable".green().to_string()
        } else {
            "unreadable".red().to_string()
        };
        println!("  {:<9} 0x{:08X}  {}", region.name, region.address, state);
    }

    let snapshot = &status.snapshot;
    println!();
    if !snapshot.is_valid() {
        println!("{}", "Player data could not be read".yellow());
        return Ok(());
    }

    let player = &snapshot.player;
    println!(
        "Player:   {} Lv.{} at ({}, {})",
        player.name.bold(),
        player.level,
        player.position.x,
        player.position.y
    );
    println!(
        "Health:   {}/{}   Mana: {}/{}",
        player.health, player.max_health, player.mana, player.max_mana
    );
    println!("Entities: {}", snapshot.entities.len());
    for entity in &snapshot.entities {
        println!(
            "  {:<8} {:<24} Lv.{:<4} HP {}/{}  dist {:.1}",
            entity.kind.dimmed(),
            entity.name,
            entity.level,
            entity.health,
            entity.max_health,
            entity.distance
        );
    }
    if !snapshot.fallen.is_empty() {
        println!("Fallen:   {}", snapshot.fallen.join(", "));
    }
    println!("Items:    {}", snapshot.items.len());
    for item in &snapshot.items {
        println!("  {} at ({}, {})", item.name, item.position.x, item.position.y);
    }

    Ok(())
}
