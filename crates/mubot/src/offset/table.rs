//! Versioned offset table describing where game state lives in memory.
//!
//! The table is configuration: it is loaded from a JSON file and never
//! derived at runtime. Field offsets are relative to the start of their
//! structure; the structure bases are absolute, or relative to the main module
//! when `module_relative` is set.

use serde::{Deserialize, Serialize};

/// Local player structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerLayout {
    pub base: u64,
    pub name: u64,
    pub name_len: usize,
    pub level: u64,
    pub health: u64,
    pub max_health: u64,
    pub mana: u64,
    pub max_mana: u64,
    pub pos_x: u64,
    pub pos_y: u64,
}

/// Nearby characters (monsters and rival players).
///
/// `list` points at an `i32` entry count; entries follow inline at
/// `list + array`, `stride` bytes apart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityLayout {
    pub list: u64,
    pub array: u64,
    pub stride: u64,
    pub name: u64,
    pub name_len: usize,
    pub level: u64,
    pub health: u64,
    pub max_health: u64,
    pub pos_x: u64,
    pub pos_y: u64,
    /// Liveness flag (`u8`, non-zero = alive).
    pub alive: u64,
    /// Entity kind (`u8`, 0 = monster, 1 = player).
    pub kind: u64,
}

/// Items lying on the ground. Same list shape as [`EntityLayout`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemLayout {
    pub list: u64,
    pub array: u64,
    pub stride: u64,
    pub name: u64,
    pub name_len: usize,
    pub pos_x: u64,
    pub pos_y: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetTable {
    /// Game client build the offsets were taken from.
    pub version: String,
    pub module_relative: bool,
    pub player: PlayerLayout,
    pub entities: EntityLayout,
    pub items: ItemLayout,
}

impl OffsetTable {
    /// A table can be used once it names a version and a player structure.
    pub fn is_valid(&self) -> bool {
        !self.version.is_empty() && self.player.base != 0
    }

    pub fn has_entities(&self) -> bool {
        self.entities.list != 0 && self.entities.stride != 0
    }

    pub fn has_items(&self) -> bool {
        self.items.list != 0 && self.items.stride != 0
    }

    /// Turn a table address into an absolute one.
    pub fn resolve(&self, address: u64, module_base: u64) -> u64 {
        if self.module_relative {
            module_base.wrapping_add(address)
        } else {
            address
        }
    }

    /// Starting point for a hand-built table: plausible field offsets, fixed
    /// placeholder bases that must be replaced for a real client build.
    pub fn template() -> Self {
        Self {
            version: "unversioned".to_string(),
            module_relative: false,
            player: PlayerLayout {
                base: 0x0040_0000,
                name: 0x00,
                name_len: 32,
                level: 0x20,
                health: 0x24,
                max_health: 0x28,
                mana: 0x2C,
                max_mana: 0x30,
                pos_x: 0x34,
                pos_y: 0x38,
            },
            entities: EntityLayout {
                list: 0x0050_0000,
                array: 0x10,
                stride: 0x60,
                name: 0x00,
                name_len: 32,
                level: 0x20,
                health: 0x24,
                max_health: 0x28,
                pos_x: 0x2C,
                pos_y: 0x30,
                alive: 0x34,
                kind: 0x35,
            },
            items: ItemLayout {
                list: 0x0060_0000,
                array: 0x10,
                stride: 0x40,
                name: 0x00,
                name_len: 32,
                pos_x: 0x20,
                pos_y: 0x24,
            },
        }
    }
}
