//! Point-in-time views of game state.
//!
//! A [`Snapshot`] is rebuilt every poll tick and never mutated afterwards;
//! the next tick supersedes it.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    pub fn distance_to(&self, other: Position) -> f32 {
        let dx = self.x as f32 - other.x as f32;
        let dy = self.y as f32 - other.y as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// `value` as a percentage of `max`, or `None` when `max` is not positive.
///
/// Saturates at the `i32` range for readings far above `max`.
pub fn percent(value: i32, max: i32) -> Option<i32> {
    if max <= 0 {
        return None;
    }
    let scaled = i64::from(value) * 100 / i64::from(max);
    Some(scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub level: i32,
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub position: Position,
    /// Cleared when the data could not be read this tick.
    pub valid: bool,
}

impl PlayerSnapshot {
    pub fn health_percent(&self) -> Option<i32> {
        percent(self.health, self.max_health)
    }

    pub fn mana_percent(&self) -> Option<i32> {
        percent(self.mana, self.max_mana)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, IntoStaticStr,
)]
pub enum EntityKind {
    #[default]
    Monster,
    /// Another player character.
    Player,
}

impl EntityKind {
    /// Decode the kind byte from memory. Unknown values are treated as monsters.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Player,
            _ => Self::Monster,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityInfo {
    pub name: String,
    pub kind: EntityKind,
    pub level: i32,
    pub health: i32,
    pub max_health: i32,
    pub position: Position,
    /// Distance to the player at the time of the read.
    pub distance: f32,
    pub alive: bool,
}

impl EntityInfo {
    pub fn health_percent(&self) -> Option<i32> {
        percent(self.health, self.max_health)
    }
}

/// The rival currently tracked by PvP behaviors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub position: Position,
}

impl Target {
    pub fn health_percent(&self) -> Option<i32> {
        percent(self.health, self.max_health)
    }
}

impl From<&EntityInfo> for Target {
    fn from(entity: &EntityInfo) -> Self {
        Self {
            name: entity.name.clone(),
            health: entity.health,
            max_health: entity.max_health,
            position: entity.position,
        }
    }
}

/// An item seen on the ground during one polling interval.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemSighting {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub player: PlayerSnapshot,
    /// Entities alive as of this read. Never holds a dead entry.
    pub entities: Vec<EntityInfo>,
    pub items: Vec<ItemSighting>,
    /// Names of list entries whose liveness flag was clear this read.
    pub fallen: Vec<String>,
    /// Wall-clock time of the read; `None` for stale snapshots.
    pub taken_at: Option<DateTime<Local>>,
}

impl Snapshot {
    pub fn is_valid(&self) -> bool {
        self.player.valid
    }

    /// Valid data with a living player: the precondition for every behavior.
    pub fn is_actionable(&self) -> bool {
        self.player.valid && self.player.is_alive()
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &EntityInfo> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    /// Closest entity of the given kind. Ties keep the earlier entry.
    pub fn nearest(&self, kind: EntityKind) -> Option<&EntityInfo> {
        self.of_kind(kind).fold(None, |best: Option<&EntityInfo>, e| match best {
            Some(b) if b.distance <= e.distance => Some(b),
            _ => Some(e),
        })
    }

    pub fn find(&self, name: &str) -> Option<&EntityInfo> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn has_fallen(&self, name: &str) -> bool {
        self.fallen.iter().any(|n| n == name)
    }
}
