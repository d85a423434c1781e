//! Session counters.

use serde::Serialize;
use tracing::debug;

use crate::game::{Snapshot, Target};

/// Accumulated since start or the last [`StatsTracker::clear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Statistics {
    /// Sum of observed health drops of the tracked rival.
    pub damage_dealt: u64,
    pub wins: u32,
    pub deaths: u32,
    pub combos: u32,
    pub skills: u32,
    pub potions: u32,
    pub resets: u32,
}

/// Derives [`Statistics`] from consecutive snapshots.
///
/// Owned by the polling thread; readers receive copies.
#[derive(Debug, Default)]
pub struct StatsTracker {
    stats: Statistics,
    last_health: Option<i32>,
    last_target: Option<(String, i32)>,
    credited_win: Option<String>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Statistics {
        self.stats
    }

    /// Compare `snapshot` with the previous one. Stale snapshots are ignored.
    pub fn observe(&mut self, snapshot: &Snapshot, target: Option<&Target>) {
        if !snapshot.is_valid() {
            return;
        }

        let health = snapshot.player.health;
        if self.last_health.is_some_and(|prev| prev > 0) && health <= 0 {
            self.stats.deaths += 1;
            debug!("Death recorded ({} total)", self.stats.deaths);
        }
        self.last_health = Some(health);

        let Some(target) = target else {
            self.last_target = None;
            self.credited_win = None;
            return;
        };

        if self.credited_win.as_deref() != Some(target.name.as_str()) {
            self.credited_win = None;
        }

        if snapshot.has_fallen(&target.name) {
            if self.credited_win.is_none() {
                self.stats.wins += 1;
                self.credited_win = Some(target.name.clone());
                debug!("Win recorded against {}", target.name);
            }
            self.last_target = None;
            return;
        }

        // Standing again after a credited fall: a later fall is a new win.
        self.credited_win = None;

        let current = snapshot
            .find(&target.name)
            .map_or(target.health, |entity| entity.health);
        if let Some((name, prev)) = &self.last_target
            && *name == target.name
            && current < *prev
        {
            self.stats.damage_dealt += (i64::from(*prev) - i64::from(current)) as u64;
        }
        self.last_target = Some((target.name.clone(), current));
    }

    pub fn record_combo(&mut self) {
        self.stats.combos += 1;
    }

    pub fn record_skill(&mut self) {
        self.stats.skills += 1;
    }

    pub fn record_potion(&mut self) {
        self.stats.potions += 1;
    }

    pub fn record_reset(&mut self) {
        self.stats.resets += 1;
    }

    /// The only way counters go back to zero.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
