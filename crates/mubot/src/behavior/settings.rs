//! Behavior tuning: thresholds, keys, skills and combos.

use std::time::{Duration, Instant};

use strum::EnumCount;

use crate::behavior::{BehaviorKind, Mode};
use crate::input::{ComboStep, KeyCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub name: String,
    pub key: KeyCode,
    /// Minimum time between two casts of this skill.
    pub delay: Duration,
    pub last_used: Option<Instant>,
}

impl Skill {
    pub fn new(name: impl Into<String>, key: KeyCode, delay: Duration) -> Self {
        Self {
            name: name.into(),
            key,
            delay,
            last_used: None,
        }
    }

    pub fn is_ready(&self, now: Instant) -> bool {
        self.last_used
            .is_none_or(|last| now.saturating_duration_since(last) >= self.delay)
    }
}

/// A named key sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combo {
    pub name: String,
    pub steps: Vec<ComboStep>,
}

impl Combo {
    pub fn new(name: impl Into<String>, steps: Vec<ComboStep>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// The same delay after every key.
    pub fn uniform(name: impl Into<String>, keys: &[KeyCode], delay: Duration) -> Self {
        Self::new(
            name,
            keys.iter().map(|key| ComboStep::new(*key, delay)).collect(),
        )
    }
}

/// Mode master switches and per-behavior flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Switches {
    modes: [bool; Mode::COUNT],
    behaviors: [bool; BehaviorKind::COUNT],
}

impl Switches {
    pub fn mode(&self, mode: Mode) -> bool {
        self.modes[mode.index()]
    }

    pub fn set_mode(&mut self, mode: Mode, enabled: bool) {
        self.modes[mode.index()] = enabled;
    }

    pub fn behavior(&self, kind: BehaviorKind) -> bool {
        self.behaviors[kind.index()]
    }

    pub fn set_behavior(&mut self, kind: BehaviorKind, enabled: bool) {
        self.behaviors[kind.index()] = enabled;
    }

    /// Behavior flag and its mode switch both on.
    pub fn is_active(&self, kind: BehaviorKind) -> bool {
        self.mode(kind.mode()) && self.behavior(kind)
    }

    /// Turn every mode switch off, leaving behavior flags untouched.
    pub fn clear_modes(&mut self) {
        self.modes = [false; Mode::COUNT];
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PveTuning {
    pub reset_level: i32,
    pub health_pot_percent: i32,
    pub mana_pot_percent: i32,
    /// Maximum distance to a monster worth attacking; 0 means any.
    pub farm_range: i32,
    pub attack_key: KeyCode,
    pub reset_key: KeyCode,
    pub confirm_key: KeyCode,
    /// Pause between opening the reset dialog and confirming it.
    pub reset_confirm_delay: Duration,
    pub pickup_key: KeyCode,
    pub health_pot_key: KeyCode,
    pub mana_pot_key: KeyCode,
}

impl Default for PveTuning {
    fn default() -> Self {
        Self {
            reset_level: 400,
            health_pot_percent: 30,
            mana_pot_percent: 20,
            farm_range: 0,
            attack_key: KeyCode::SPACE,
            reset_key: KeyCode::F10,
            confirm_key: KeyCode::ENTER,
            reset_confirm_delay: Duration::from_millis(1000),
            pickup_key: KeyCode::ALT,
            health_pot_key: KeyCode::F1,
            mana_pot_key: KeyCode::F2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PvpTuning {
    pub shield_percent: i32,
    pub shield_key: KeyCode,
    /// Pressed when a new rival is tracked, if set.
    pub target_key: Option<KeyCode>,
}

impl Default for PvpTuning {
    fn default() -> Self {
        Self {
            shield_percent: 50,
            shield_key: KeyCode::F3,
            target_key: None,
        }
    }
}
