use std::time::Duration;

use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// Behavior groups with a master switch each.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumIter, EnumCount, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Mode {
    #[strum(serialize = "PvE")]
    Pve,
    #[strum(serialize = "PvP")]
    Pvp,
}

impl Mode {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Config key of the master switch.
    pub fn config_key(self) -> &'static str {
        match self {
            Self::Pve => "pve_enabled",
            Self::Pvp => "pvp_enabled",
        }
    }
}

/// Every behavior, in evaluation order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumIter,
    EnumCount,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum BehaviorKind {
    #[strum(to_string = "Auto Farm", serialize = "farm")]
    Farm,
    #[strum(to_string = "Auto Reset", serialize = "reset")]
    Reset,
    #[strum(to_string = "Collect Items", serialize = "collect")]
    CollectItems,
    #[strum(to_string = "Auto Pot", serialize = "pot")]
    AutoPot,
    #[strum(to_string = "Skill Cycle", serialize = "skills")]
    SkillCycle,
    #[strum(to_string = "Auto Target", serialize = "target")]
    AutoTarget,
    #[strum(to_string = "Auto Shield", serialize = "shield")]
    AutoShield,
    #[strum(to_string = "Combo Cycle", serialize = "combos")]
    ComboCycle,
}

impl BehaviorKind {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn mode(self) -> Mode {
        match self {
            Self::Farm | Self::Reset | Self::CollectItems | Self::AutoPot | Self::SkillCycle => {
                Mode::Pve
            }
            Self::AutoTarget | Self::AutoShield | Self::ComboCycle => Mode::Pvp,
        }
    }

    /// Minimum time between two actions.
    pub fn default_interval(self) -> Duration {
        match self {
            Self::Farm => Duration::from_millis(500),
            Self::Reset => Duration::from_secs(10),
            Self::CollectItems => Duration::from_secs(2),
            Self::AutoPot => Duration::from_secs(1),
            // Each skill carries its own delay.
            Self::SkillCycle => Duration::ZERO,
            Self::AutoTarget => Duration::from_millis(500),
            Self::AutoShield => Duration::from_millis(200),
            Self::ComboCycle => Duration::from_secs(2),
        }
    }

    pub fn config_key(self) -> &'static str {
        match self {
            Self::Farm => "auto_farm",
            Self::Reset => "auto_reset",
            Self::CollectItems => "auto_collect",
            Self::AutoPot => "auto_pot",
            Self::SkillCycle => "skill_cycle",
            Self::AutoTarget => "auto_target",
            Self::AutoShield => "auto_shield",
            Self::ComboCycle => "combo_cycle",
        }
    }
}
