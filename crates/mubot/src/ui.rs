//! Contract between the worker and whatever front end drives it.
//!
//! Front ends send [`UiCommand`]s and read [`DisplayState`] copies. They never
//! see the process handle.

use std::fmt;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::behavior::{BehaviorKind, Combo, Mode, Skill, Switches};
use crate::game::{Snapshot, Target};
use crate::license::LicenseStatus;
use crate::recorder::ExportFormat;
use crate::stats::Statistics;

/// Journal lines carried in each [`DisplayState`].
pub const DISPLAY_JOURNAL_LINES: usize = 20;

/// A user intent, applied by the worker between ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    ToggleBehavior(BehaviorKind),
    SetBehavior(BehaviorKind, bool),
    ToggleMode(Mode),
    SetMode(Mode, bool),
    SetThreshold(Threshold, i32),
    AddSkill(Skill),
    RemoveSkill(usize),
    ClearSkills,
    AddCombo(Combo),
    RemoveCombo(usize),
    ClearCombos,
    ClearStats,
    ExportSession(ExportFormat),
    /// Drop everything the recorder has collected so far.
    ClearRecording,
    ToggleLearning,
    /// Drop the current handle and attach again on the next tick.
    Reattach,
    /// Ask for confirmation before running an [`ActionId`].
    RequestConfirm(ActionId),
    Confirm,
    Cancel,
    Shutdown,
}

/// Tunable integer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Threshold {
    ResetLevel,
    HealthPotPercent,
    ManaPotPercent,
    ShieldPercent,
    FarmRange,
}

impl Threshold {
    /// Smallest and largest accepted value.
    pub fn bounds(self) -> (i32, i32) {
        match self {
            Self::ResetLevel => (1, i32::MAX),
            Self::HealthPotPercent | Self::ManaPotPercent | Self::ShieldPercent => (0, 100),
            Self::FarmRange => (0, i32::MAX),
        }
    }
}

static CLEAR_STATS: [UiCommand; 1] = [UiCommand::ClearStats];
static STOP_ALL: [UiCommand; 2] = [
    UiCommand::SetMode(Mode::Pve, false),
    UiCommand::SetMode(Mode::Pvp, false),
];
static QUIT: [UiCommand; 3] = [
    UiCommand::SetMode(Mode::Pve, false),
    UiCommand::SetMode(Mode::Pvp, false),
    UiCommand::Shutdown,
];

/// Actions that need a confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ActionId {
    ClearStats,
    StopAll,
    Quit,
}

impl ActionId {
    pub fn prompt(self) -> &'static str {
        match self {
            Self::ClearStats => "Clear all session statistics?",
            Self::StopAll => "Disable PvE and PvP automation?",
            Self::Quit => "Stop automation and quit?",
        }
    }

    /// Commands applied, in order, once the action is confirmed.
    pub fn commands(self) -> &'static [UiCommand] {
        match self {
            Self::ClearStats => &CLEAR_STATS,
            Self::StopAll => &STOP_ALL,
            Self::Quit => &QUIT,
        }
    }
}

/// At most one action waits for confirmation at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PendingAction {
    #[default]
    None,
    Pending { message: String, action: ActionId },
}

impl PendingAction {
    pub fn request(action: ActionId) -> Self {
        Self::Pending {
            message: action.prompt().to_string(),
            action,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Pending { message, .. } => Some(message),
        }
    }

    /// Resolve the pending action, leaving nothing pending.
    pub fn confirm(&mut self) -> Option<ActionId> {
        match std::mem::take(self) {
            Self::None => None,
            Self::Pending { action, .. } => Some(action),
        }
    }

    /// Returns whether something was pending.
    pub fn cancel(&mut self) -> bool {
        !matches!(std::mem::take(self), Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AttachStatus {
    #[default]
    Detached,
    Attached {
        pid: u32,
        name: String,
    },
    Failed(String),
}

impl AttachStatus {
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached { .. })
    }
}

impl fmt::Display for AttachStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached => write!(f, "not attached"),
            Self::Attached { pid, name } => write!(f, "attached to {name} (PID {pid})"),
            Self::Failed(message) => write!(f, "attach failed: {message}"),
        }
    }
}

/// Read-only view published by the worker after every tick.
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    pub snapshot: Snapshot,
    pub stats: Statistics,
    /// Most recent journal lines, oldest first.
    pub journal: Vec<String>,
    pub license: LicenseStatus,
    pub switches: Switches,
    pub target: Option<Target>,
    pub attach: AttachStatus,
    pub learning: bool,
    pub pending: Option<String>,
}

impl DisplayState {
    /// One-line summary for terminal front ends.
    pub fn status_line(&self) -> String {
        let player = &self.snapshot.player;
        let vitals = if self.snapshot.is_valid() {
            format!(
                "{} Lv.{} HP {}/{} MP {}/{}",
                player.name,
                player.level,
                player.health,
                player.max_health,
                player.mana,
                player.max_mana
            )
        } else {
            "no data".to_string()
        };
        let modes: Vec<String> = Mode::iter()
            .filter(|mode| self.switches.mode(*mode))
            .map(|mode| mode.to_string())
            .collect();
        let modes = if modes.is_empty() {
            "idle".to_string()
        } else {
            modes.join("+")
        };
        let target = self
            .target
            .as_ref()
            .map(|t| format!(" | target {}", t.name))
            .unwrap_or_default();

        format!("[{}] {} | {}{}", self.attach, vitals, modes, target)
    }
}
