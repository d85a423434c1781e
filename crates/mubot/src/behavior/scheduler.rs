use std::time::{Duration, Instant};

use strum::IntoEnumIterator;

use crate::behavior::BehaviorKind;

/// Cooldown state of one behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub kind: BehaviorKind,
    pub interval: Duration,
    pub last_action: Option<Instant>,
    pub enabled: bool,
}

impl Slot {
    /// Whether the cooldown has elapsed at `now`. A slot that never acted is due.
    pub fn is_due(&self, now: Instant) -> bool {
        self.last_action
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }
}

/// One slot per behavior, kept in evaluation order.
#[derive(Debug, Clone)]
pub struct Scheduler {
    slots: Vec<Slot>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            slots: BehaviorKind::iter()
                .map(|kind| Slot {
                    kind,
                    interval: kind.default_interval(),
                    last_action: None,
                    enabled: false,
                })
                .collect(),
        }
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, kind: BehaviorKind) -> &Slot {
        &self.slots[kind.index()]
    }

    pub fn is_enabled(&self, kind: BehaviorKind) -> bool {
        self.slot(kind).enabled
    }

    /// Returns whether the flag changed.
    pub fn set_enabled(&mut self, kind: BehaviorKind, enabled: bool) -> bool {
        let slot = &mut self.slots[kind.index()];
        let changed = slot.enabled != enabled;
        slot.enabled = enabled;
        changed
    }

    pub fn is_due(&self, kind: BehaviorKind, now: Instant) -> bool {
        self.slot(kind).is_due(now)
    }

    /// Record an attempted action.
    pub fn mark(&mut self, kind: BehaviorKind, now: Instant) {
        self.slots[kind.index()].last_action = Some(now);
    }

    pub fn last_action(&self, kind: BehaviorKind) -> Option<Instant> {
        self.slot(kind).last_action
    }
}
