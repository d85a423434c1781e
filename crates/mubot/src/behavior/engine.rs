use std::time::Instant;

use strum::{EnumCount, IntoEnumIterator};
use tracing::{debug, warn};

use crate::behavior::{
    BehaviorKind, Combo, Mode, PveTuning, PvpTuning, Rotation, Scheduler, Skill, Switches,
};
use crate::config::Config;
use crate::error::Result;
use crate::game::{EntityKind, Snapshot, Target};
use crate::input::{ComboStep, InputActuator};
use crate::journal::Journal;
use crate::stats::{Statistics, StatsTracker};

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

/// Evaluates every enabled behavior against the latest snapshot.
///
/// Lives on the polling thread. Behaviors run in [`BehaviorKind`] order, so
/// later ones observe what earlier ones did during the same tick.
#[derive(Debug)]
pub struct BehaviorLoop {
    pve: PveTuning,
    pvp: PvpTuning,
    scheduler: Scheduler,
    modes: [bool; Mode::COUNT],
    skills: Rotation<Skill>,
    combos: Rotation<Combo>,
    target: Option<Target>,
    stats: StatsTracker,
}

impl BehaviorLoop {
    pub fn new(config: &Config) -> Self {
        let mut scheduler = Scheduler::new();
        for kind in BehaviorKind::iter() {
            scheduler.set_enabled(kind, config.switches.behavior(kind));
        }
        let mut modes = [false; Mode::COUNT];
        for mode in Mode::iter() {
            modes[mode.index()] = config.switches.mode(mode);
        }

        Self {
            pve: config.pve.clone(),
            pvp: config.pvp.clone(),
            scheduler,
            modes,
            skills: Rotation::from(config.skills.clone()),
            combos: Rotation::from(config.combos.clone()),
            target: None,
            stats: StatsTracker::new(),
        }
    }

    /// Copy the runtime switches, tuning, skills and combos into `config`.
    pub fn store(&self, config: &mut Config) {
        config.switches = self.switches();
        config.pve = self.pve.clone();
        config.pvp = self.pvp.clone();
        config.skills = self.skills.items().to_vec();
        config.combos = self.combos.items().to_vec();
    }

    pub fn switches(&self) -> Switches {
        let mut switches = Switches::default();
        for mode in Mode::iter() {
            switches.set_mode(mode, self.modes[mode.index()]);
        }
        for kind in BehaviorKind::iter() {
            switches.set_behavior(kind, self.scheduler.is_enabled(kind));
        }
        switches
    }

    pub fn is_active(&self, kind: BehaviorKind) -> bool {
        self.modes[kind.mode().index()] && self.scheduler.is_enabled(kind)
    }

    pub fn mode_enabled(&self, mode: Mode) -> bool {
        self.modes[mode.index()]
    }

    /// Returns whether anything changed. Only a change is journaled.
    pub fn set_behavior_enabled(
        &mut self,
        kind: BehaviorKind,
        enabled: bool,
        journal: &Journal,
    ) -> bool {
        if !self.scheduler.set_enabled(kind, enabled) {
            return false;
        }
        if kind == BehaviorKind::AutoTarget && !enabled {
            self.target = None;
        }
        journal.log(format!("{} {}", kind, on_off(enabled)));
        true
    }

    pub fn set_mode_enabled(&mut self, mode: Mode, enabled: bool, journal: &Journal) -> bool {
        let slot = &mut self.modes[mode.index()];
        if *slot == enabled {
            return false;
        }
        *slot = enabled;
        if mode == Mode::Pvp && !enabled {
            self.target = None;
        }
        journal.log(format!("{} mode {}", mode, on_off(enabled)));
        true
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn pve(&self) -> &PveTuning {
        &self.pve
    }

    pub fn pve_mut(&mut self) -> &mut PveTuning {
        &mut self.pve
    }

    pub fn pvp(&self) -> &PvpTuning {
        &self.pvp
    }

    pub fn pvp_mut(&mut self) -> &mut PvpTuning {
        &mut self.pvp
    }

    pub fn skills(&self) -> &Rotation<Skill> {
        &self.skills
    }

    pub fn add_skill(&mut self, skill: Skill) {
        self.skills.push(skill);
    }

    pub fn remove_skill(&mut self, index: usize) -> Option<Skill> {
        self.skills.remove(index)
    }

    /// Returns how many skills were removed.
    pub fn clear_skills(&mut self) -> usize {
        let removed = self.skills.len();
        self.skills.clear();
        removed
    }

    pub fn combos(&self) -> &Rotation<Combo> {
        &self.combos
    }

    pub fn add_combo(&mut self, combo: Combo) {
        self.combos.push(combo);
    }

    pub fn remove_combo(&mut self, index: usize) -> Option<Combo> {
        self.combos.remove(index)
    }

    /// Returns how many combos were removed.
    pub fn clear_combos(&mut self) -> usize {
        let removed = self.combos.len();
        self.combos.clear();
        removed
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn stats(&self) -> Statistics {
        self.stats.snapshot()
    }

    pub fn clear_stats(&mut self) {
        self.stats.clear();
    }

    /// Run one evaluation pass. Returns the behaviors that acted, in order.
    pub fn tick(
        &mut self,
        now: Instant,
        snapshot: &Snapshot,
        actuator: &InputActuator,
        journal: &Journal,
    ) -> Vec<BehaviorKind> {
        self.stats.observe(snapshot, self.target.as_ref());
        self.follow_target(snapshot);

        let mut fired = Vec::new();
        if !snapshot.is_actionable() {
            return fired;
        }

        for kind in BehaviorKind::iter() {
            if !self.is_active(kind) || !self.scheduler.is_due(kind, now) {
                continue;
            }

            match self.run(kind, now, snapshot, actuator, journal) {
                Ok(false) => {}
                Ok(true) => {
                    self.scheduler.mark(kind, now);
                    fired.push(kind);
                }
                Err(e) => {
                    // The attempt still counts against the cooldown.
                    self.scheduler.mark(kind, now);
                    fired.push(kind);
                    warn!("{} failed: {}", kind, e);
                    journal.log(format!("{kind} failed: {e}"));
                }
            }
        }
        fired
    }

    /// Keep the tracked rival's vitals current between retargets.
    fn follow_target(&mut self, snapshot: &Snapshot) {
        if !snapshot.is_valid() {
            return;
        }
        if let Some(target) = self.target.as_mut()
            && let Some(entity) = snapshot.find(&target.name)
        {
            *target = Target::from(entity);
        }
    }

    fn run(
        &mut self,
        kind: BehaviorKind,
        now: Instant,
        snapshot: &Snapshot,
        actuator: &InputActuator,
        journal: &Journal,
    ) -> Result<bool> {
        match kind {
            BehaviorKind::Farm => self.farm(snapshot, actuator),
            BehaviorKind::Reset => self.reset(snapshot, actuator, journal),
            BehaviorKind::CollectItems => self.collect(snapshot, actuator, journal),
            BehaviorKind::AutoPot => self.auto_pot(snapshot, actuator, journal),
            BehaviorKind::SkillCycle => self.skill_cycle(now, actuator, journal),
            BehaviorKind::AutoTarget => self.auto_target(snapshot, actuator, journal),
            BehaviorKind::AutoShield => self.auto_shield(snapshot, actuator, journal),
            BehaviorKind::ComboCycle => self.combo_cycle(actuator, journal),
        }
    }

    fn farm(&mut self, snapshot: &Snapshot, actuator: &InputActuator) -> Result<bool> {
        let range = self.pve.farm_range;
        let Some(monster) = snapshot
            .of_kind(EntityKind::Monster)
            .find(|m| range <= 0 || m.distance <= range as f32)
        else {
            return Ok(false);
        };

        debug!("Attacking {} at distance {:.1}", monster.name, monster.distance);
        actuator.tap(self.pve.attack_key)?;
        Ok(true)
    }

    fn reset(
        &mut self,
        snapshot: &Snapshot,
        actuator: &InputActuator,
        journal: &Journal,
    ) -> Result<bool> {
        let level = snapshot.player.level;
        if self.pve.reset_level <= 0 || level < self.pve.reset_level {
            return Ok(false);
        }

        journal.log(format!("Auto Reset: level {level} reached"));
        actuator.sequence(&[
            ComboStep::new(self.pve.reset_key, self.pve.reset_confirm_delay),
            ComboStep::new(self.pve.confirm_key, std::time::Duration::ZERO),
        ])?;
        self.stats.record_reset();
        Ok(true)
    }

    fn collect(
        &mut self,
        snapshot: &Snapshot,
        actuator: &InputActuator,
        journal: &Journal,
    ) -> Result<bool> {
        if snapshot.items.is_empty() {
            return Ok(false);
        }

        journal.log(format!(
            "Collect Items: picking up {} item(s)",
            snapshot.items.len()
        ));
        actuator.tap(self.pve.pickup_key)?;
        Ok(true)
    }

    fn auto_pot(
        &mut self,
        snapshot: &Snapshot,
        actuator: &InputActuator,
        journal: &Journal,
    ) -> Result<bool> {
        let player = &snapshot.player;
        let health = player
            .health_percent()
            .filter(|pct| *pct < self.pve.health_pot_percent);
        let mana = player
            .mana_percent()
            .filter(|pct| *pct < self.pve.mana_pot_percent);
        if health.is_none() && mana.is_none() {
            return Ok(false);
        }

        let mut outcome = Ok(true);
        if let Some(pct) = health {
            journal.log(format!("Auto Pot: health potion at {pct}%"));
            match actuator.tap(self.pve.health_pot_key) {
                Ok(()) => self.stats.record_potion(),
                Err(e) => outcome = Err(e),
            }
        }
        if let Some(pct) = mana {
            journal.log(format!("Auto Pot: mana potion at {pct}%"));
            match actuator.tap(self.pve.mana_pot_key) {
                Ok(()) => self.stats.record_potion(),
                Err(e) if outcome.is_ok() => outcome = Err(e),
                Err(e) => warn!("Mana potion failed: {}", e),
            }
        }
        outcome
    }

    fn skill_cycle(
        &mut self,
        now: Instant,
        actuator: &InputActuator,
        journal: &Journal,
    ) -> Result<bool> {
        let Some(skill) = self.skills.current_mut() else {
            return Ok(false);
        };
        if !skill.is_ready(now) {
            return Ok(false);
        }

        skill.last_used = Some(now);
        let (name, key) = (skill.name.clone(), skill.key);
        self.skills.advance();

        journal.log(format!("Skill: {name}"));
        actuator.tap(key)?;
        self.stats.record_skill();
        Ok(true)
    }

    fn auto_target(
        &mut self,
        snapshot: &Snapshot,
        actuator: &InputActuator,
        journal: &Journal,
    ) -> Result<bool> {
        let tracked = self.target.as_ref().map(|t| t.name.clone());
        match (snapshot.nearest(EntityKind::Player), tracked) {
            (Some(nearest), Some(name)) if nearest.name == name => Ok(false),
            (Some(nearest), _) => {
                journal.log(format!(
                    "New target: {} ({:.0} away)",
                    nearest.name, nearest.distance
                ));
                self.target = Some(Target::from(nearest));
                if let Some(key) = self.pvp.target_key {
                    actuator.tap(key)?;
                }
                Ok(true)
            }
            (None, Some(name)) => {
                journal.log(format!("Target lost: {name}"));
                self.target = None;
                Ok(true)
            }
            (None, None) => Ok(false),
        }
    }

    fn auto_shield(
        &mut self,
        snapshot: &Snapshot,
        actuator: &InputActuator,
        journal: &Journal,
    ) -> Result<bool> {
        let Some(pct) = snapshot
            .player
            .health_percent()
            .filter(|pct| *pct < self.pvp.shield_percent)
        else {
            return Ok(false);
        };

        journal.log(format!("Auto Shield: health at {pct}%"));
        actuator.tap(self.pvp.shield_key)?;
        Ok(true)
    }

    fn combo_cycle(&mut self, actuator: &InputActuator, journal: &Journal) -> Result<bool> {
        if self.target.is_none() {
            return Ok(false);
        }
        let Some(combo) = self.combos.current() else {
            return Ok(false);
        };

        let (name, steps) = (combo.name.clone(), combo.steps.clone());
        self.combos.advance();

        journal.log(format!("Combo: {name}"));
        actuator.sequence(&steps)?;
        self.stats.record_combo();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EntityInfo, ItemSighting, Position};
    use crate::input::{KeyCode, RecordingSink};
    use std::time::Duration;

    struct Harness {
        behaviors: BehaviorLoop,
        sink: RecordingSink,
        actuator: InputActuator,
        journal: Journal,
    }

    impl Harness {
        fn new() -> Self {
            let mut config = Config::default();
            config.pve.reset_confirm_delay = Duration::ZERO;
            Self::with_config(&config)
        }

        fn with_config(config: &Config) -> Self {
            let sink = RecordingSink::new();
            Self {
                behaviors: BehaviorLoop::new(config),
                actuator: InputActuator::new(Box::new(sink.clone())).with_hold(Duration::ZERO),
                sink,
                journal: Journal::new(),
            }
        }

        fn enable(&mut self, kind: BehaviorKind) {
            self.behaviors.set_mode_enabled(kind.mode(), true, &self.journal);
            self.behaviors.set_behavior_enabled(kind, true, &self.journal);
        }

        fn tick(&mut self, now: Instant, snapshot: &Snapshot) -> Vec<BehaviorKind> {
            self.behaviors
                .tick(now, snapshot, &self.actuator, &self.journal)
        }
    }

    fn player(health: i32, mana: i32) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.player.valid = true;
        snapshot.player.name = "Hero".to_string();
        snapshot.player.level = 100;
        snapshot.player.health = health;
        snapshot.player.max_health = 100;
        snapshot.player.mana = mana;
        snapshot.player.max_mana = 100;
        snapshot
    }

    fn entity(name: &str, kind: EntityKind, distance: f32) -> EntityInfo {
        EntityInfo {
            name: name.to_string(),
            kind,
            health: 500,
            max_health: 1000,
            distance,
            alive: true,
            ..Default::default()
        }
    }

    #[test]
    fn low_health_taps_health_pot_once() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoPot);
        let now = Instant::now();

        let fired = h.tick(now, &player(25, 100));

        assert_eq!(fired, vec![BehaviorKind::AutoPot]);
        assert_eq!(h.sink.taps(), vec![KeyCode::F1]);
        assert_eq!(
            h.behaviors.scheduler().last_action(BehaviorKind::AutoPot),
            Some(now)
        );
        assert_eq!(h.behaviors.stats().potions, 1);
    }

    #[test]
    fn auto_pot_respects_cooldown() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoPot);
        let t0 = Instant::now();

        h.tick(t0, &player(25, 100));
        h.tick(t0 + Duration::from_millis(500), &player(25, 100));
        assert_eq!(h.sink.taps().len(), 1);

        h.tick(t0 + Duration::from_secs(1), &player(25, 100));
        assert_eq!(h.sink.taps().len(), 2);
    }

    #[test]
    fn auto_pot_uses_both_potions_when_both_low() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoPot);

        h.tick(Instant::now(), &player(10, 5));
        assert_eq!(h.sink.taps(), vec![KeyCode::F1, KeyCode::F2]);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoPot);

        assert!(h.tick(Instant::now(), &player(30, 20)).is_empty());
        assert!(h.sink.taps().is_empty());
    }

    #[test]
    fn zero_max_never_triggers_pot() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoPot);
        let mut snapshot = player(10, 10);
        snapshot.player.max_health = 0;
        snapshot.player.max_mana = 0;

        assert!(h.tick(Instant::now(), &snapshot).is_empty());
    }

    #[test]
    fn mode_switch_gates_behaviors() {
        let mut h = Harness::new();
        h.behaviors
            .set_behavior_enabled(BehaviorKind::AutoPot, true, &h.journal);

        assert!(h.tick(Instant::now(), &player(10, 100)).is_empty());
        assert!(h.sink.taps().is_empty());
    }

    #[test]
    fn stale_or_dead_player_does_nothing() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoPot);
        h.enable(BehaviorKind::AutoShield);

        let mut stale = player(10, 10);
        stale.player.valid = false;
        assert!(h.tick(Instant::now(), &stale).is_empty());

        assert!(h.tick(Instant::now(), &player(0, 10)).is_empty());
        assert!(h.sink.events().is_empty());
    }

    #[test]
    fn farm_attacks_monster_within_range() {
        let mut h = Harness::new();
        h.behaviors.pve_mut().farm_range = 10;
        h.enable(BehaviorKind::Farm);

        let mut far = player(100, 100);
        far.entities.push(entity("Goblin", EntityKind::Monster, 25.0));
        far.entities.push(entity("Rival", EntityKind::Player, 2.0));
        assert!(h.tick(Instant::now(), &far).is_empty());

        let mut near = far.clone();
        near.entities.push(entity("Orc", EntityKind::Monster, 4.0));
        assert_eq!(h.tick(Instant::now(), &near), vec![BehaviorKind::Farm]);
        assert_eq!(h.sink.taps(), vec![KeyCode::SPACE]);
    }

    #[test]
    fn reset_runs_open_then_confirm() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::Reset);

        let mut snapshot = player(100, 100);
        snapshot.player.level = 399;
        assert!(h.tick(Instant::now(), &snapshot).is_empty());

        snapshot.player.level = 400;
        h.tick(Instant::now(), &snapshot);
        assert_eq!(h.sink.taps(), vec![KeyCode::F10, KeyCode::ENTER]);
        assert_eq!(h.behaviors.stats().resets, 1);
    }

    #[test]
    fn collect_requires_items() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::CollectItems);

        let mut snapshot = player(100, 100);
        assert!(h.tick(Instant::now(), &snapshot).is_empty());

        snapshot.items.push(ItemSighting {
            name: "Jewel of Soul".to_string(),
            position: Position::new(1, 1),
        });
        h.tick(Instant::now(), &snapshot);
        assert_eq!(h.sink.taps(), vec![KeyCode::ALT]);
    }

    #[test]
    fn skills_cycle_with_own_delays() {
        let mut config = Config::default();
        config.skills = vec![
            Skill::new("A", KeyCode::F5, Duration::from_millis(1000)),
            Skill::new("B", KeyCode::F6, Duration::from_millis(1000)),
        ];
        let mut h = Harness::with_config(&config);
        h.enable(BehaviorKind::SkillCycle);
        let t0 = Instant::now();
        let snapshot = player(100, 100);

        h.tick(t0, &snapshot);
        h.tick(t0 + Duration::from_millis(100), &snapshot);
        // A is on cooldown again by the time the rotation returns to it.
        h.tick(t0 + Duration::from_millis(200), &snapshot);
        assert_eq!(h.sink.taps(), vec![KeyCode::F5, KeyCode::F6]);

        h.tick(t0 + Duration::from_millis(1000), &snapshot);
        assert_eq!(h.sink.taps(), vec![KeyCode::F5, KeyCode::F6, KeyCode::F5]);
        assert_eq!(h.behaviors.stats().skills, 3);
    }

    #[test]
    fn auto_target_tracks_nearest_rival_and_loses_it() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoTarget);
        let t0 = Instant::now();

        let mut snapshot = player(100, 100);
        snapshot.entities.push(entity("Far", EntityKind::Player, 20.0));
        snapshot.entities.push(entity("Near", EntityKind::Player, 5.0));
        snapshot.entities.push(entity("Goblin", EntityKind::Monster, 1.0));
        h.tick(t0, &snapshot);
        assert_eq!(h.behaviors.target().unwrap().name, "Near");

        // Same nearest rival: nothing to do.
        let fired = h.tick(t0 + Duration::from_secs(1), &snapshot);
        assert!(fired.is_empty());

        let empty = player(100, 100);
        h.tick(t0 + Duration::from_secs(2), &empty);
        assert!(h.behaviors.target().is_none());
        assert!(h.journal.tail(1)[0].ends_with("Target lost: Near"));
    }

    #[test]
    fn target_key_is_optional() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoTarget);
        let mut snapshot = player(100, 100);
        snapshot.entities.push(entity("Rival", EntityKind::Player, 5.0));

        h.tick(Instant::now(), &snapshot);
        assert!(h.sink.taps().is_empty());

        let mut h = Harness::new();
        h.behaviors.pvp_mut().target_key = Some(KeyCode(0x54));
        h.enable(BehaviorKind::AutoTarget);
        h.tick(Instant::now(), &snapshot);
        assert_eq!(h.sink.taps(), vec![KeyCode(0x54)]);
    }

    #[test]
    fn shield_below_threshold() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoShield);

        assert!(h.tick(Instant::now(), &player(50, 100)).is_empty());
        h.tick(Instant::now(), &player(49, 100));
        assert_eq!(h.sink.taps(), vec![KeyCode::F3]);
    }

    #[test]
    fn combo_needs_target_set_earlier_in_same_tick() {
        let mut config = Config::default();
        config.combos = vec![
            Combo::uniform("Ice", &[KeyCode::F7, KeyCode::F8], Duration::ZERO),
            Combo::uniform("Fire", &[KeyCode::F4], Duration::ZERO),
        ];
        let mut h = Harness::with_config(&config);
        h.enable(BehaviorKind::ComboCycle);
        let t0 = Instant::now();

        let mut snapshot = player(100, 100);
        snapshot.entities.push(entity("Rival", EntityKind::Player, 5.0));
        assert!(h.tick(t0, &snapshot).is_empty());

        h.enable(BehaviorKind::AutoTarget);
        let fired = h.tick(t0, &snapshot);
        assert_eq!(fired, vec![BehaviorKind::AutoTarget, BehaviorKind::ComboCycle]);
        assert_eq!(h.sink.taps(), vec![KeyCode::F7, KeyCode::F8]);

        h.tick(t0 + Duration::from_secs(2), &snapshot);
        assert_eq!(h.sink.taps(), vec![KeyCode::F7, KeyCode::F8, KeyCode::F4]);
        assert_eq!(h.behaviors.stats().combos, 2);
    }

    #[test]
    fn failed_actuation_still_advances_cooldown_and_continues() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoPot);
        h.enable(BehaviorKind::AutoShield);
        h.sink.reject_presses(true);
        let now = Instant::now();

        let fired = h.tick(now, &player(10, 100));
        assert_eq!(fired, vec![BehaviorKind::AutoPot, BehaviorKind::AutoShield]);
        assert_eq!(
            h.behaviors.scheduler().last_action(BehaviorKind::AutoPot),
            Some(now)
        );
        assert_eq!(h.behaviors.stats().potions, 0);
        assert!(h.journal.tail(1)[0].contains("Auto Shield failed"));
    }

    #[test]
    fn disabling_twice_logs_once() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::Farm);
        let before = h.journal.len();

        assert!(
            h.behaviors
                .set_behavior_enabled(BehaviorKind::Farm, false, &h.journal)
        );
        assert!(
            !h.behaviors
                .set_behavior_enabled(BehaviorKind::Farm, false, &h.journal)
        );

        assert!(!h.behaviors.scheduler().is_enabled(BehaviorKind::Farm));
        assert_eq!(h.journal.len(), before + 1);
    }

    #[test]
    fn store_round_trips_runtime_state() {
        let mut h = Harness::new();
        h.enable(BehaviorKind::AutoShield);
        h.behaviors
            .add_skill(Skill::new("Nova", KeyCode::F9, Duration::from_secs(3)));

        let mut config = Config::default();
        h.behaviors.store(&mut config);
        assert!(config.switches.is_active(BehaviorKind::AutoShield));
        assert_eq!(config.skills.len(), 1);

        let rebuilt = BehaviorLoop::new(&config);
        assert!(rebuilt.is_active(BehaviorKind::AutoShield));
        assert_eq!(rebuilt.skills().items()[0].name, "Nova");
    }
}
