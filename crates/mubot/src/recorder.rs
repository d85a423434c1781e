//! Session recording ("learning mode").
//!
//! Captures vitals, sightings and notable events into capped in-memory
//! buffers, autosaves them to dated session files and exports them on demand.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use serde::Serialize;
use strum::{Display, EnumString};
use tracing::{debug, info};

use crate::behavior::BehaviorKind;
use crate::error::Result;
use crate::game::{EntityKind, Position, Snapshot};

pub const MAX_EVENTS: usize = 1000;
pub const MAX_VITALS: usize = 500;
pub const MAX_CHARACTERS: usize = 100;
pub const MAX_ITEMS: usize = 200;
/// Health or mana swing, in points, that is worth an event.
pub const SIGNIFICANT_CHANGE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Health,
    Mana,
    Character,
    Item,
    Action,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedEvent {
    pub at: DateTime<Local>,
    pub kind: EventKind,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VitalsSample {
    pub at: DateTime<Local>,
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub max_mana: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeenCharacter {
    pub name: String,
    pub kind: EntityKind,
    pub level: i32,
    pub position: Position,
    pub last_seen: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeenItem {
    pub name: String,
    pub position: Position,
    pub at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    #[default]
    Txt,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Json => "json",
        }
    }
}

#[derive(Serialize)]
struct Export<'a> {
    generated: DateTime<Local>,
    events: &'a VecDeque<RecordedEvent>,
    vitals: &'a VecDeque<VitalsSample>,
    characters: &'a VecDeque<SeenCharacter>,
    items: &'a VecDeque<SeenItem>,
}

fn push_capped<T>(buffer: &mut VecDeque<T>, value: T, cap: usize) {
    while buffer.len() >= cap {
        buffer.pop_front();
    }
    buffer.push_back(value);
}

/// Whether two raw vitals readings differ by more than [`SIGNIFICANT_CHANGE`].
fn significant(current: i32, previous: i32) -> bool {
    current.abs_diff(previous) > SIGNIFICANT_CHANGE.unsigned_abs()
}

pub struct SessionRecorder {
    enabled: bool,
    dir: PathBuf,
    autosave: Duration,
    events: VecDeque<RecordedEvent>,
    vitals: VecDeque<VitalsSample>,
    characters: VecDeque<SeenCharacter>,
    items: VecDeque<SeenItem>,
    session_file: Option<PathBuf>,
    last_save: Option<Instant>,
}

impl SessionRecorder {
    pub fn new<P: AsRef<Path>>(dir: P, autosave: Duration) -> Self {
        Self {
            enabled: false,
            dir: dir.as_ref().to_path_buf(),
            autosave,
            events: VecDeque::new(),
            vitals: VecDeque::new(),
            characters: VecDeque::new(),
            items: VecDeque::new(),
            session_file: None,
            last_save: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns whether the state changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        if enabled {
            self.session_file = None;
            self.last_save = None;
        }
        true
    }

    pub fn events(&self) -> &VecDeque<RecordedEvent> {
        &self.events
    }

    pub fn vitals(&self) -> &VecDeque<VitalsSample> {
        &self.vitals
    }

    pub fn characters(&self) -> &VecDeque<SeenCharacter> {
        &self.characters
    }

    pub fn items(&self) -> &VecDeque<SeenItem> {
        &self.items
    }

    pub fn session_file(&self) -> Option<&Path> {
        self.session_file.as_deref()
    }

    pub fn log_event(&mut self, kind: EventKind, data: impl Into<String>) {
        if !self.enabled {
            return;
        }
        let event = RecordedEvent {
            at: Local::now(),
            kind,
            data: data.into(),
        };
        push_capped(&mut self.events, event, MAX_EVENTS);
    }

    pub fn record_action(&mut self, kind: BehaviorKind) {
        self.log_event(EventKind::Action, kind.to_string());
    }

    /// Capture vitals and sightings from a fresh snapshot.
    pub fn record_snapshot(&mut self, snapshot: &Snapshot) {
        if !self.enabled || !snapshot.is_valid() {
            return;
        }
        let now = Local::now();
        self.record_vitals(snapshot, now);

        for entity in &snapshot.entities {
            self.record_character(
                SeenCharacter {
                    name: entity.name.clone(),
                    kind: entity.kind,
                    level: entity.level,
                    position: entity.position,
                    last_seen: now,
                },
            );
        }
        for item in &snapshot.items {
            let known = self
                .items
                .iter()
                .any(|seen| seen.name == item.name && seen.position == item.position);
            if known {
                continue;
            }
            self.log_event(
                EventKind::Item,
                format!(
                    "Item found: {} at ({}, {})",
                    item.name, item.position.x, item.position.y
                ),
            );
            let seen = SeenItem {
                name: item.name.clone(),
                position: item.position,
                at: now,
            };
            push_capped(&mut self.items, seen, MAX_ITEMS);
        }
    }

    fn record_vitals(&mut self, snapshot: &Snapshot, now: DateTime<Local>) {
        let player = &snapshot.player;
        let previous = self.vitals.back().map(|v| (v.health, v.mana));
        push_capped(
            &mut self.vitals,
            VitalsSample {
                at: now,
                health: player.health,
                max_health: player.max_health,
                mana: player.mana,
                max_mana: player.max_mana,
            },
            MAX_VITALS,
        );

        let Some((health, mana)) = previous else {
            return;
        };
        if significant(player.health, health) {
            self.log_event(
                EventKind::Health,
                format!("Health changed from {} to {}", health, player.health),
            );
        }
        if significant(player.mana, mana) {
            self.log_event(
                EventKind::Mana,
                format!("Mana changed from {} to {}", mana, player.mana),
            );
        }
    }

    fn record_character(&mut self, seen: SeenCharacter) {
        if let Some(known) = self.characters.iter_mut().find(|c| c.name == seen.name) {
            known.level = seen.level;
            known.position = seen.position;
            known.last_seen = seen.last_seen;
            return;
        }

        self.log_event(
            EventKind::Character,
            format!(
                "{} detected: {} (Level {}) at ({}, {})",
                seen.kind, seen.name, seen.level, seen.position.x, seen.position.y
            ),
        );
        push_capped(&mut self.characters, seen, MAX_CHARACTERS);
    }

    /// Write the session file once the autosave interval has passed.
    ///
    /// Returns the file written, if any.
    pub fn maybe_autosave(&mut self, now: Instant) -> Result<Option<PathBuf>> {
        if !self.enabled {
            return Ok(None);
        }
        let Some(last) = self.last_save else {
            self.last_save = Some(now);
            return Ok(None);
        };
        if now.saturating_duration_since(last) < self.autosave {
            return Ok(None);
        }

        self.last_save = Some(now);
        let path = match &self.session_file {
            Some(path) => path.clone(),
            None => {
                let stamp = Local::now();
                let dir = self.dir.join(stamp.format("%Y-%m-%d").to_string());
                fs::create_dir_all(&dir)?;
                let path = dir.join(format!("session_{}.txt", stamp.format("%H%M%S")));
                self.session_file = Some(path.clone());
                path
            }
        };
        fs::write(&path, self.render(ExportFormat::Txt)?)?;
        debug!("Autosaved session to {}", path.display());
        Ok(Some(path))
    }

    /// Write an export file into the recordings directory.
    pub fn export(&self, format: ExportFormat) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!(
            "mubot_export_{}.{}",
            Local::now().format("%Y%m%d_%H%M%S"),
            format.extension()
        ));
        fs::write(&path, self.render(format)?)?;
        info!("Exported session to {}", path.display());
        Ok(path)
    }

    pub fn render(&self, format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Txt => Ok(self.render_text()),
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&Export {
                generated: Local::now(),
                events: &self.events,
                vitals: &self.vitals,
                characters: &self.characters,
                items: &self.items,
            })?),
        }
    }

    fn render_text(&self) -> String {
        const RULE: &str = "----------------------------------------";
        let clock = |at: &DateTime<Local>| at.format("%H:%M:%S").to_string();
        let mut out = String::new();

        let _ = writeln!(out, "mubot session log");
        let _ = writeln!(out, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));

        let _ = writeln!(out, "\nEVENTS ({} total):\n{RULE}", self.events.len());
        for e in &self.events {
            let _ = writeln!(out, "[{}] {}: {}", clock(&e.at), e.kind, e.data);
        }

        let _ = writeln!(out, "\nVITALS ({} entries):\n{RULE}", self.vitals.len());
        for v in &self.vitals {
            let _ = writeln!(
                out,
                "[{}] HP: {}/{} MP: {}/{}",
                clock(&v.at),
                v.health,
                v.max_health,
                v.mana,
                v.max_mana
            );
        }

        let _ = writeln!(out, "\nCHARACTERS ({} total):\n{RULE}", self.characters.len());
        for c in &self.characters {
            let _ = writeln!(
                out,
                "[{}] {}: {} (Lv.{}) at ({}, {})",
                clock(&c.last_seen),
                c.kind,
                c.name,
                c.level,
                c.position.x,
                c.position.y
            );
        }

        let _ = writeln!(out, "\nITEMS ({} total):\n{RULE}", self.items.len());
        for i in &self.items {
            let _ = writeln!(
                out,
                "[{}] {} at ({}, {})",
                clock(&i.at),
                i.name,
                i.position.x,
                i.position.y
            );
        }
        out
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.vitals.clear();
        self.characters.clear();
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EntityInfo, ItemSighting};
    use tempfile::tempdir;

    fn recorder() -> SessionRecorder {
        let mut recorder = SessionRecorder::new("unused", Duration::from_secs(30));
        recorder.set_enabled(true);
        recorder
    }

    fn snapshot(health: i32, mana: i32) -> Snapshot {
        let mut snapshot = Snapshot::default();
        snapshot.player.valid = true;
        snapshot.player.health = health;
        snapshot.player.max_health = 100;
        snapshot.player.mana = mana;
        snapshot.player.max_mana = 100;
        snapshot
    }

    fn monster(name: &str, x: i32) -> EntityInfo {
        EntityInfo {
            name: name.to_string(),
            level: 30,
            position: Position::new(x, 0),
            alive: true,
            ..Default::default()
        }
    }

    #[test]
    fn disabled_recorder_ignores_everything() {
        let mut recorder = SessionRecorder::new("unused", Duration::from_secs(30));
        recorder.record_snapshot(&snapshot(50, 50));
        recorder.log_event(EventKind::Action, "x");
        assert!(recorder.vitals().is_empty());
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn significant_vitals_change_logs_event() {
        let mut recorder = recorder();
        recorder.record_snapshot(&snapshot(100, 100));
        recorder.record_snapshot(&snapshot(95, 100));
        assert!(recorder.events().is_empty());

        recorder.record_snapshot(&snapshot(80, 60));
        let kinds: Vec<_> = recorder.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Health, EventKind::Mana]);
        assert_eq!(recorder.events()[0].data, "Health changed from 95 to 80");
    }

    #[test]
    fn change_of_exactly_ten_is_not_significant() {
        let mut recorder = recorder();
        recorder.record_snapshot(&snapshot(100, 100));
        recorder.record_snapshot(&snapshot(90, 90));
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn extreme_vitals_readings_do_not_overflow() {
        let mut recorder = recorder();
        recorder.record_snapshot(&snapshot(1, i32::MAX));
        recorder.record_snapshot(&snapshot(i32::MIN, i32::MIN));

        let kinds: Vec<_> = recorder.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Health, EventKind::Mana]);
        assert_eq!(
            recorder.events()[0].data,
            format!("Health changed from 1 to {}", i32::MIN)
        );
    }

    #[test]
    fn characters_are_deduplicated_by_name() {
        let mut recorder = recorder();
        let mut first = snapshot(100, 100);
        first.entities.push(monster("Goblin", 1));
        let mut second = snapshot(100, 100);
        second.entities.push(monster("Goblin", 7));

        recorder.record_snapshot(&first);
        recorder.record_snapshot(&second);

        assert_eq!(recorder.characters().len(), 1);
        assert_eq!(recorder.characters()[0].position, Position::new(7, 0));
        let detections = recorder
            .events()
            .iter()
            .filter(|e| e.kind == EventKind::Character)
            .count();
        assert_eq!(detections, 1);
    }

    #[test]
    fn buffers_are_capped() {
        let mut recorder = recorder();
        for i in 0..(MAX_VITALS + 20) {
            let mut s = snapshot(50, 50);
            s.entities.push(monster(&format!("m{i}"), 0));
            s.items.push(ItemSighting {
                name: format!("item{i}"),
                position: Position::new(i as i32, 0),
            });
            recorder.record_snapshot(&s);
        }
        for _ in 0..(MAX_EVENTS + 5) {
            recorder.record_action(BehaviorKind::Farm);
        }

        assert_eq!(recorder.vitals().len(), MAX_VITALS);
        assert_eq!(recorder.characters().len(), MAX_CHARACTERS);
        assert_eq!(recorder.items().len(), MAX_ITEMS);
        assert_eq!(recorder.events().len(), MAX_EVENTS);
        assert_eq!(recorder.characters().back().unwrap().name, "m519");
    }

    #[test]
    fn repeated_item_sighting_recorded_once() {
        let mut recorder = recorder();
        let mut s = snapshot(50, 50);
        s.items.push(ItemSighting {
            name: "Zen".to_string(),
            position: Position::new(3, 4),
        });
        recorder.record_snapshot(&s);
        recorder.record_snapshot(&s);
        assert_eq!(recorder.items().len(), 1);
    }

    #[test]
    fn text_and_json_exports() {
        let dir = tempdir().unwrap();
        let mut recorder = SessionRecorder::new(dir.path(), Duration::from_secs(30));
        recorder.set_enabled(true);
        let mut s = snapshot(70, 40);
        s.entities.push(monster("Goblin", 2));
        recorder.record_snapshot(&s);
        recorder.record_action(BehaviorKind::AutoPot);

        let text = recorder.render(ExportFormat::Txt).unwrap();
        assert!(text.contains("VITALS (1 entries)"));
        assert!(text.contains("HP: 70/100 MP: 40/100"));
        assert!(text.contains("ACTION: Auto Pot"));

        let path = recorder.export(ExportFormat::Json).unwrap();
        assert_eq!(path.extension().unwrap(), "json");
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["characters"][0]["name"], "Goblin");
        assert_eq!(json["events"][1]["kind"], "ACTION");
    }

    #[test]
    fn autosave_waits_for_interval_and_reuses_session_file() {
        let dir = tempdir().unwrap();
        let mut recorder = SessionRecorder::new(dir.path(), Duration::from_secs(30));
        recorder.set_enabled(true);
        recorder.record_snapshot(&snapshot(50, 50));
        let t0 = Instant::now();

        assert!(recorder.maybe_autosave(t0).unwrap().is_none());
        assert!(recorder.maybe_autosave(t0 + Duration::from_secs(29)).unwrap().is_none());

        let first = recorder
            .maybe_autosave(t0 + Duration::from_secs(30))
            .unwrap()
            .unwrap();
        assert!(first.exists());
        assert!(first.starts_with(dir.path()));

        let second = recorder
            .maybe_autosave(t0 + Duration::from_secs(60))
            .unwrap()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn export_format_parses() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(ExportFormat::Txt.to_string(), "txt");
    }
}
