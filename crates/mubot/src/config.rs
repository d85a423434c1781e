//! Line-oriented `key=value` configuration.
//!
//! Unknown keys and malformed values are reported with a warning and leave
//! the default in place, so a hand-edited file never prevents startup.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::behavior::{BehaviorKind, Combo, Mode, PveTuning, PvpTuning, Skill, Switches};
use crate::error::{Error, Result};
use crate::input::{ComboStep, KeyCode};

/// File name used when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "mubot_config.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Executable names to attach to, matched exactly or as a substring.
    pub process_names: Vec<String>,
    pub offsets_path: PathBuf,
    pub license_path: Option<PathBuf>,
    pub poll_interval: Duration,
    pub key_hold: Duration,
    pub learning_mode: bool,
    pub recordings_dir: PathBuf,
    pub autosave_interval: Duration,
    pub switches: Switches,
    pub pve: PveTuning,
    pub pvp: PvpTuning,
    pub skills: Vec<Skill>,
    pub combos: Vec<Combo>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process_names: vec!["main.exe".to_string()],
            offsets_path: PathBuf::from("offsets.json"),
            license_path: None,
            poll_interval: Duration::from_millis(100),
            key_hold: Duration::from_millis(50),
            learning_mode: false,
            recordings_dir: PathBuf::from("sessions"),
            autosave_interval: Duration::from_secs(30),
            switches: Switches::default(),
            pve: PveTuning::default(),
            pvp: PvpTuning::default(),
            skills: Vec::new(),
            combos: Vec::new(),
        }
    }
}

impl Config {
    /// Defaults plus a few example skills and combos, for a fresh install.
    pub fn sample() -> Self {
        let ms = Duration::from_millis;
        Self {
            license_path: Some(PathBuf::from("license.json")),
            skills: vec![
                Skill::new("Twisting Slash", KeyCode::F5, ms(1500)),
                Skill::new("Death Stab", KeyCode::F6, ms(2500)),
            ],
            combos: vec![
                Combo::uniform("Fire", &[KeyCode::F4, KeyCode::F5, KeyCode::F6], ms(200)),
                Combo::uniform("Ice", &[KeyCode::F7, KeyCode::F8], ms(300)),
                Combo::uniform(
                    "Lightning",
                    &[KeyCode::F9, KeyCode::F10, KeyCode::F11, KeyCode::F12],
                    ms(150),
                ),
            ],
            ..Self::default()
        }
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                debug!("Loaded config from {}", path.display());
                Ok(Self::parse(&text))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Config {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(&path, self.to_text())?;
        info!("Saved config to {}", path.as_ref().display());
        Ok(())
    }

    /// Parse config text, warning about and skipping bad lines.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        let mut processes = Vec::new();

        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                warn!("Config line {}: expected key=value, got {:?}", number + 1, line);
                continue;
            };

            let (key, value) = (key.trim(), value.trim());
            if key == "process" {
                if !value.is_empty() {
                    processes.push(value.to_string());
                }
                continue;
            }
            if let Err(e) = config.apply(key, value) {
                warn!("Config line {}: {}", number + 1, e);
            }
        }

        if !processes.is_empty() {
            config.process_names = processes;
        }
        config
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(mode) = Mode::iter().find(|m| m.config_key() == key) {
            self.switches.set_mode(mode, parse_bool(key, value)?);
            return Ok(());
        }
        if let Some(kind) = BehaviorKind::iter().find(|k| k.config_key() == key) {
            self.switches.set_behavior(kind, parse_bool(key, value)?);
            return Ok(());
        }

        match key {
            "offsets" => self.offsets_path = PathBuf::from(value),
            "license" => {
                self.license_path = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "poll_interval_ms" => self.poll_interval = parse_millis(key, value)?,
            "key_hold_ms" => self.key_hold = parse_millis(key, value)?,
            "learning_mode" => self.learning_mode = parse_bool(key, value)?,
            "recordings_dir" => self.recordings_dir = PathBuf::from(value),
            "autosave_secs" => {
                self.autosave_interval = Duration::from_secs(parse_number(key, value)?)
            }
            "reset_level" => self.pve.reset_level = parse_number(key, value)?,
            "health_pot_percent" => self.pve.health_pot_percent = parse_percent(key, value)?,
            "mana_pot_percent" => self.pve.mana_pot_percent = parse_percent(key, value)?,
            "farm_range" => self.pve.farm_range = parse_number(key, value)?,
            "attack_key" => self.pve.attack_key = parse_key(key, value)?,
            "reset_key" => self.pve.reset_key = parse_key(key, value)?,
            "confirm_key" => self.pve.confirm_key = parse_key(key, value)?,
            "reset_confirm_ms" => self.pve.reset_confirm_delay = parse_millis(key, value)?,
            "pickup_key" => self.pve.pickup_key = parse_key(key, value)?,
            "health_pot_key" => self.pve.health_pot_key = parse_key(key, value)?,
            "mana_pot_key" => self.pve.mana_pot_key = parse_key(key, value)?,
            "shield_percent" => self.pvp.shield_percent = parse_percent(key, value)?,
            "shield_key" => self.pvp.shield_key = parse_key(key, value)?,
            "target_key" => {
                self.pvp.target_key = if value.is_empty() {
                    None
                } else {
                    Some(parse_key(key, value)?)
                };
            }
            "skill" => self.skills.push(parse_skill(value)?),
            "combo" => self.combos.push(parse_combo(value)?),
            _ => return Err(invalid(key, "unknown key")),
        }
        Ok(())
    }

    /// Render as config text. `parse(to_text())` reproduces `self`, apart from
    /// skill timestamps.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let mut line = |key: &str, value: &dyn std::fmt::Display| {
            let _ = writeln!(out, "{key}={value}");
        };

        for process in &self.process_names {
            line("process", process);
        }
        line("offsets", &self.offsets_path.display());
        match &self.license_path {
            Some(path) => line("license", &path.display()),
            None => line("license", &""),
        }
        line("poll_interval_ms", &self.poll_interval.as_millis());
        line("key_hold_ms", &self.key_hold.as_millis());
        line("learning_mode", &u8::from(self.learning_mode));
        line("recordings_dir", &self.recordings_dir.display());
        line("autosave_secs", &self.autosave_interval.as_secs());

        for mode in Mode::iter() {
            line(mode.config_key(), &u8::from(self.switches.mode(mode)));
        }
        for kind in BehaviorKind::iter() {
            line(kind.config_key(), &u8::from(self.switches.behavior(kind)));
        }

        let pve = &self.pve;
        line("reset_level", &pve.reset_level);
        line("health_pot_percent", &pve.health_pot_percent);
        line("mana_pot_percent", &pve.mana_pot_percent);
        line("farm_range", &pve.farm_range);
        line("attack_key", &pve.attack_key);
        line("reset_key", &pve.reset_key);
        line("confirm_key", &pve.confirm_key);
        line("reset_confirm_ms", &pve.reset_confirm_delay.as_millis());
        line("pickup_key", &pve.pickup_key);
        line("health_pot_key", &pve.health_pot_key);
        line("mana_pot_key", &pve.mana_pot_key);

        let pvp = &self.pvp;
        line("shield_percent", &pvp.shield_percent);
        line("shield_key", &pvp.shield_key);
        match pvp.target_key {
            Some(key) => line("target_key", &key),
            None => line("target_key", &""),
        }

        for skill in &self.skills {
            line(
                "skill",
                &format_args!("{}:{}:{}", skill.name, skill.key, skill.delay.as_millis()),
            );
        }
        for combo in &self.combos {
            let steps: Vec<String> = combo
                .steps
                .iter()
                .map(|s| format!("{}/{}", s.key, s.delay.as_millis()))
                .collect();
            line("combo", &format_args!("{}:{}", combo.name, steps.join(",")));
        }

        format!("# mubot configuration\n{out}")
    }

    /// Copy written on shutdown: automation stays off until re-enabled.
    pub fn for_shutdown(&self) -> Self {
        let mut config = self.clone();
        config.switches.clear_modes();
        config
    }
}

fn invalid(key: &str, message: impl Into<String>) -> Error {
    Error::InvalidConfig {
        key: key.to_string(),
        message: message.into(),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(invalid(key, format!("expected 1 or 0, got {value:?}"))),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| invalid(key, format!("expected a number, got {value:?}")))
}

fn parse_percent(key: &str, value: &str) -> Result<i32> {
    let pct: i32 = parse_number(key, value)?;
    if (0..=100).contains(&pct) {
        Ok(pct)
    } else {
        Err(invalid(key, format!("{pct} is not a percentage")))
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration> {
    parse_number(key, value).map(Duration::from_millis)
}

fn parse_key(key: &str, value: &str) -> Result<KeyCode> {
    value
        .parse()
        .map_err(|e: Error| invalid(key, e.to_string()))
}

/// `name:key:delay_ms`
fn parse_skill(value: &str) -> Result<Skill> {
    let mut parts = value.rsplitn(3, ':');
    let (Some(delay), Some(key), Some(name)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid("skill", format!("expected name:key:delay_ms, got {value:?}")));
    };
    if name.trim().is_empty() {
        return Err(invalid("skill", "empty skill name"));
    }

    Ok(Skill::new(
        name.trim(),
        parse_key("skill", key)?,
        parse_millis("skill", delay.trim())?,
    ))
}

/// `name:key/delay_ms,key/delay_ms,...`
fn parse_combo(value: &str) -> Result<Combo> {
    let Some((name, steps)) = value.rsplit_once(':') else {
        return Err(invalid("combo", format!("expected name:steps, got {value:?}")));
    };
    if name.trim().is_empty() {
        return Err(invalid("combo", "empty combo name"));
    }

    let steps = steps
        .split(',')
        .map(|step| {
            let (key, delay) = step.split_once('/').unwrap_or((step, "0"));
            Ok(ComboStep::new(
                parse_key("combo", key)?,
                parse_millis("combo", delay.trim())?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Combo::new(name.trim(), steps))
}
