//! Application context and the polling worker.
//!
//! [`Bot`] owns every piece of runtime state: the snapshot builder, the
//! behavior loop, the actuator, the journal, the recorder and the license.
//! [`Worker`] moves it onto a dedicated thread, feeds it [`UiCommand`]s and
//! publishes a [`DisplayState`] after each tick. The process handle is created
//! and dropped on that thread.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::behavior::{BehaviorKind, BehaviorLoop};
use crate::config::Config;
use crate::error::Result;
use crate::game::{Snapshot, SnapshotBuilder};
use crate::input::InputActuator;
use crate::journal::Journal;
use crate::license::{License, LicenseStatus};
use crate::memory::ReadMemory;
use crate::offset::OffsetTable;
use crate::recorder::SessionRecorder;
use crate::shutdown::ShutdownSignal;
use crate::ui::{
    AttachStatus, DISPLAY_JOURNAL_LINES, DisplayState, PendingAction, Threshold, UiCommand,
};

pub struct Bot {
    config: Config,
    config_path: Option<PathBuf>,
    builder: SnapshotBuilder,
    behaviors: BehaviorLoop,
    actuator: InputActuator,
    journal: Journal,
    recorder: SessionRecorder,
    license: Box<dyn License>,
    license_status: LicenseStatus,
    license_blocked: bool,
    pending: PendingAction,
    attach: AttachStatus,
    reattach_requested: bool,
    shutdown_requested: bool,
}

impl Bot {
    pub fn new(
        config: Config,
        offsets: OffsetTable,
        actuator: InputActuator,
        license: Box<dyn License>,
    ) -> Self {
        let mut recorder = SessionRecorder::new(&config.recordings_dir, config.autosave_interval);
        recorder.set_enabled(config.learning_mode);
        let license_status = LicenseStatus::check(license.as_ref());

        Self {
            builder: SnapshotBuilder::new(offsets),
            behaviors: BehaviorLoop::new(&config),
            config,
            config_path: None,
            actuator,
            journal: Journal::new(),
            recorder,
            license,
            license_status,
            license_blocked: false,
            pending: PendingAction::None,
            attach: AttachStatus::Detached,
            reattach_requested: false,
            shutdown_requested: false,
        }
    }

    /// Persist the configuration here on [`Bot::shutdown`].
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn behaviors(&self) -> &BehaviorLoop {
        &self.behaviors
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.builder.last()
    }

    pub fn license_status(&self) -> &LicenseStatus {
        &self.license_status
    }

    pub fn pending(&self) -> &PendingAction {
        &self.pending
    }

    pub fn attach_status(&self) -> &AttachStatus {
        &self.attach
    }

    pub fn set_attach_status(&mut self, status: AttachStatus) {
        if self.attach != status {
            self.journal.log(format!("Process: {status}"));
            self.attach = status;
        }
    }

    /// Returns and clears a pending reattach request.
    pub fn take_reattach_request(&mut self) -> bool {
        std::mem::take(&mut self.reattach_requested)
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    /// One poll: refresh the snapshot and run behaviors. Returns the behaviors
    /// that acted.
    ///
    /// While the license does not permit running, memory is not read at all
    /// and the snapshot only goes stale.
    pub fn tick(&mut self, source: Option<&dyn ReadMemory>, now: Instant) -> Vec<BehaviorKind> {
        self.license_status = LicenseStatus::check(self.license.as_ref());

        if !self.license_status.permits_running() {
            self.builder.refresh::<dyn ReadMemory>(None);
            if !self.license_blocked {
                self.license_blocked = true;
                warn!("License {}, automation paused", self.license_status.describe());
                self.journal.log(format!(
                    "License {}: automation paused",
                    self.license_status.describe()
                ));
            }
            return Vec::new();
        }
        if self.license_blocked {
            self.license_blocked = false;
            self.journal.log("License valid: automation resumed");
        }

        let snapshot = self.builder.refresh(source);

        let fired = self
            .behaviors
            .tick(now, snapshot, &self.actuator, &self.journal);

        if self.recorder.is_enabled() {
            self.recorder.record_snapshot(snapshot);
            for kind in &fired {
                self.recorder.record_action(*kind);
            }
            if let Err(e) = self.recorder.maybe_autosave(now) {
                warn!("Session autosave failed: {}", e);
            }
        }
        fired
    }

    /// Apply one user intent.
    pub fn apply(&mut self, command: UiCommand) {
        debug!("Applying {:?}", command);
        match command {
            UiCommand::ToggleBehavior(kind) => {
                let enabled = !self.behaviors.scheduler().is_enabled(kind);
                self.behaviors
                    .set_behavior_enabled(kind, enabled, &self.journal);
            }
            UiCommand::SetBehavior(kind, enabled) => {
                self.behaviors
                    .set_behavior_enabled(kind, enabled, &self.journal);
            }
            UiCommand::ToggleMode(mode) => {
                let enabled = !self.behaviors.mode_enabled(mode);
                self.behaviors.set_mode_enabled(mode, enabled, &self.journal);
            }
            UiCommand::SetMode(mode, enabled) => {
                self.behaviors.set_mode_enabled(mode, enabled, &self.journal);
            }
            UiCommand::SetThreshold(threshold, value) => self.set_threshold(threshold, value),
            UiCommand::AddSkill(skill) => {
                self.journal.log(format!("Skill added: {}", skill.name));
                self.behaviors.add_skill(skill);
            }
            UiCommand::RemoveSkill(index) => {
                if let Some(skill) = self.behaviors.remove_skill(index) {
                    self.journal.log(format!("Skill removed: {}", skill.name));
                }
            }
            UiCommand::ClearSkills => {
                let removed = self.behaviors.clear_skills();
                self.journal.log(format!("Skills cleared ({removed})"));
            }
            UiCommand::AddCombo(combo) => {
                self.journal.log(format!("Combo added: {}", combo.name));
                self.behaviors.add_combo(combo);
            }
            UiCommand::RemoveCombo(index) => {
                if let Some(combo) = self.behaviors.remove_combo(index) {
                    self.journal.log(format!("Combo removed: {}", combo.name));
                }
            }
            UiCommand::ClearCombos => {
                let removed = self.behaviors.clear_combos();
                self.journal.log(format!("Combos cleared ({removed})"));
            }
            UiCommand::ClearStats => {
                self.behaviors.clear_stats();
                self.journal.log("Statistics cleared");
            }
            UiCommand::ExportSession(format) => match self.recorder.export(format) {
                Ok(path) => self
                    .journal
                    .log(format!("Session exported to {}", path.display())),
                Err(e) => {
                    warn!("Session export failed: {}", e);
                    self.journal.log(format!("Export failed: {e}"));
                }
            },
            UiCommand::ClearRecording => {
                self.recorder.clear();
                self.journal.log("Session log cleared");
            }
            UiCommand::ToggleLearning => {
                let enabled = !self.recorder.is_enabled();
                self.recorder.set_enabled(enabled);
                self.journal.log(if enabled {
                    "Learning mode enabled"
                } else {
                    "Learning mode disabled"
                });
            }
            UiCommand::Reattach => {
                self.reattach_requested = true;
                self.journal.log("Reattach requested");
            }
            UiCommand::RequestConfirm(action) => {
                self.pending = PendingAction::request(action);
            }
            UiCommand::Confirm => {
                if let Some(action) = self.pending.confirm() {
                    for command in action.commands() {
                        self.apply(command.clone());
                    }
                }
            }
            UiCommand::Cancel => {
                self.pending.cancel();
            }
            UiCommand::Shutdown => {
                self.shutdown_requested = true;
            }
        }
    }

    fn set_threshold(&mut self, threshold: Threshold, value: i32) {
        let (min, max) = threshold.bounds();
        if !(min..=max).contains(&value) {
            warn!("Ignoring {} = {}: expected {}..={}", threshold, value, min, max);
            self.journal
                .log(format!("Invalid {threshold}: {value} (allowed {min}..={max})"));
            return;
        }

        let slot = match threshold {
            Threshold::ResetLevel => &mut self.behaviors.pve_mut().reset_level,
            Threshold::HealthPotPercent => &mut self.behaviors.pve_mut().health_pot_percent,
            Threshold::ManaPotPercent => &mut self.behaviors.pve_mut().mana_pot_percent,
            Threshold::FarmRange => &mut self.behaviors.pve_mut().farm_range,
            Threshold::ShieldPercent => &mut self.behaviors.pvp_mut().shield_percent,
        };
        if *slot != value {
            *slot = value;
            self.journal.log(format!("{threshold} set to {value}"));
        }
    }

    pub fn display(&self) -> DisplayState {
        DisplayState {
            snapshot: self.builder.last().clone(),
            stats: self.behaviors.stats(),
            journal: self.journal.tail(DISPLAY_JOURNAL_LINES),
            license: self.license_status.clone(),
            switches: self.behaviors.switches(),
            target: self.behaviors.target().cloned(),
            attach: self.attach.clone(),
            learning: self.recorder.is_enabled(),
            pending: self.pending.message().map(str::to_string),
        }
    }

    /// Configuration as it should be written on exit, with automation off.
    pub fn exit_config(&self) -> Config {
        let mut config = self.config.clone();
        self.behaviors.store(&mut config);
        config.learning_mode = self.recorder.is_enabled();
        config.for_shutdown()
    }

    /// Persist the configuration. Call after the poll loop has stopped.
    pub fn shutdown(&mut self) -> Result<()> {
        self.config = self.exit_config();
        if let Some(path) = &self.config_path {
            self.config.save(path)?;
            info!("Configuration saved to {}", path.display());
        }
        Ok(())
    }
}

/// A freshly attached memory source and what to show for it.
pub struct Attachment<S> {
    pub source: S,
    pub pid: u32,
    pub name: String,
}

impl<S> Attachment<S> {
    pub fn new(source: S, pid: u32, name: impl Into<String>) -> Self {
        Self {
            source,
            pid,
            name: name.into(),
        }
    }
}

/// The polling thread and its channels.
pub struct Worker {
    commands: Sender<UiCommand>,
    display: Arc<Mutex<DisplayState>>,
    shutdown: Arc<ShutdownSignal>,
    handle: JoinHandle<Bot>,
}

impl Worker {
    /// Start polling. `attach` runs on the worker thread, once at start and
    /// again after each [`UiCommand::Reattach`].
    pub fn spawn<S, F>(bot: Bot, attach: F, shutdown: Arc<ShutdownSignal>) -> Self
    where
        S: ReadMemory + 'static,
        F: FnMut() -> Result<Attachment<S>> + Send + 'static,
    {
        let (commands, inbox) = mpsc::channel();
        let display = Arc::new(Mutex::new(bot.display()));

        let view = Arc::clone(&display);
        let signal = Arc::clone(&shutdown);
        let handle = thread::spawn(move || {
            let _stop = StopOnExit(Arc::clone(&signal));
            run(bot, attach, inbox, view, signal)
        });

        Self {
            commands,
            display,
            shutdown,
            handle,
        }
    }

    pub fn sender(&self) -> Sender<UiCommand> {
        self.commands.clone()
    }

    /// Returns false once the worker has stopped.
    pub fn send(&self, command: UiCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Latest published state.
    pub fn display(&self) -> DisplayState {
        self.display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn shutdown_signal(&self) -> &Arc<ShutdownSignal> {
        &self.shutdown
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop polling and hand the context back.
    pub fn join(self) -> thread::Result<Bot> {
        self.shutdown.trigger();
        self.handle.join()
    }
}

/// Triggers shutdown when the worker thread ends, including by panic.
struct StopOnExit(Arc<ShutdownSignal>);

impl Drop for StopOnExit {
    fn drop(&mut self) {
        self.0.trigger();
    }
}

fn run<S, F>(
    mut bot: Bot,
    mut attach: F,
    inbox: Receiver<UiCommand>,
    view: Arc<Mutex<DisplayState>>,
    shutdown: Arc<ShutdownSignal>,
) -> Bot
where
    S: ReadMemory + 'static,
    F: FnMut() -> Result<Attachment<S>>,
{
    info!("Worker started");
    let poll = bot.config().poll_interval;
    let mut source: Option<S> = None;
    let mut attach_pending = true;

    while !shutdown.is_shutdown() {
        for command in inbox.try_iter() {
            bot.apply(command);
        }
        if bot.shutdown_requested() {
            shutdown.trigger();
            break;
        }

        if bot.take_reattach_request() {
            source = None;
            attach_pending = true;
        }
        if attach_pending {
            attach_pending = false;
            match attach() {
                Ok(attachment) => {
                    bot.set_attach_status(AttachStatus::Attached {
                        pid: attachment.pid,
                        name: attachment.name,
                    });
                    source = Some(attachment.source);
                }
                Err(e) => {
                    error!("Attach failed: {}", e);
                    bot.set_attach_status(AttachStatus::Failed(e.to_string()));
                }
            }
        }
        if source.as_ref().is_some_and(|s| !s.is_alive()) {
            source = None;
            bot.set_attach_status(AttachStatus::Failed("process exited".to_string()));
        }

        bot.tick(source.as_ref().map(|s| s as &dyn ReadMemory), Instant::now());
        *view.lock().unwrap_or_else(PoisonError::into_inner) = bot.display();

        if shutdown.wait(poll) {
            break;
        }
    }

    drop(source);
    *view.lock().unwrap_or_else(PoisonError::into_inner) = bot.display();
    info!("Worker stopped");
    bot
}
