//! # mubot
//!
//! Telemetry and input automation core for an external game client.
//!
//! This crate provides:
//! - Read-only process attach and best-effort typed memory reads
//! - Per-tick snapshots of the player, nearby entities and ground items
//! - Serialized synthetic key input with timed sequences
//! - A scheduler of PvE and PvP behaviors driven by those snapshots
//! - Session statistics, a capped journal and an optional session recorder
//! - The application context (`Bot`) and its polling thread (`Worker`)
//!
//! ## Feature Flags
//!
//! - `debug-tools`: Enables hexdumps and status reports used to build and
//!   check offset tables. Intended for the CLI, not the polling loop.

pub mod app;
pub mod behavior;
pub mod config;
#[cfg(feature = "debug-tools")]
pub mod debug;
pub mod error;
pub mod game;
pub mod input;
pub mod journal;
pub mod license;
pub mod memory;
pub mod offset;
pub mod recorder;
pub mod shutdown;
pub mod stats;
pub mod ui;

pub use app::{Attachment, Bot, Worker};
pub use behavior::{
    BehaviorKind, BehaviorLoop, Combo, Mode, PveTuning, PvpTuning, Rotation, Scheduler, Skill,
    Switches,
};
pub use config::{Config, DEFAULT_CONFIG_FILE};
pub use error::{Error, Result};
pub use game::{
    EntityInfo, EntityKind, ItemSighting, PlayerSnapshot, Position, Snapshot, SnapshotBuilder,
    Target,
};
pub use input::{ComboStep, DryRunSink, InputActuator, KeyCode, KeySink, system_sink};
pub use journal::{Journal, JournalEntry};
pub use license::{DEFAULT_LICENSE_PATHS, License, LicenseFile, LicenseStatus, StaticLicense};
pub use memory::{MemoryReader, ProcessHandle, ProcessInfo, ProcessLocator, ReadMemory};
pub use offset::{OffsetTable, load_offsets, save_offsets};
pub use recorder::{ExportFormat, SessionRecorder};
pub use shutdown::ShutdownSignal;
pub use stats::{Statistics, StatsTracker};
pub use ui::{ActionId, AttachStatus, DisplayState, PendingAction, Threshold, UiCommand};

// Debug utilities (requires debug-tools feature)
#[cfg(feature = "debug-tools")]
pub use debug::{MemoryDump, RegionCheck, StatusInfo, format_hexdump};
