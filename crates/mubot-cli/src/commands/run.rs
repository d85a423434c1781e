//! Main automation mode.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use mubot::{
    Attachment, Bot, DryRunSink, InputActuator, KeySink, License, LicenseFile, OffsetTable,
    ProcessLocator, ShutdownSignal, StaticLicense, Worker, load_offsets, system_sink,
};
use tracing::{info, warn};

use super::license::candidates;
use super::load_config;
use crate::input;

const STATUS_INTERVAL: Duration = Duration::from_secs(1);

/// Run until Ctrl+C, Esc or q.
pub fn run(config_path: &Path, dry_run: bool) -> Result<()> {
    let config = load_config(config_path)?;

    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        shutdown_ctrlc.trigger();
    })?;

    info!("mubot {}", env!("CARGO_PKG_VERSION"));

    let offsets = match load_offsets(&config.offsets_path) {
        Ok(offsets) => {
            info!("Loaded offsets version {}", offsets.version);
            offsets
        }
        Err(e) => {
            warn!(
                "Failed to load offsets from {}: {} (run `mubot init` for a template)",
                config.offsets_path.display(),
                e
            );
            OffsetTable::default()
        }
    };

    let license: Box<dyn License> =
        match LicenseFile::discover(&candidates(None, config.license_path.as_deref())) {
            Ok((license, _)) => Box::new(license),
            Err(e) => {
                warn!("{}", e);
                Box::new(StaticLicense::missing())
            }
        };

    let sink: Box<dyn KeySink> = if dry_run {
        info!("Dry run: key presses are logged, not sent");
        Box::new(DryRunSink)
    } else {
        system_sink()
    };
    let actuator = InputActuator::new(sink)
        .with_hold(config.key_hold)
        .with_abort(Arc::clone(&shutdown));

    let locator = ProcessLocator::new(config.process_names.iter().cloned());
    let bot = Bot::new(config, offsets, actuator, license).with_config_path(config_path);
    let worker = Worker::spawn(
        bot,
        move || {
            let process = locator.attach()?;
            let (pid, name) = (process.pid, process.name.clone());
            Ok(Attachment::new(process, pid, name))
        },
        Arc::clone(&shutdown),
    );

    let _keyboard_handle = input::spawn_keyboard_monitor(worker.sender(), Arc::clone(&shutdown));
    println!("{}", input::HELP);

    let mut printed = Vec::new();
    let mut last_status = String::new();
    let mut last_prompt = None;
    while !shutdown.wait(STATUS_INTERVAL) {
        if worker.is_finished() {
            warn!("Worker stopped unexpectedly");
            break;
        }
        let state = worker.display();
        print_new_lines(&mut printed, &state.journal);
        if state.pending != last_prompt {
            if let Some(prompt) = &state.pending {
                println!("{prompt} (y/n)");
            }
            last_prompt = state.pending.clone();
        }
        let status = state.status_line();
        if status != last_status {
            println!("{status}");
            last_status = status;
        }
    }

    let mut bot = worker
        .join()
        .map_err(|_| anyhow!("worker thread panicked"))?;
    print_new_lines(&mut printed, &bot.display().journal);
    bot.shutdown()?;
    info!("Stopped");
    Ok(())
}

fn print_new_lines(printed: &mut Vec<String>, journal: &[String]) {
    for line in unseen(printed, journal) {
        println!("{line}");
    }
    *printed = journal.to_vec();
}

/// Lines of `journal` past its overlap with the tail of `printed`.
fn unseen<'a>(printed: &[String], journal: &'a [String]) -> &'a [String] {
    let overlap = (0..=printed.len().min(journal.len()))
        .rev()
        .find(|&n| printed[printed.len() - n..] == journal[..n])
        .unwrap_or(0);
    &journal[overlap..]
}
