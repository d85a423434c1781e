use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mubot::{ActionId, BehaviorKind, ExportFormat, Mode, ShutdownSignal, UiCommand};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use strum::IntoEnumIterator;
use tracing::debug;

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Command(UiCommand),
}

/// Key bindings shown at startup.
pub const HELP: &str = "\
Keys: 1-8 toggle behavior | e PvE | p PvP | l learning | x/j export txt/json
      c clear stats | s stop all | y confirm | n cancel | r reattach | q quit";

/// Spawn a thread that turns key presses into [`UiCommand`]s.
///
/// Esc, q and Ctrl+C trigger shutdown directly; everything else is forwarded
/// to the worker. The thread exits once shutdown is triggered or the worker
/// stops listening.
pub fn spawn_keyboard_monitor(
    commands: Sender<UiCommand>,
    shutdown: Arc<ShutdownSignal>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        debug!("Keyboard monitor started");

        while !shutdown.is_shutdown() {
            // Poll with a timeout so shutdown is noticed
            if !event::poll(Duration::from_millis(100)).unwrap_or(false) {
                continue;
            }
            let Ok(Event::Key(key_event)) = event::read() else {
                continue;
            };
            if key_event.kind == KeyEventKind::Release {
                continue;
            }

            match map_key(&key_event) {
                Some(KeyAction::Quit) => {
                    debug!("Shutdown key pressed: {:?}", key_event.code);
                    shutdown.trigger();
                    break;
                }
                Some(KeyAction::Command(command)) => {
                    if commands.send(command).is_err() {
                        break;
                    }
                }
                None => {}
            }
        }

        debug!("Keyboard monitor stopped");
    })
}

/// Map a key event to an action.
pub fn map_key(event: &KeyEvent) -> Option<KeyAction> {
    let command = match event.code {
        KeyCode::Esc => return Some(KeyAction::Quit),
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
            return Some(KeyAction::Quit);
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(KeyAction::Quit),
        KeyCode::Char(digit @ '1'..='8') => {
            let index = digit as usize - '1' as usize;
            UiCommand::ToggleBehavior(BehaviorKind::iter().nth(index)?)
        }
        KeyCode::Char('e') => UiCommand::ToggleMode(Mode::Pve),
        KeyCode::Char('p') => UiCommand::ToggleMode(Mode::Pvp),
        KeyCode::Char('l') => UiCommand::ToggleLearning,
        KeyCode::Char('x') => UiCommand::ExportSession(ExportFormat::Txt),
        KeyCode::Char('j') => UiCommand::ExportSession(ExportFormat::Json),
        KeyCode::Char('c') => UiCommand::RequestConfirm(ActionId::ClearStats),
        KeyCode::Char('s') => UiCommand::RequestConfirm(ActionId::StopAll),
        KeyCode::Char('y') | KeyCode::Enter => UiCommand::Confirm,
        KeyCode::Char('n') => UiCommand::Cancel,
        KeyCode::Char('r') => UiCommand::Reattach,
        _ => return None,
    };
    Some(KeyAction::Command(command))
}
