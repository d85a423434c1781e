//! Destinations for synthesized key events.

use tracing::info;

use crate::error::{Error, Result};
use crate::input::KeyCode;

/// Injects single key transitions into the OS input stream.
pub trait KeySink: Send {
    fn key_down(&self, key: KeyCode) -> Result<()>;
    fn key_up(&self, key: KeyCode) -> Result<()>;
}

/// The platform's real input path.
pub fn system_sink() -> Box<dyn KeySink> {
    #[cfg(target_os = "windows")]
    {
        Box::new(SendInputSink)
    }
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(UnsupportedSink)
    }
}

/// `SendInput`-based keyboard injection.
#[cfg(target_os = "windows")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SendInputSink;

#[cfg(target_os = "windows")]
impl SendInputSink {
    fn send(key: KeyCode, up: bool) -> Result<()> {
        use windows::Win32::UI::Input::KeyboardAndMouse::{
            INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP,
            SendInput, VIRTUAL_KEY,
        };

        let flags = if up {
            KEYEVENTF_KEYUP
        } else {
            KEYBD_EVENT_FLAGS(0)
        };
        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(key.code()),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };

        // SAFETY: the slice holds one fully initialised INPUT and cbsize
        // matches its size.
        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        if sent == 1 {
            Ok(())
        } else {
            Err(Error::ActuationFailed(format!(
                "SendInput rejected {} {}: {}",
                key,
                if up { "release" } else { "press" },
                windows::core::Error::from_win32()
            )))
        }
    }
}

#[cfg(target_os = "windows")]
impl KeySink for SendInputSink {
    fn key_down(&self, key: KeyCode) -> Result<()> {
        Self::send(key, false)
    }

    fn key_up(&self, key: KeyCode) -> Result<()> {
        Self::send(key, true)
    }
}

/// Rejects every event; stands in for injection on hosts without it.
#[cfg(not(target_os = "windows"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSink;

#[cfg(not(target_os = "windows"))]
impl KeySink for UnsupportedSink {
    fn key_down(&self, key: KeyCode) -> Result<()> {
        Err(Error::ActuationFailed(format!(
            "cannot press {key}: input injection is only supported on Windows"
        )))
    }

    fn key_up(&self, key: KeyCode) -> Result<()> {
        Err(Error::ActuationFailed(format!(
            "cannot release {key}: input injection is only supported on Windows"
        )))
    }
}

/// Logs key events instead of injecting them.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunSink;

impl KeySink for DryRunSink {
    fn key_down(&self, key: KeyCode) -> Result<()> {
        info!("[dry-run] press {}", key);
        Ok(())
    }

    fn key_up(&self, key: KeyCode) -> Result<()> {
        info!("[dry-run] release {}", key);
        Ok(())
    }
}

#[cfg(test)]
pub use recording::*;

#[cfg(test)]
mod recording {
    use std::sync::{Arc, Mutex};

    use super::KeySink;
    use crate::error::{Error, Result};
    use crate::input::KeyCode;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum KeyEvent {
        Down(KeyCode),
        Up(KeyCode),
    }

    /// Records every event; optionally rejects presses.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSink {
        events: Arc<Mutex<Vec<KeyEvent>>>,
        reject_presses: Arc<Mutex<bool>>,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reject_presses(&self, reject: bool) {
            *self.reject_presses.lock().unwrap() = reject;
        }

        pub fn events(&self) -> Vec<KeyEvent> {
            self.events.lock().unwrap().clone()
        }

        /// Keys that completed a press/release pair, in order.
        pub fn taps(&self) -> Vec<KeyCode> {
            self.events()
                .into_iter()
                .filter_map(|event| match event {
                    KeyEvent::Up(key) => Some(key),
                    KeyEvent::Down(_) => None,
                })
                .collect()
        }
    }

    impl KeySink for RecordingSink {
        fn key_down(&self, key: KeyCode) -> Result<()> {
            if *self.reject_presses.lock().unwrap() {
                return Err(Error::ActuationFailed(format!("rejected {key}")));
            }
            self.events.lock().unwrap().push(KeyEvent::Down(key));
            Ok(())
        }

        fn key_up(&self, key: KeyCode) -> Result<()> {
            self.events.lock().unwrap().push(KeyEvent::Up(key));
            Ok(())
        }
    }
}
