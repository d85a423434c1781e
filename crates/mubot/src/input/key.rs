use std::fmt;
use std::str::FromStr;

use strum::{EnumIter, EnumString, FromRepr, IntoStaticStr};

use crate::error::{Error, Result};

/// Windows virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const TAB: KeyCode = KeyCode(0x09);
    pub const ENTER: KeyCode = KeyCode(0x0D);
    pub const ALT: KeyCode = KeyCode(0x12);
    pub const ESC: KeyCode = KeyCode(0x1B);
    pub const SPACE: KeyCode = KeyCode(0x20);
    pub const F1: KeyCode = KeyCode(0x70);
    pub const F2: KeyCode = KeyCode(0x71);
    pub const F3: KeyCode = KeyCode(0x72);
    pub const F4: KeyCode = KeyCode(0x73);
    pub const F5: KeyCode = KeyCode(0x74);
    pub const F6: KeyCode = KeyCode(0x75);
    pub const F7: KeyCode = KeyCode(0x76);
    pub const F8: KeyCode = KeyCode(0x77);
    pub const F9: KeyCode = KeyCode(0x78);
    pub const F10: KeyCode = KeyCode(0x79);
    pub const F11: KeyCode = KeyCode(0x7A);
    pub const F12: KeyCode = KeyCode(0x7B);

    pub fn code(self) -> u16 {
        self.0
    }

    /// Symbolic name, if the code has one.
    pub fn name(self) -> Option<&'static str> {
        NamedKey::from_repr(self.0).map(Into::into)
    }
}

impl From<NamedKey> for KeyCode {
    fn from(key: NamedKey) -> Self {
        KeyCode(key as u16)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

impl FromStr for KeyCode {
    type Err = Error;

    /// Accepts a key name (`F1`, `space`, `a`, `7`) or a hex code (`0x70`).
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"));
        if let Some(digits) = hex {
            return u16::from_str_radix(digits, 16)
                .ok()
                .filter(|code| *code != 0)
                .map(KeyCode)
                .ok_or_else(|| Error::InvalidKey(s.to_string()));
        }

        NamedKey::from_str(s)
            .map(KeyCode::from)
            .map_err(|_| Error::InvalidKey(s.to_string()))
    }
}

/// Keys with a configurable name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr, EnumString, EnumIter, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
#[repr(u16)]
pub enum NamedKey {
    #[strum(serialize = "TAB")]
    Tab = 0x09,
    #[strum(to_string = "ENTER", serialize = "RETURN")]
    Enter = 0x0D,
    #[strum(to_string = "ALT", serialize = "MENU")]
    Alt = 0x12,
    #[strum(to_string = "ESC", serialize = "ESCAPE")]
    Esc = 0x1B,
    #[strum(serialize = "SPACE")]
    Space = 0x20,
    #[strum(serialize = "0")]
    Digit0 = 0x30,
    #[strum(serialize = "1")]
    Digit1 = 0x31,
    #[strum(serialize = "2")]
    Digit2 = 0x32,
    #[strum(serialize = "3")]
    Digit3 = 0x33,
    #[strum(serialize = "4")]
    Digit4 = 0x34,
    #[strum(serialize = "5")]
    Digit5 = 0x35,
    #[strum(serialize = "6")]
    Digit6 = 0x36,
    #[strum(serialize = "7")]
    Digit7 = 0x37,
    #[strum(serialize = "8")]
    Digit8 = 0x38,
    #[strum(serialize = "9")]
    Digit9 = 0x39,
    A = 0x41,
    B = 0x42,
    C = 0x43,
    D = 0x44,
    E = 0x45,
    F = 0x46,
    G = 0x47,
    H = 0x48,
    I = 0x49,
    J = 0x4A,
    K = 0x4B,
    L = 0x4C,
    M = 0x4D,
    N = 0x4E,
    O = 0x4F,
    P = 0x50,
    Q = 0x51,
    R = 0x52,
    S = 0x53,
    T = 0x54,
    U = 0x55,
    V = 0x56,
    W = 0x57,
    X = 0x58,
    Y = 0x59,
    Z = 0x5A,
    F1 = 0x70,
    F2 = 0x71,
    F3 = 0x72,
    F4 = 0x73,
    F5 = 0x74,
    F6 = 0x75,
    F7 = 0x76,
    F8 = 0x77,
    F9 = 0x78,
    F10 = 0x79,
    F11 = 0x7A,
    F12 = 0x7B,
}
