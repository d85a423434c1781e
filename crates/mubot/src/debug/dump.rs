//! Hexdump rendering.
//!
//! ```text
//! 0x00401000: 48 65 72 6F 00 00 00 00  32 00 00 00 64 00 00 00  |Hero....2...d...|
//! ```

use std::fmt::Write as _;

use crate::error::Result;
use crate::memory::ReadMemory;

const BYTES_PER_LINE: usize = 16;

/// Bytes captured from a fixed address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDump {
    pub address: u64,
    pub bytes: Vec<u8>,
}

impl MemoryDump {
    pub fn capture<R: ReadMemory + ?Sized>(source: &R, address: u64, size: usize) -> Result<Self> {
        Ok(Self {
            address,
            bytes: source.read_bytes(address, size)?,
        })
    }

    pub fn to_hexdump(&self, ascii: bool) -> String {
        format_hexdump(&self.bytes, self.address, ascii)
    }
}

/// Render `bytes` sixteen per line, labelled with absolute addresses.
pub fn format_hexdump(bytes: &[u8], base: u64, ascii: bool) -> String {
    let mut out = String::new();

    for (i, chunk) in bytes.chunks(BYTES_PER_LINE).enumerate() {
        let address = base.wrapping_add((i * BYTES_PER_LINE) as u64);
        let _ = write!(out, "0x{address:08X}: ");

        for j in 0..BYTES_PER_LINE {
            if j == 8 {
                out.push(' ');
            }
            match chunk.get(j) {
                Some(byte) => {
                    let _ = write!(out, "{byte:02X} ");
                }
                None => out.push_str("   "),
            }
        }

        if ascii {
            out.push_str(" |");
            for byte in chunk {
                out.push(if (0x20..0x7F).contains(byte) {
                    *byte as char
                } else {
                    '.'
                });
            }
            for _ in chunk.len()..BYTES_PER_LINE {
                out.push(' ');
            }
            out.push('|');
        }

        // Keep lines free of trailing spaces when the ASCII column is off.
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    }
    out
}
