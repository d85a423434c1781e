//! Raw and best-effort memory reads.
//!
//! [`ReadMemory`] is the fallible, byte-level source (the attached process, or
//! an in-memory mock in tests). [`MemoryReader`] layers typed reads on top and
//! never fails: a read that does not complete yields the type's zero value and
//! is counted, so callers can tolerate a process that exits mid-tick.

use std::cell::Cell;

use encoding_rs::WINDOWS_1252;
use tracing::trace;

use crate::error::{Error, Result};

/// Upper bound for fixed-length text fields.
pub const MAX_TEXT_LEN: usize = 255;

/// Byte-level access to another process's address space.
pub trait ReadMemory {
    /// Read exactly `size` bytes at `address`. Partial reads are errors.
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Base address of the main module, used for module-relative offsets.
    fn base_address(&self) -> u64 {
        0
    }

    /// Whether the source process is still running.
    fn is_alive(&self) -> bool {
        true
    }

    fn read_i32(&self, address: u64) -> Result<i32> {
        Ok(i32::from_le_bytes(fixed(address, self.read_bytes(address, 4)?)?))
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        Ok(u32::from_le_bytes(fixed(address, self.read_bytes(address, 4)?)?))
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        Ok(u64::from_le_bytes(fixed(address, self.read_bytes(address, 8)?)?))
    }

    fn read_f32(&self, address: u64) -> Result<f32> {
        Ok(f32::from_le_bytes(fixed(address, self.read_bytes(address, 4)?)?))
    }

    fn read_u8(&self, address: u64) -> Result<u8> {
        let [byte] = fixed::<1>(address, self.read_bytes(address, 1)?)?;
        Ok(byte)
    }
}

fn fixed<const N: usize>(address: u64, bytes: Vec<u8>) -> Result<[u8; N]> {
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| Error::read_failed(address, format!("expected {N} bytes, got {}", bytes.len())))
}

/// Decode a fixed-length game text field.
///
/// The result ends at the first NUL byte, or at the end of `bytes` if the
/// field has no terminator.
pub fn decode_text(bytes: &[u8]) -> String {
    let end = memchr::memchr(0, bytes).unwrap_or(bytes.len());
    let (text, _, _) = WINDOWS_1252.decode(&bytes[..end]);
    text.into_owned()
}

/// Typed best-effort reader over a [`ReadMemory`] source.
pub struct MemoryReader<'a, R: ReadMemory + ?Sized> {
    source: &'a R,
    failures: Cell<u32>,
}

impl<'a, R: ReadMemory + ?Sized> MemoryReader<'a, R> {
    pub fn new(source: &'a R) -> Self {
        Self {
            source,
            failures: Cell::new(0),
        }
    }

    pub fn source(&self) -> &'a R {
        self.source
    }

    /// Number of reads that fell back to a default since the last reset.
    pub fn failures(&self) -> u32 {
        self.failures.get()
    }

    pub fn reset_failures(&self) {
        self.failures.set(0);
    }

    pub fn read_i32(&self, address: u64) -> i32 {
        self.settle(address, self.read_sized::<4>(address).map(i32::from_le_bytes))
    }

    pub fn read_u32(&self, address: u64) -> u32 {
        self.settle(address, self.read_sized::<4>(address).map(u32::from_le_bytes))
    }

    pub fn read_f32(&self, address: u64) -> f32 {
        self.settle(address, self.read_sized::<4>(address).map(f32::from_le_bytes))
    }

    pub fn read_u8(&self, address: u64) -> u8 {
        self.settle(address, self.read_sized::<1>(address).map(|[b]| b))
    }

    pub fn read_bool(&self, address: u64) -> bool {
        self.read_u8(address) != 0
    }

    /// Read a fixed-length text field of at most `max_len` bytes.
    ///
    /// Never requests more than `min(max_len, MAX_TEXT_LEN)` bytes. Returns an
    /// empty string when the read fails.
    pub fn read_text(&self, address: u64, max_len: usize) -> String {
        let len = max_len.min(MAX_TEXT_LEN);
        if len == 0 {
            return String::new();
        }

        let mut bytes = self.settle(address, self.source.read_bytes(address, len));
        bytes.truncate(len);
        decode_text(&bytes)
    }

    fn read_sized<const N: usize>(&self, address: u64) -> Result<[u8; N]> {
        fixed(address, self.source.read_bytes(address, N)?)
    }

    fn settle<T: Default>(&self, address: u64, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                trace!("Read at {:#x} fell back to default: {}", address, e);
                self.failures.set(self.failures.get().saturating_add(1));
                T::default()
            }
        }
    }
}
