//! In-memory stand-in for an attached process.

use std::cell::{Cell, RefCell};

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

/// A contiguous memory region starting at `base`.
///
/// Reads outside the region, or after [`MockMemoryReader::kill`], fail the way
/// a real `ReadProcessMemory` call would.
pub struct MockMemoryReader {
    base: u64,
    data: Vec<u8>,
    alive: Cell<bool>,
    reads: RefCell<Vec<(u64, usize)>>,
}

impl MockMemoryReader {
    /// Simulate the process exiting.
    pub fn kill(&self) {
        self.alive.set(false);
    }

    pub fn read_count(&self) -> usize {
        self.reads.borrow().len()
    }

    /// Largest single request seen so far.
    pub fn largest_read(&self) -> usize {
        self.reads
            .borrow()
            .iter()
            .map(|(_, size)| *size)
            .max()
            .unwrap_or(0)
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.reads.borrow_mut().push((address, size));

        if !self.alive.get() {
            return Err(Error::read_failed(address, "process exited"));
        }

        let start = address
            .checked_sub(self.base)
            .ok_or_else(|| Error::read_failed(address, "below mapped region"))?
            as usize;
        let end = start
            .checked_add(size)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| Error::read_failed(address, "beyond mapped region"))?;

        Ok(self.data[start..end].to_vec())
    }

    fn base_address(&self) -> u64 {
        self.base
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }
}

/// Builder for [`MockMemoryReader`]. Addresses passed to `write_*` are absolute.
#[derive(Default)]
pub struct MockMemoryBuilder {
    base: u64,
    data: Vec<u8>,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, base: u64) -> Self {
        self.base = base;
        self
    }

    pub fn write_bytes(mut self, address: u64, bytes: &[u8]) -> Self {
        let start = (address - self.base) as usize;
        let end = start + bytes.len();
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(bytes);
        self
    }

    pub fn write_i32(self, address: u64, value: i32) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_u32(self, address: u64, value: u32) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_u64(self, address: u64, value: u64) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_f32(self, address: u64, value: f32) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_u8(self, address: u64, value: u8) -> Self {
        self.write_bytes(address, &[value])
    }

    /// Write a NUL-padded text field of `field_len` bytes.
    pub fn write_text(self, address: u64, text: &str, field_len: usize) -> Self {
        let mut field = vec![0u8; field_len];
        let len = text.len().min(field_len);
        field[..len].copy_from_slice(&text.as_bytes()[..len]);
        self.write_bytes(address, &field)
    }

    /// Extend the mapped region with zeros up to `address` (exclusive).
    pub fn reserve_until(mut self, address: u64) -> Self {
        let end = (address - self.base) as usize;
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self
    }

    pub fn build(self) -> MockMemoryReader {
        MockMemoryReader {
            base: self.base,
            data: self.data,
            alive: Cell::new(true),
            reads: RefCell::new(Vec::new()),
        }
    }
}
