//! Memory inspection helpers for building and checking offset tables.
//!
//! - Raw dumps of a memory range (`MemoryDump`)
//! - Readability of each configured structure plus a decoded snapshot (`StatusInfo`)

mod dump;
mod status;

pub use dump::{MemoryDump, format_hexdump};
pub use status::{RegionCheck, StatusInfo};
