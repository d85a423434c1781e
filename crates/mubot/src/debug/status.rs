//! One-shot status report for an attached process.

use crate::game::{Snapshot, SnapshotBuilder};
use crate::memory::ReadMemory;
use crate::offset::OffsetTable;

/// Whether the start of one configured structure can be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionCheck {
    pub name: &'static str,
    pub address: u64,
    pub readable: bool,
}

#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub offsets_version: String,
    pub offsets_valid: bool,
    pub base_address: u64,
    pub regions: Vec<RegionCheck>,
    pub snapshot: Snapshot,
}

impl StatusInfo {
    pub fn collect<R: ReadMemory + ?Sized>(source: &R, offsets: &OffsetTable) -> Self {
        let base = source.base_address();
        let mut regions = vec![region(source, "player", offsets.resolve(offsets.player.base, base))];
        if offsets.has_entities() {
            regions.push(region(
                source,
                "entities",
                offsets.resolve(offsets.entities.list, base),
            ));
        }
        if offsets.has_items() {
            regions.push(region(source, "items", offsets.resolve(offsets.items.list, base)));
        }

        let mut builder = SnapshotBuilder::new(offsets.clone());
        let snapshot = builder.refresh(Some(source)).clone();

        Self {
            offsets_version: offsets.version.clone(),
            offsets_valid: offsets.is_valid(),
            base_address: base,
            regions,
            snapshot,
        }
    }

    pub fn all_readable(&self) -> bool {
        self.regions.iter().all(|r| r.readable)
    }
}

fn region<R: ReadMemory + ?Sized>(source: &R, name: &'static str, address: u64) -> RegionCheck {
    RegionCheck {
        name,
        address,
        readable: source.read_bytes(address, 4).is_ok(),
    }
}
