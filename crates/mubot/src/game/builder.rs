use chrono::Local;
use tracing::{debug, trace};

use crate::game::{EntityInfo, EntityKind, ItemSighting, PlayerSnapshot, Position, Snapshot};
use crate::memory::{MemoryReader, ReadMemory};
use crate::offset::OffsetTable;

/// Upper bound on entity list entries read per tick.
pub const MAX_ENTITIES: usize = 256;
/// Upper bound on ground item entries read per tick.
pub const MAX_ITEMS: usize = 128;

/// Rebuilds a [`Snapshot`] from process memory once per tick.
pub struct SnapshotBuilder {
    offsets: OffsetTable,
    last: Snapshot,
}

impl SnapshotBuilder {
    pub fn new(offsets: OffsetTable) -> Self {
        Self {
            offsets,
            last: Snapshot::default(),
        }
    }

    pub fn offsets(&self) -> &OffsetTable {
        &self.offsets
    }

    pub fn set_offsets(&mut self, offsets: OffsetTable) {
        self.offsets = offsets;
    }

    /// The snapshot produced by the most recent refresh.
    pub fn last(&self) -> &Snapshot {
        &self.last
    }

    /// Read a fresh snapshot, or mark the previous one stale when there is
    /// nothing to read from.
    ///
    /// A missing source, an exited process or an unusable offset table all
    /// yield the previous player with `valid == false` and no entities or
    /// items.
    pub fn refresh<R: ReadMemory + ?Sized>(&mut self, source: Option<&R>) -> &Snapshot {
        self.last = match source {
            Some(source) if source.is_alive() && self.offsets.is_valid() => self.read(source),
            _ => self.stale(),
        };
        &self.last
    }

    fn stale(&self) -> Snapshot {
        Snapshot {
            player: PlayerSnapshot {
                valid: false,
                ..self.last.player.clone()
            },
            ..Snapshot::default()
        }
    }

    fn read<R: ReadMemory + ?Sized>(&self, source: &R) -> Snapshot {
        let reader = MemoryReader::new(source);
        let module_base = source.base_address();

        let player = self.read_player(&reader, module_base);
        let (entities, fallen) = self.read_entities(&reader, module_base, player.position);
        let items = self.read_items(&reader, module_base);

        trace!(
            "Snapshot: player valid={} entities={} fallen={} items={}",
            player.valid,
            entities.len(),
            fallen.len(),
            items.len()
        );

        Snapshot {
            player,
            entities,
            items,
            fallen,
            taken_at: Some(Local::now()),
        }
    }

    fn read_player<R: ReadMemory + ?Sized>(
        &self,
        reader: &MemoryReader<'_, R>,
        module_base: u64,
    ) -> PlayerSnapshot {
        let layout = &self.offsets.player;
        let base = self.offsets.resolve(layout.base, module_base);

        reader.reset_failures();
        let player = PlayerSnapshot {
            name: reader.read_text(base.wrapping_add(layout.name), layout.name_len),
            level: reader.read_i32(base.wrapping_add(layout.level)),
            health: reader.read_i32(base.wrapping_add(layout.health)),
            max_health: reader.read_i32(base.wrapping_add(layout.max_health)),
            mana: reader.read_i32(base.wrapping_add(layout.mana)),
            max_mana: reader.read_i32(base.wrapping_add(layout.max_mana)),
            position: Position::new(
                reader.read_i32(base.wrapping_add(layout.pos_x)),
                reader.read_i32(base.wrapping_add(layout.pos_y)),
            ),
            valid: false,
        };

        let failures = reader.failures();
        if failures > 0 {
            debug!("Player block had {} failed reads", failures);
        }
        PlayerSnapshot {
            valid: failures == 0,
            ..player
        }
    }

    fn read_entities<R: ReadMemory + ?Sized>(
        &self,
        reader: &MemoryReader<'_, R>,
        module_base: u64,
        origin: Position,
    ) -> (Vec<EntityInfo>, Vec<String>) {
        if !self.offsets.has_entities() {
            return (Vec::new(), Vec::new());
        }

        let layout = &self.offsets.entities;
        let list = self.offsets.resolve(layout.list, module_base);
        let count = clamp_count(reader.read_i32(list), MAX_ENTITIES);

        let mut entities = Vec::with_capacity(count);
        let mut fallen = Vec::new();
        for index in 0..count as u64 {
            let entry = entry_address(list, layout.array, layout.stride, index);

            reader.reset_failures();
            let alive = reader.read_bool(entry.wrapping_add(layout.alive));
            let name = reader.read_text(entry.wrapping_add(layout.name), layout.name_len);
            if reader.failures() > 0 {
                continue;
            }

            if !alive {
                if !name.is_empty() {
                    fallen.push(name);
                }
                continue;
            }

            let position = Position::new(
                reader.read_i32(entry.wrapping_add(layout.pos_x)),
                reader.read_i32(entry.wrapping_add(layout.pos_y)),
            );
            let entity = EntityInfo {
                name,
                kind: EntityKind::from_raw(reader.read_u8(entry.wrapping_add(layout.kind))),
                level: reader.read_i32(entry.wrapping_add(layout.level)),
                health: reader.read_i32(entry.wrapping_add(layout.health)),
                max_health: reader.read_i32(entry.wrapping_add(layout.max_health)),
                distance: position.distance_to(origin),
                position,
                alive,
            };
            if reader.failures() == 0 {
                entities.push(entity);
            }
        }

        (entities, fallen)
    }

    fn read_items<R: ReadMemory + ?Sized>(
        &self,
        reader: &MemoryReader<'_, R>,
        module_base: u64,
    ) -> Vec<ItemSighting> {
        if !self.offsets.has_items() {
            return Vec::new();
        }

        let layout = &self.offsets.items;
        let list = self.offsets.resolve(layout.list, module_base);
        let count = clamp_count(reader.read_i32(list), MAX_ITEMS);

        (0..count as u64)
            .filter_map(|index| {
                let entry = entry_address(list, layout.array, layout.stride, index);
                reader.reset_failures();
                let item = ItemSighting {
                    name: reader.read_text(entry.wrapping_add(layout.name), layout.name_len),
                    position: Position::new(
                        reader.read_i32(entry.wrapping_add(layout.pos_x)),
                        reader.read_i32(entry.wrapping_add(layout.pos_y)),
                    ),
                };
                (reader.failures() == 0 && !item.name.is_empty()).then_some(item)
            })
            .collect()
    }
}

/// Address of list entry `index`. Out-of-range tables wrap and then fail to
/// read instead of panicking.
fn entry_address(list: u64, array: u64, stride: u64, index: u64) -> u64 {
    list.wrapping_add(array).wrapping_add(index.wrapping_mul(stride))
}

fn clamp_count(raw: i32, max: usize) -> usize {
    usize::try_from(raw).unwrap_or(0).min(max)
}
