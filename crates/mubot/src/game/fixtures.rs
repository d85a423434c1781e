//! Fake game memory laid out per a fixed offset table.

use crate::game::EntityKind;
use crate::memory::{MockMemoryBuilder, MockMemoryReader};
use crate::offset::OffsetTable;

pub(crate) const PLAYER_BASE: u64 = 0x1000;
pub(crate) const ENTITY_LIST: u64 = 0x2000;
pub(crate) const ITEM_LIST: u64 = 0x10000;
const REGION_END: u64 = 0x13000;

pub(crate) fn offsets() -> OffsetTable {
    let mut table = OffsetTable::template();
    table.version = "test".to_string();
    table.player.base = PLAYER_BASE;
    table.entities.list = ENTITY_LIST;
    table.items.list = ITEM_LIST;
    table
}

#[derive(Debug, Clone)]
pub(crate) struct FakeEntity {
    pub name: String,
    pub kind: EntityKind,
    pub health: i32,
    pub max_health: i32,
    pub x: i32,
    pub y: i32,
    pub alive: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct GameMemory {
    pub name: String,
    pub level: i32,
    pub health: i32,
    pub max_health: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub x: i32,
    pub y: i32,
    pub entities: Vec<FakeEntity>,
    pub items: Vec<(String, i32, i32)>,
    pub entity_count: Option<i32>,
}

impl Default for GameMemory {
    fn default() -> Self {
        Self {
            name: "Hero".to_string(),
            level: 50,
            health: 100,
            max_health: 100,
            mana: 50,
            max_mana: 50,
            x: 100,
            y: 100,
            entities: Vec::new(),
            items: Vec::new(),
            entity_count: None,
        }
    }
}

impl GameMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn health(mut self, health: i32, max_health: i32) -> Self {
        self.health = health;
        self.max_health = max_health;
        self
    }

    pub fn mana(mut self, mana: i32, max_mana: i32) -> Self {
        self.mana = mana;
        self.max_mana = max_mana;
        self
    }

    pub fn level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn monster(self, name: &str, x: i32, y: i32) -> Self {
        self.entity(name, EntityKind::Monster, 1000, x, y, true)
    }

    pub fn rival(self, name: &str, health: i32, x: i32, y: i32) -> Self {
        self.entity(name, EntityKind::Player, health, x, y, true)
    }

    pub fn corpse(self, name: &str, kind: EntityKind, x: i32, y: i32) -> Self {
        self.entity(name, kind, 0, x, y, false)
    }

    pub fn entity(
        mut self,
        name: &str,
        kind: EntityKind,
        health: i32,
        x: i32,
        y: i32,
        alive: bool,
    ) -> Self {
        self.entities.push(FakeEntity {
            name: name.to_string(),
            kind,
            health,
            max_health: 1000,
            x,
            y,
            alive,
        });
        self
    }

    pub fn item(mut self, name: &str, x: i32, y: i32) -> Self {
        self.items.push((name.to_string(), x, y));
        self
    }

    /// Override the count field of the entity list.
    pub fn entity_count(mut self, count: i32) -> Self {
        self.entity_count = Some(count);
        self
    }

    pub fn build(&self) -> MockMemoryReader {
        let table = offsets();
        let p = &table.player;
        let mut mem = MockMemoryBuilder::new()
            .base(PLAYER_BASE)
            .reserve_until(REGION_END)
            .write_text(p.base + p.name, &self.name, p.name_len)
            .write_i32(p.base + p.level, self.level)
            .write_i32(p.base + p.health, self.health)
            .write_i32(p.base + p.max_health, self.max_health)
            .write_i32(p.base + p.mana, self.mana)
            .write_i32(p.base + p.max_mana, self.max_mana)
            .write_i32(p.base + p.pos_x, self.x)
            .write_i32(p.base + p.pos_y, self.y);

        let e = &table.entities;
        let count = self.entity_count.unwrap_or(self.entities.len() as i32);
        mem = mem.write_i32(e.list, count);
        for (i, entity) in self.entities.iter().enumerate() {
            let entry = e.list + e.array + i as u64 * e.stride;
            mem = mem
                .write_text(entry + e.name, &entity.name, e.name_len)
                .write_i32(entry + e.level, 40)
                .write_i32(entry + e.health, entity.health)
                .write_i32(entry + e.max_health, entity.max_health)
                .write_i32(entry + e.pos_x, entity.x)
                .write_i32(entry + e.pos_y, entity.y)
                .write_u8(entry + e.alive, u8::from(entity.alive))
                .write_u8(
                    entry + e.kind,
                    match entity.kind {
                        EntityKind::Monster => 0,
                        EntityKind::Player => 1,
                    },
                );
        }

        let it = &table.items;
        mem = mem.write_i32(it.list, self.items.len() as i32);
        for (i, (name, x, y)) in self.items.iter().enumerate() {
            let entry = it.list + it.array + i as u64 * it.stride;
            mem = mem
                .write_text(entry + it.name, name, it.name_len)
                .write_i32(entry + it.pos_x, *x)
                .write_i32(entry + it.pos_y, *y);
        }

        mem.build()
    }
}
