use crate::{Creature, Item, Position};

/// Bit assignments for `Tile.map_flags`.
pub mod tile_flags {
    pub const PROTECTION_ZONE: u32 = 1 << 0;
    pub const NO_PVP: u32 = 1 << 2;
    pub const NO_LOGOUT: u32 = 1 << 3;
    pub const PVP_ZONE: u32 = 1 << 4;
}

/// Everything at one coordinate. Created on first write, dropped when
/// cleared; owned by `MapModel.tiles`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tile {
    pub position: Position,
    pub ground: Option<Item>,
    /// Stacked items, bottom-of-stack first, top-of-stack last.
    pub items: Vec<Item>,
    pub house_id: Option<u32>,
    pub map_flags: u32,
    pub zones: std::collections::BTreeSet<u32>,
    pub monsters: Vec<Creature>,
    pub npc: Option<Creature>,
    pub monster_spawn_area: Option<Position>,
    pub npc_spawn_area: Option<Position>,
    pub modified: bool,
}

impl Tile {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// A tile with none of ground/items/creature/spawn marker is never
    /// persisted (spec invariant).
    pub fn is_empty(&self) -> bool {
        self.ground.is_none()
            && self.items.is_empty()
            && self.monsters.is_empty()
            && self.npc.is_none()
            && self.monster_spawn_area.is_none()
            && self.npc_spawn_area.is_none()
    }
}
