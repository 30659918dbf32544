/// A monster or NPC instance, either sitting on a `Tile` or seeded from a
/// spawn entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creature {
    pub name: String,
    pub direction: u8,
    pub outfit: Option<u16>,
}

impl Creature {
    pub const DEFAULT_DIRECTION: u8 = 2;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: Self::DEFAULT_DIRECTION,
            outfit: None,
        }
    }
}

/// One spawn candidate within a `MonsterSpawnArea` or `NpcSpawnArea`,
/// stored center-relative (`dx`/`dy`) so the area is origin-stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnEntry {
    pub name: String,
    pub dx: i16,
    pub dy: i16,
    pub spawntime: u32,
    pub direction: Option<u8>,
    pub weight: Option<u16>,
}

impl SpawnEntry {
    pub fn new(name: impl Into<String>, dx: i16, dy: i16, spawntime: u32) -> Self {
        Self {
            name: name.into(),
            dx,
            dy,
            spawntime,
            direction: None,
            weight: None,
        }
    }
}

/// A named area producing monster spawn entries around `center`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterSpawnArea {
    pub center: crate::Position,
    pub radius: u32,
    pub entries: Vec<SpawnEntry>,
}

/// An NPC equivalent of `MonsterSpawnArea`; structurally identical, kept
/// as a distinct type so `MapModel` can hold separate collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcSpawnArea {
    pub center: crate::Position,
    pub radius: u32,
    pub entries: Vec<SpawnEntry>,
}
