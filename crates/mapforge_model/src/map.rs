use std::collections::HashMap;

use crate::{House, MapHeader, MonsterSpawnArea, NpcSpawnArea, Position, Tile, Town, Zone};

/// Root aggregate: header plus every entity collection. Constructed empty
/// by a codec's `load` and mutated in place while parsing; by convention
/// immutable after a successful load unless an editor session holds it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapModel {
    header: MapHeader,
    tiles: HashMap<Position, Tile>,
    towns: HashMap<u32, Town>,
    houses: HashMap<u32, House>,
    zones: HashMap<u32, Zone>,
    waypoints: HashMap<String, Position>,
    monster_spawns: Vec<MonsterSpawnArea>,
    npc_spawns: Vec<NpcSpawnArea>,
}

impl MapModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &MapHeader {
        &self.header
    }

    pub fn set_header(&mut self, header: MapHeader) {
        self.header = header;
    }

    /// Replaces any tile at `tile.position`. Editing is copy-on-write: the
    /// caller constructs the full new `Tile` value and hands it over.
    pub fn put_tile(&mut self, tile: Tile) -> Option<Tile> {
        self.tiles.insert(tile.position, tile)
    }

    pub fn get_tile(&self, x: u16, y: u16, z: u8) -> Option<&Tile> {
        self.tiles.get(&Position::new(x, y, z))
    }

    pub fn remove_tile(&mut self, position: Position) -> Option<Tile> {
        self.tiles.remove(&position)
    }

    pub fn iter_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn put_town(&mut self, town: Town) -> Option<Town> {
        self.towns.insert(town.id, town)
    }

    pub fn get_town(&self, id: u32) -> Option<&Town> {
        self.towns.get(&id)
    }

    pub fn iter_towns(&self) -> impl Iterator<Item = &Town> {
        self.towns.values()
    }

    pub fn put_house(&mut self, house: House) -> Option<House> {
        self.houses.insert(house.id, house)
    }

    pub fn get_house(&self, id: u32) -> Option<&House> {
        self.houses.get(&id)
    }

    pub fn iter_houses(&self) -> impl Iterator<Item = &House> {
        self.houses.values()
    }

    pub fn put_zone(&mut self, zone: Zone) -> Option<Zone> {
        self.zones.insert(zone.id, zone)
    }

    pub fn get_zone(&self, id: u32) -> Option<&Zone> {
        self.zones.get(&id)
    }

    pub fn iter_zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.values()
    }

    pub fn append_monster_spawn(&mut self, area: MonsterSpawnArea) {
        self.monster_spawns.push(area);
    }

    pub fn iter_monster_spawns(&self) -> impl Iterator<Item = &MonsterSpawnArea> {
        self.monster_spawns.iter()
    }

    pub fn append_npc_spawn(&mut self, area: NpcSpawnArea) {
        self.npc_spawns.push(area);
    }

    pub fn iter_npc_spawns(&self) -> impl Iterator<Item = &NpcSpawnArea> {
        self.npc_spawns.iter()
    }

    pub fn set_waypoint(&mut self, name: impl Into<String>, position: Position) {
        self.waypoints.insert(name.into(), position);
    }

    pub fn get_waypoint(&self, name: &str) -> Option<&Position> {
        self.waypoints.get(name)
    }

    pub fn iter_waypoints(&self) -> impl Iterator<Item = (&String, &Position)> {
        self.waypoints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_tile_replaces_existing() {
        let mut map = MapModel::new();
        let pos = Position::new(1, 2, 3);
        map.put_tile(Tile::new(pos));
        let mut replacement = Tile::new(pos);
        replacement.modified = true;
        map.put_tile(replacement);

        assert_eq!(map.tile_count(), 1);
        assert!(map.get_tile(1, 2, 3).unwrap().modified);
    }

    #[test]
    fn keyed_collections_keep_last_insert() {
        let mut map = MapModel::new();
        map.put_town(Town {
            id: 1,
            name: "Old".into(),
            temple_position: Position::new(0, 0, 0),
        });
        map.put_town(Town {
            id: 1,
            name: "New".into(),
            temple_position: Position::new(0, 0, 0),
        });
        assert_eq!(map.get_town(1).unwrap().name, "New");
    }
}
