//! Converts between `MapModel`'s `Tile` and the flat wire `TileRecord`
//! carried by `TILE_UPDATE` and `MAP_CHUNK` (spec.md §6.2). The wire
//! record is a deliberately lossy diff: ground id, stacked item
//! id/subtype pairs and house binding only, no attribute TLVs or
//! container recursion — the live engine replicates mutations, it does
//! not replace the file codec.

use mapforge_model::{Item, MapModel, Position, Tile};
use mapforge_protocol::TileRecord;

pub fn tile_to_record(tile: &Tile) -> TileRecord {
    TileRecord {
        x: tile.position.x as i32,
        y: tile.position.y as i32,
        z: tile.position.z,
        items: tile
            .items
            .iter()
            .map(|item| (item.server_id, item.subtype.unwrap_or(0)))
            .collect(),
        ground_id: tile.ground.as_ref().map(|g| g.server_id).unwrap_or(0),
        house_id: tile.house_id,
    }
}

/// Applies a received `TileRecord` to `map`, replacing the ground/items/
/// house binding of the tile at its position while preserving whatever
/// flags and markers the local copy already carries for that tile.
pub fn apply_record(map: &mut MapModel, record: &TileRecord) {
    let position = Position::new(record.x as u16, record.y as u16, record.z);
    let mut tile = map.get_tile(position.x, position.y, position.z).cloned().unwrap_or_else(|| Tile::new(position));

    tile.ground = if record.ground_id == 0 {
        None
    } else {
        Some(Item::new(record.ground_id))
    };
    tile.items = record
        .items
        .iter()
        .map(|&(server_id, subtype)| {
            let mut item = Item::new(server_id);
            if subtype != 0 {
                item.subtype = Some(subtype);
            }
            item
        })
        .collect();
    tile.house_id = record.house_id;

    map.put_tile(tile);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_round_trips_through_a_record() {
        let mut map = MapModel::new();
        let mut tile = Tile::new(Position::new(10, 20, 7));
        tile.ground = Some(Item::new(100));
        tile.house_id = Some(3);
        let mut stacked = Item::new(200);
        stacked.subtype = Some(5);
        tile.items.push(stacked);
        map.put_tile(tile.clone());

        let record = tile_to_record(map.get_tile(10, 20, 7).unwrap());
        let mut fresh = MapModel::new();
        apply_record(&mut fresh, &record);

        let applied = fresh.get_tile(10, 20, 7).unwrap();
        assert_eq!(applied.ground.as_ref().unwrap().server_id, 100);
        assert_eq!(applied.house_id, Some(3));
        assert_eq!(applied.items[0].server_id, 200);
        assert_eq!(applied.items[0].subtype, Some(5));
    }

    #[test]
    fn apply_preserves_existing_flags_not_carried_on_the_wire() {
        let mut map = MapModel::new();
        let mut tile = Tile::new(Position::new(1, 1, 0));
        tile.map_flags = 0x12;
        map.put_tile(tile);

        apply_record(
            &mut map,
            &TileRecord {
                x: 1,
                y: 1,
                z: 0,
                items: vec![],
                ground_id: 50,
                house_id: None,
            },
        );

        let tile = map.get_tile(1, 1, 0).unwrap();
        assert_eq!(tile.map_flags, 0x12);
        assert_eq!(tile.ground.as_ref().unwrap().server_id, 50);
    }
}
