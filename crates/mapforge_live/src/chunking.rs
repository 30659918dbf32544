//! Partitions a `MAP_REQUEST` result into `MAP_CHUNK` frames (spec.md
//! §4.5.7). The chunking strategy itself is an open question in spec.md
//! §9 ("clients must tolerate any partition satisfying §4.5.7"); this
//! implementation partitions by a fixed tile-count budget per chunk,
//! sorted `(y, x)` so repeated requests produce a stable chunk sequence.

use mapforge_model::MapModel;
use mapforge_protocol::{MapChunk, MapRequest};

use crate::tile_bridge::tile_to_record;

/// Tiles per chunk. Chosen so a chunk's encoded size stays comfortably
/// under the 16 MiB frame cap even for heavily stacked tiles.
pub const DEFAULT_CHUNK_TILE_BUDGET: usize = 4096;

pub fn build_chunks(map: &MapModel, request: &MapRequest, chunk_tile_budget: usize) -> Vec<MapChunk> {
    let mut tiles: Vec<_> = map
        .iter_tiles()
        .filter(|tile| {
            tile.position.z == request.z
                && (tile.position.x as i32) >= request.x_min
                && (tile.position.x as i32) <= request.x_max
                && (tile.position.y as i32) >= request.y_min
                && (tile.position.y as i32) <= request.y_max
        })
        .collect();
    tiles.sort_by_key(|tile| (tile.position.y, tile.position.x));

    let records: Vec<_> = tiles.iter().map(|tile| tile_to_record(tile)).collect();
    let chunk_tile_budget = chunk_tile_budget.max(1);
    let groups: Vec<_> = records.chunks(chunk_tile_budget).collect();
    let total_chunks = groups.len().max(1) as u32;

    if groups.is_empty() {
        return vec![MapChunk {
            chunk_id: 0,
            total_chunks: 1,
            x_min: request.x_min,
            y_min: request.y_min,
            z: request.z,
            tiles: Vec::new(),
        }];
    }

    groups
        .into_iter()
        .enumerate()
        .map(|(chunk_id, tiles)| MapChunk {
            chunk_id: chunk_id as u32,
            total_chunks,
            x_min: request.x_min,
            y_min: request.y_min,
            z: request.z,
            tiles: tiles.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use mapforge_model::{Item, Position, Tile};

    use super::*;

    fn request(x_max: i32, y_max: i32) -> MapRequest {
        MapRequest {
            x_min: 0,
            y_min: 0,
            x_max,
            y_max,
            z: 0,
        }
    }

    #[test]
    fn splits_into_multiple_chunks_past_the_budget() {
        let mut map = MapModel::new();
        for x in 0..10u16 {
            let mut tile = Tile::new(Position::new(x, 0, 0));
            tile.ground = Some(Item::new(100));
            map.put_tile(tile);
        }

        let chunks = build_chunks(&map, &request(20, 20), 4);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].total_chunks, 3);
        assert_eq!(chunks[0].tiles.len(), 4);
        assert_eq!(chunks[2].tiles.len(), 2);
    }

    #[test]
    fn an_empty_region_yields_a_single_empty_chunk() {
        let map = MapModel::new();
        let chunks = build_chunks(&map, &request(5, 5), 4096);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].total_chunks, 1);
        assert!(chunks[0].tiles.is_empty());
    }

    #[test]
    fn tiles_outside_the_rectangle_are_excluded() {
        let mut map = MapModel::new();
        let mut inside = Tile::new(Position::new(1, 1, 0));
        inside.ground = Some(Item::new(1));
        map.put_tile(inside);
        let mut outside = Tile::new(Position::new(50, 50, 0));
        outside.ground = Some(Item::new(2));
        map.put_tile(outside);

        let chunks = build_chunks(&map, &request(5, 5), 4096);
        assert_eq!(chunks[0].tiles.len(), 1);
        assert_eq!(chunks[0].tiles[0].ground_id, 1);
    }
}
