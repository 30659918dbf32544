use mapforge_io::{ByteReader, ByteWriter};

use crate::tile_record::TileRecord;

/// One partition of a bulk map transfer (spec.md §4.5.7). Clients key
/// accumulation by `chunk_id` and tolerate any ordering or duplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapChunk {
    pub chunk_id: u32,
    pub total_chunks: u32,
    pub x_min: i32,
    pub y_min: i32,
    pub z: u8,
    pub tiles: Vec<TileRecord>,
}

/// `chunk_id:u32_le, total_chunks:u32_le, tile_count:u16_le,
/// x_min:i32_le, y_min:i32_le, z:u8, tile_record*`.
pub fn encode_map_chunk(chunk: &MapChunk) -> Vec<u8> {
    let mut out = ByteWriter::new();
    out.write_u32_le(chunk.chunk_id);
    out.write_u32_le(chunk.total_chunks);
    out.write_u16_le(chunk.tiles.len().min(u16::MAX as usize) as u16);
    out.write_i32_le(chunk.x_min);
    out.write_i32_le(chunk.y_min);
    out.write_u8(chunk.z);
    for tile in &chunk.tiles {
        tile.encode(&mut out);
    }
    out.into_inner()
}

pub fn decode_map_chunk(payload: &[u8]) -> Option<MapChunk> {
    let mut r = ByteReader::new(payload);
    let chunk_id = r.read_u32_le().ok()?;
    let total_chunks = r.read_u32_le().ok()?;
    let tile_count = r.read_u16_le().ok()?;
    let x_min = r.read_i32_le().ok()?;
    let y_min = r.read_i32_le().ok()?;
    let z = r.read_u8().ok()?;

    let mut tiles = Vec::with_capacity(tile_count as usize);
    for _ in 0..tile_count {
        match TileRecord::decode(&mut r) {
            Some(tile) => tiles.push(tile),
            None => break,
        }
    }

    Some(MapChunk {
        chunk_id,
        total_chunks,
        x_min,
        y_min,
        z,
        tiles,
    })
}
