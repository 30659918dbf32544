use mapforge_io::{ByteReader, ByteWriter};

use crate::tile_record::TileRecord;

pub const TILE_UPDATE_MAGIC: [u8; 4] = *b"TUP1";

/// `magic:"TUP1", count:u16_le, tile_record*`.
pub fn encode_tile_update(tiles: &[TileRecord]) -> Vec<u8> {
    let mut out = ByteWriter::new();
    out.write_bytes(&TILE_UPDATE_MAGIC);
    out.write_u16_le(tiles.len().min(u16::MAX as usize) as u16);
    for tile in tiles {
        tile.encode(&mut out);
    }
    out.into_inner()
}

/// Returns `None` if the magic doesn't match; otherwise every tile record
/// that could be fully decoded, stopping at the first truncated one.
pub fn decode_tile_update(payload: &[u8]) -> Option<Vec<TileRecord>> {
    if payload.len() < 6 || payload[..4] != TILE_UPDATE_MAGIC {
        return None;
    }
    let mut r = ByteReader::new(&payload[4..]);
    let count = r.read_u16_le().ok()?;

    let mut tiles = Vec::with_capacity(count as usize);
    for _ in 0..count {
        match TileRecord::decode(&mut r) {
            Some(tile) => tiles.push(tile),
            None => break,
        }
    }
    Some(tiles)
}
