use mapforge_io::{ByteReader, ByteWriter};

pub const HAS_GROUND: u8 = 1 << 0;
pub const HAS_HOUSE: u8 = 1 << 1;

/// One tile as carried over the wire by `TILE_UPDATE` and `MAP_CHUNK`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileRecord {
    pub x: i32,
    pub y: i32,
    pub z: u8,
    pub items: Vec<(u16, u8)>,
    pub ground_id: u16,
    pub house_id: Option<u32>,
}

impl TileRecord {
    fn flags(&self) -> u8 {
        let mut flags = 0;
        if self.ground_id != 0 {
            flags |= HAS_GROUND;
        }
        if self.house_id.is_some() {
            flags |= HAS_HOUSE;
        }
        flags
    }

    /// `x:i32_le, y:i32_le, z:u8, flags:u8, item_count:u16_le,
    /// { item_id:u16_le, subtype:u8 }*, ground_id:u16_le, [house_id:u32_le]`.
    pub fn encode(&self, out: &mut ByteWriter) {
        out.write_i32_le(self.x);
        out.write_i32_le(self.y);
        out.write_u8(self.z);
        out.write_u8(self.flags());
        out.write_u16_le(self.items.len().min(u16::MAX as usize) as u16);
        for &(item_id, subtype) in &self.items {
            out.write_u16_le(item_id);
            out.write_u8(subtype);
        }
        out.write_u16_le(self.ground_id);
        if let Some(house_id) = self.house_id {
            out.write_u32_le(house_id);
        }
    }

    /// Returns `None` if the header itself is truncated; a truncated item
    /// list or missing trailing fields stop decoding early but still
    /// return what was read, matching the source's tolerant decoder.
    pub fn decode(r: &mut ByteReader<'_>) -> Option<Self> {
        let x = r.read_i32_le().ok()?;
        let y = r.read_i32_le().ok()?;
        let z = r.read_u8().ok()?;
        let flags = r.read_u8().ok()?;
        let item_count = r.read_u16_le().ok()?;

        let mut items = Vec::with_capacity(item_count as usize);
        for _ in 0..item_count {
            let Ok(item_id) = r.read_u16_le() else { break };
            let Ok(subtype) = r.read_u8() else { break };
            items.push((item_id, subtype));
        }

        let ground_id = r.read_u16_le().unwrap_or(0);
        let house_id = if flags & HAS_HOUSE != 0 {
            r.read_u32_le().ok()
        } else {
            None
        };

        Some(Self {
            x,
            y,
            z,
            items,
            ground_id,
            house_id,
        })
    }
}
