use mapforge_io::{ByteReader, ByteWriter};

/// A bulk-fetch request over a rectangular region on one floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapRequest {
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
    pub z: u8,
}

impl MapRequest {
    /// Tile count of the requested rectangle, inclusive on both ends.
    /// Used to enforce the 65,536-tile cap (spec.md §4.5.6) before the
    /// map provider is ever invoked.
    pub fn area(&self) -> i64 {
        let width = (self.x_max as i64 - self.x_min as i64 + 1).max(0);
        let height = (self.y_max as i64 - self.y_min as i64 + 1).max(0);
        width * height
    }
}

/// `x_min:i32_le, y_min:i32_le, x_max:i32_le, y_max:i32_le, z:u8`.
pub fn encode_map_request(request: &MapRequest) -> Vec<u8> {
    let mut out = ByteWriter::with_capacity(17);
    out.write_i32_le(request.x_min);
    out.write_i32_le(request.y_min);
    out.write_i32_le(request.x_max);
    out.write_i32_le(request.y_max);
    out.write_u8(request.z);
    out.into_inner()
}

/// A payload shorter than 17 bytes decodes to an all-zero request.
pub fn decode_map_request(payload: &[u8]) -> MapRequest {
    if payload.len() < 17 {
        return MapRequest {
            x_min: 0,
            y_min: 0,
            x_max: 0,
            y_max: 0,
            z: 0,
        };
    }
    let mut r = ByteReader::new(payload);
    MapRequest {
        x_min: r.read_i32_le().unwrap(),
        y_min: r.read_i32_le().unwrap(),
        x_max: r.read_i32_le().unwrap(),
        y_max: r.read_i32_le().unwrap(),
        z: r.read_u8().unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// E6 (MAP_REQUEST area cap), spec.md §8.
    #[test]
    fn e6_large_request_area() {
        let request = MapRequest {
            x_min: 0,
            y_min: 0,
            x_max: 1000,
            y_max: 1000,
            z: 7,
        };
        assert_eq!(request.area(), 1_002_001);
        let payload = encode_map_request(&request);
        assert_eq!(decode_map_request(&payload), request);
    }

    #[test]
    fn short_payload_is_zeroed() {
        let request = decode_map_request(&[1, 2, 3]);
        assert_eq!(request.area(), 1);
        assert_eq!(request.x_min, 0);
    }
}
