use mapforge_io::{ByteReader, ByteWriter};

/// `client_id:u32_le, x:i32_le, y:i32_le, z:u16_le` — 14 bytes.
pub fn encode_cursor(client_id: u32, x: i32, y: i32, z: u16) -> Vec<u8> {
    let mut out = ByteWriter::with_capacity(14);
    out.write_u32_le(client_id);
    out.write_i32_le(x);
    out.write_i32_le(y);
    out.write_u16_le(z);
    out.into_inner()
}

/// Returns `(0, 0, 0, 0)` for a payload shorter than 14 bytes rather than
/// failing, matching the live engine's tolerance for malformed peers.
pub fn decode_cursor(payload: &[u8]) -> (u32, i32, i32, u16) {
    if payload.len() < 14 {
        return (0, 0, 0, 0);
    }
    let mut r = ByteReader::new(payload);
    let client_id = r.read_u32_le().unwrap();
    let x = r.read_i32_le().unwrap();
    let y = r.read_i32_le().unwrap();
    let z = r.read_u16_le().unwrap();
    (client_id, x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// E3 (cursor payload), spec.md §8.
    #[test]
    fn e3_cursor_round_trip() {
        let payload = encode_cursor(42, 1000, 2000, 7);
        assert_eq!(payload.len(), 14);
        assert_eq!(decode_cursor(&payload), (42, 1000, 2000, 7));
    }

    #[test]
    fn short_payload_decodes_to_zero() {
        assert_eq!(decode_cursor(&[1, 2, 3]), (0, 0, 0, 0));
    }
}
