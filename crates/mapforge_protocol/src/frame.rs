use mapforge_io::{ByteReader, ByteWriter};

/// Current (and only) protocol version this crate speaks.
pub const PROTOCOL_VERSION: u16 = 1;

/// Hard cap on a single frame's payload size (spec.md §4.5.1). Frames
/// whose declared `size` exceeds this are rejected before the payload is
/// read.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// `version:u16_le type:u16_le size:u32_le` — 8 bytes, followed by
/// `size` payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub version: u16,
    pub packet_type: u16,
    pub size: u32,
}

impl FrameHeader {
    pub const WIRE_LEN: usize = 8;

    pub fn new(packet_type: u16, size: u32) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            packet_type,
            size,
        }
    }

    pub fn write(&self, out: &mut ByteWriter) {
        out.write_u16_le(self.version);
        out.write_u16_le(self.packet_type);
        out.write_u32_le(self.size);
    }

    /// Reads a header from exactly [`Self::WIRE_LEN`] bytes.
    pub fn parse(reader: &mut ByteReader<'_>) -> Result<Self, mapforge_io::StreamError> {
        let version = reader.read_u16_le()?;
        let packet_type = reader.read_u16_le()?;
        let size = reader.read_u32_le()?;
        Ok(Self {
            version,
            packet_type,
            size,
        })
    }

    pub fn is_oversized(&self) -> bool {
        self.size > MAX_PAYLOAD_SIZE
    }
}

/// Encodes a full frame (header + payload) ready to write to a socket.
pub fn encode_frame(packet_type: u16, payload: &[u8]) -> Vec<u8> {
    let mut out = ByteWriter::with_capacity(FrameHeader::WIRE_LEN + payload.len());
    FrameHeader::new(packet_type, payload.len() as u32).write(&mut out);
    out.write_bytes(payload);
    out.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let bytes = encode_frame(21, &[1, 2, 3]);
        let mut r = ByteReader::new(&bytes);
        let header = FrameHeader::parse(&mut r).unwrap();
        assert_eq!(header.version, PROTOCOL_VERSION);
        assert_eq!(header.packet_type, 21);
        assert_eq!(header.size, 3);
        assert_eq!(r.read_exact(3).unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn oversized_header_is_flagged() {
        let header = FrameHeader::new(1, MAX_PAYLOAD_SIZE + 1);
        assert!(header.is_oversized());
    }
}
