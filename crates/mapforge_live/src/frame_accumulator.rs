use bytes::{Buf, BytesMut};
use mapforge_io::ByteReader;
use mapforge_protocol::FrameHeader;

use crate::error::LiveError;

/// Accumulates bytes arriving from a non-blocking socket read and yields
/// every complete frame the buffer currently holds, retaining any partial
/// frame for the next call.
///
/// Modeled on the original editor's `LiveSocket.process_incoming_data`:
/// never blocks, rejects an oversized declared frame the instant its
/// header is visible (without waiting for the rest of the payload to
/// arrive), and tolerates frames split across arbitrarily many reads.
#[derive(Debug, Default)]
pub struct FrameAccumulator {
    buf: BytesMut,
}

impl FrameAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends freshly-read bytes and extracts every complete frame now
    /// available. Returns `Err` the moment a declared frame size exceeds
    /// [`mapforge_protocol::MAX_PAYLOAD_SIZE`]; the caller should
    /// disconnect rather than keep reading.
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<(u16, Vec<u8>)>, LiveError> {
        self.buf.extend_from_slice(data);

        let mut frames = Vec::new();
        loop {
            if self.buf.len() < FrameHeader::WIRE_LEN {
                break;
            }

            let mut reader = ByteReader::new(&self.buf[..FrameHeader::WIRE_LEN]);
            let header = FrameHeader::parse(&mut reader).expect("length checked above");

            if header.is_oversized() {
                return Err(LiveError::FrameTooLarge {
                    size: header.size,
                    limit: mapforge_protocol::MAX_PAYLOAD_SIZE,
                });
            }

            let total = FrameHeader::WIRE_LEN + header.size as usize;
            if self.buf.len() < total {
                break;
            }

            let payload = self.buf[FrameHeader::WIRE_LEN..total].to_vec();
            self.buf.advance(total);
            frames.push((header.packet_type, payload));
        }

        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use mapforge_protocol::encode_frame;

    use super::*;

    #[test]
    fn extracts_a_complete_frame_in_one_push() {
        let mut acc = FrameAccumulator::new();
        let bytes = encode_frame(21, b"hello");
        let frames = acc.push(&bytes).unwrap();
        assert_eq!(frames, vec![(21, b"hello".to_vec())]);
    }

    #[test]
    fn retains_a_partial_frame_across_pushes() {
        let mut acc = FrameAccumulator::new();
        let bytes = encode_frame(21, b"hello world");
        let (first, second) = bytes.split_at(6);

        assert!(acc.push(first).unwrap().is_empty());
        let frames = acc.push(second).unwrap();
        assert_eq!(frames, vec![(21, b"hello world".to_vec())]);
    }

    #[test]
    fn extracts_multiple_frames_concatenated_in_one_push() {
        let mut acc = FrameAccumulator::new();
        let mut bytes = encode_frame(1, b"a");
        bytes.extend(encode_frame(2, b"bc"));
        let frames = acc.push(&bytes).unwrap();
        assert_eq!(frames, vec![(1, b"a".to_vec()), (2, b"bc".to_vec())]);
    }

    /// Testable property 9 (spec.md §8): an oversized declared frame is
    /// rejected without requiring its payload to ever arrive.
    #[test]
    fn oversized_header_rejects_before_payload_arrives() {
        let mut acc = FrameAccumulator::new();
        let mut header = Vec::new();
        let oversized = mapforge_protocol::MAX_PAYLOAD_SIZE + 1;
        header.extend_from_slice(&1u16.to_le_bytes());
        header.extend_from_slice(&21u16.to_le_bytes());
        header.extend_from_slice(&oversized.to_le_bytes());

        let err = acc.push(&header).unwrap_err();
        assert!(matches!(err, LiveError::FrameTooLarge { .. }));
    }

    /// A single byte followed by silence never yields a frame and never
    /// errors (slowloris resistance, spec.md §8 item 12).
    #[test]
    fn single_byte_then_silence_yields_nothing() {
        let mut acc = FrameAccumulator::new();
        assert!(acc.push(&[0x01]).unwrap().is_empty());
    }
}
