//! Tree framing for the binary map formats: a self-describing node stream
//! with byte-stuffed payloads.
//!
//! The wire grammar (spec.md §4.2):
//!
//! ```text
//! stream    := FILE_MAGIC(4) NODE
//! NODE      := 0xFE TYPE(u8) PAYLOAD CHILD* 0xFF
//! PAYLOAD   := bytes, with 0xFE, 0xFF, 0xFD escaped by a leading 0xFD
//! CHILD     := NODE
//! ```

pub mod error;
pub mod reader;
pub mod writer;

pub use error::NodeError;
pub use reader::{
    begin_node, consume_siblings_until_end, end_node, read_node, DecodedNode, PayloadReader,
    RootReader,
};
pub use writer::{escape, write_decoded_node, write_node_standalone, write_root, NodeWriter};

/// Begins a node.
pub const NODE_START: u8 = 0xFE;
/// Ends a node.
pub const NODE_END: u8 = 0xFF;
/// Escapes the following byte in a payload.
pub const ESCAPE: u8 = 0xFD;

#[cfg(test)]
mod tests {
    use mapforge_io::{ByteReader, ByteWriter};
    use proptest::prelude::*;

    use super::*;

    /// E1 (node round trip), spec.md §8.
    #[test]
    fn e1_node_round_trip_literal_bytes() {
        let payload = [0xFE, 0x00, 0xFF, 0xFD];
        let mut out = ByteWriter::new();
        writer::write_node_standalone(&mut out, 0x10, &payload, |_| {});
        let bytes = out.into_inner();

        assert_eq!(
            bytes,
            vec![0xFE, 0x10, 0xFD, 0xFE, 0x00, 0xFD, 0xFF, 0xFD, 0xFD, 0xFF]
        );

        let mut r = ByteReader::new(&bytes);
        let decoded = read_node(&mut r).unwrap();
        assert_eq!(decoded.node_type, 0x10);
        assert_eq!(decoded.payload, payload);
        assert!(decoded.children.is_empty());
        assert!(r.is_empty());
    }

    #[test]
    fn node_with_children_round_trips() {
        let mut out = ByteWriter::new();
        writer::write_node_standalone(&mut out, 1, &[1, 2, 3], |w| {
            w.write_node(2, &[4, 5], |_| {});
            w.write_node(3, &[], |w| {
                w.write_node(4, &[9], |_| {});
            });
        });
        let bytes = out.into_inner();

        let mut r = ByteReader::new(&bytes);
        let decoded = read_node(&mut r).unwrap();
        assert_eq!(decoded.node_type, 1);
        assert_eq!(decoded.payload, vec![1, 2, 3]);
        assert_eq!(decoded.children.len(), 2);
        assert_eq!(decoded.children[0].node_type, 2);
        assert_eq!(decoded.children[0].payload, vec![4, 5]);
        assert!(decoded.children[0].children.is_empty());
        assert_eq!(decoded.children[1].node_type, 3);
        assert!(decoded.children[1].payload.is_empty());
        assert_eq!(decoded.children[1].children.len(), 1);
        assert_eq!(decoded.children[1].children[0].payload, vec![9]);
    }

    #[test]
    fn unknown_node_is_skippable() {
        let mut out = ByteWriter::new();
        writer::write_node_standalone(&mut out, 1, &[], |w| {
            w.write_node(99, &[0xFE, 0xFF, 0xFD], |w| {
                w.write_node(100, &[1], |_| {});
            });
            w.write_node(2, &[7], |_| {});
        });
        let bytes = out.into_inner();

        let mut r = ByteReader::new(&bytes);
        let (node_type, mut payload) = begin_node(&mut r).unwrap();
        assert_eq!(node_type, 1);
        let delim = payload.drain_to_delimiter().unwrap();
        assert_eq!(delim, NODE_START);
        drop(payload);

        // Skip the unknown node (99) entirely.
        let (unknown_type, mut unknown_payload) = begin_node(&mut r).unwrap();
        assert_eq!(unknown_type, 99);
        let unknown_delim = unknown_payload.drain_to_delimiter().unwrap();
        assert_eq!(unknown_delim, NODE_START);
        drop(unknown_payload);
        consume_siblings_until_end(&mut r).unwrap();

        // The following sibling must still be readable.
        let (next_type, mut next_payload) = begin_node(&mut r).unwrap();
        assert_eq!(next_type, 2);
        assert_eq!(next_payload.read_escaped_bytes(1).unwrap(), vec![7]);
        let next_delim = next_payload.drain_to_delimiter().unwrap();
        assert_eq!(next_delim, NODE_END);
        drop(next_payload);
        end_node(&mut r).unwrap();

        // Closes the outer node.
        end_node(&mut r).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn truncated_stream_is_unexpected_eof() {
        let bytes = [0xFE, 0x10, 0x01];
        let mut r = ByteReader::new(&bytes);
        let err = read_node(&mut r).unwrap_err();
        assert_eq!(err, NodeError::UnexpectedEof);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let bytes = [b'X', b'X', b'X', b'X', 0xFE, 1, 0xFF];
        let err = RootReader::open(&bytes, *b"OTBM").unwrap_err();
        assert!(matches!(err, NodeError::BadMagic { .. }));
    }

    proptest! {
        /// Escape law (spec.md §8 item 2): a node's payload survives a
        /// write/read cycle unchanged for any byte sequence, and `escape`
        /// inserts exactly one `0xFD` before each `0xFD`/`0xFE`/`0xFF` byte.
        #[test]
        fn escape_law(payload in proptest::collection::vec(any::<u8>(), 0..64)) {
            let escaped = escape(&payload);
            let expected_len = payload.iter().filter(|&&b| b == ESCAPE || b == NODE_START || b == NODE_END).count()
                + payload.len();
            prop_assert_eq!(escaped.len(), expected_len);

            let mut out = ByteWriter::new();
            writer::write_node_standalone(&mut out, 7, &payload, |_| {});
            let bytes = out.into_inner();

            let mut r = ByteReader::new(&bytes);
            let decoded = read_node(&mut r).unwrap();
            prop_assert_eq!(decoded.payload, payload);
        }
    }
}
