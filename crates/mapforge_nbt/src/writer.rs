use mapforge_io::ByteWriter;

use crate::reader::DecodedNode;
use crate::{ESCAPE, NODE_END, NODE_START};

/// Writes `FILE_MAGIC(4) NODE` to `out`, where `NODE`'s payload and children
/// are produced by `build`.
pub fn write_root(out: &mut ByteWriter, magic: [u8; 4], node_type: u8, payload: &[u8], build: impl FnOnce(&mut NodeWriter<'_>)) {
    out.write_bytes(&magic);
    let mut w = NodeWriter { out };
    w.write_node(node_type, payload, build);
}

/// Writes a single node (no file magic) to `out`. Convenient for tests and
/// for embedding a node inside a larger stream the caller already framed.
pub fn write_node_standalone(out: &mut ByteWriter, node_type: u8, payload: &[u8], children: impl FnOnce(&mut NodeWriter<'_>)) {
    let mut w = NodeWriter { out };
    w.write_node(node_type, payload, children);
}

/// Emits `0xFE type escape(payload) child* 0xFF`.
pub struct NodeWriter<'w> {
    out: &'w mut ByteWriter,
}

impl<'w> NodeWriter<'w> {
    pub fn write_node(&mut self, node_type: u8, payload: &[u8], children: impl FnOnce(&mut NodeWriter<'_>)) {
        self.out.write_u8(NODE_START);
        self.out.write_u8(node_type);
        write_escaped(self.out, payload);
        children(self);
        self.out.write_u8(NODE_END);
    }
}

/// Escapes every `{0xFD, 0xFE, 0xFF}` byte in `payload` with a leading
/// `0xFD` and appends the result to `out`.
pub fn write_escaped(out: &mut ByteWriter, payload: &[u8]) {
    for &b in payload {
        if b == ESCAPE || b == NODE_START || b == NODE_END {
            out.write_u8(ESCAPE);
        }
        out.write_u8(b);
    }
}

/// Standalone escape function used by property tests (§8 item 2: `escape`
/// inserts exactly one `0xFD` before each `0xFD`, `0xFE`, `0xFF` byte).
pub fn escape(payload: &[u8]) -> Vec<u8> {
    let mut out = ByteWriter::with_capacity(payload.len());
    write_escaped(&mut out, payload);
    out.into_inner()
}

/// Writes a previously-decoded node tree back out verbatim. Used by tests
/// that round-trip through [`crate::reader::read_node`].
pub fn write_decoded_node(out: &mut ByteWriter, node: &DecodedNode) {
    let mut w = NodeWriter { out };
    write_decoded_inner(&mut w, node);
}

fn write_decoded_inner(w: &mut NodeWriter<'_>, node: &DecodedNode) {
    let children = &node.children;
    w.write_node(node.node_type, &node.payload, |child_w| {
        for child in children {
            write_decoded_inner(child_w, child);
        }
    });
}
