use mapforge_io::ByteReader;

use crate::error::NodeError;
use crate::{ESCAPE, NODE_END, NODE_START};

type Result<T> = std::result::Result<T, NodeError>;

/// Positioned right before the root node of a validated file.
pub struct RootReader<'a> {
    stream: ByteReader<'a>,
}

impl<'a> RootReader<'a> {
    /// Validates the 4-byte file magic and returns a reader positioned
    /// before the root node.
    pub fn open(buf: &'a [u8], expected_magic: [u8; 4]) -> Result<Self> {
        let mut stream = ByteReader::new(buf);
        let magic_bytes = stream.read_exact(4)?;
        let mut found = [0u8; 4];
        found.copy_from_slice(magic_bytes);
        if found != expected_magic {
            return Err(NodeError::BadMagic {
                expected: expected_magic,
                found,
            });
        }
        Ok(Self { stream })
    }

    /// Like [`open`](Self::open), but accepts either of two magics (used
    /// when sniffing which sibling format a file belongs to). Returns which
    /// of the two matched.
    pub fn open_either(buf: &'a [u8], magic_a: [u8; 4], magic_b: [u8; 4]) -> Result<(Self, bool)> {
        let mut stream = ByteReader::new(buf);
        let magic_bytes = stream.read_exact(4)?;
        let mut found = [0u8; 4];
        found.copy_from_slice(magic_bytes);
        if found == magic_a {
            Ok((Self { stream }, true))
        } else if found == magic_b {
            Ok((Self { stream }, false))
        } else {
            Err(NodeError::BadMagic {
                expected: magic_a,
                found,
            })
        }
    }

    pub fn stream(&mut self) -> &mut ByteReader<'a> {
        &mut self.stream
    }

    pub fn begin_node(&mut self) -> Result<(u8, PayloadReader<'_, 'a>)> {
        begin_node(&mut self.stream)
    }
}

/// Expects `0xFE`, reads the type byte, and returns a payload reader whose
/// calls transparently unescape bytes until the first unescaped terminator.
pub fn begin_node<'r, 'a>(stream: &'r mut ByteReader<'a>) -> Result<(u8, PayloadReader<'r, 'a>)> {
    let start = stream.read_u8()?;
    if start != NODE_START {
        return Err(NodeError::UnbalancedNode("expected NODE_START"));
    }
    let node_type = stream.read_u8()?;
    Ok((node_type, PayloadReader::new(stream)))
}

/// Consumes the `0xFF` that closes a node whose payload reader reported a
/// `NODE_END` delimiter. Must be called exactly once per node with no
/// children.
pub fn end_node<'a>(stream: &mut ByteReader<'a>) -> Result<()> {
    let b = stream.read_u8()?;
    if b != NODE_END {
        return Err(NodeError::UnbalancedNode("expected NODE_END"));
    }
    Ok(())
}

/// Skips an unknown subtree by counting matched starts/ends, leaving the
/// stream positioned just past the balancing `NODE_END`. Called after a
/// payload has already been drained to a `NODE_START` delimiter so that
/// unknown node types never abort the load (forward-compatibility rule,
/// spec.md §4.2).
pub fn consume_siblings_until_end<'a>(stream: &mut ByteReader<'a>) -> Result<()> {
    loop {
        match stream.peek_u8() {
            Some(NODE_END) => {
                stream.read_u8()?;
                return Ok(());
            }
            Some(NODE_START) => skip_node(stream)?,
            Some(_) => return Err(NodeError::UnbalancedNode("expected NODE_START or NODE_END")),
            None => return Err(NodeError::UnexpectedEof),
        }
    }
}

fn skip_node<'a>(stream: &mut ByteReader<'a>) -> Result<()> {
    let (_node_type, mut payload) = begin_node(stream)?;
    let delimiter = payload.drain_to_delimiter()?;
    drop(payload);

    if delimiter == NODE_START {
        loop {
            match stream.peek_u8() {
                Some(NODE_END) => {
                    stream.read_u8()?;
                    break;
                }
                Some(NODE_START) => skip_node(stream)?,
                Some(_) => return Err(NodeError::UnbalancedNode("expected NODE_START or NODE_END")),
                None => return Err(NodeError::UnexpectedEof),
            }
        }
    } else {
        end_node(stream)?;
    }
    Ok(())
}

/// Reads a node payload, transparently unescaping `0xFD`-stuffed bytes until
/// the first unescaped `0xFE` (children follow) or `0xFF` (node ends).
///
/// The terminator is *peeked*, never consumed: the outer parser decides
/// whether to recurse into a child node or close this one.
pub struct PayloadReader<'r, 'a> {
    stream: &'r mut ByteReader<'a>,
    delimiter: Option<u8>,
}

impl<'r, 'a> PayloadReader<'r, 'a> {
    fn new(stream: &'r mut ByteReader<'a>) -> Self {
        Self {
            stream,
            delimiter: None,
        }
    }

    /// The delimiter seen so far, if any (`NODE_START` or `NODE_END`).
    pub fn delimiter(&self) -> Option<u8> {
        self.delimiter
    }

    /// Reads one logical (unescaped) payload byte. Returns `None` once an
    /// unescaped terminator is hit; subsequent calls keep returning `None`.
    pub fn read_escaped_u8(&mut self) -> Result<Option<u8>> {
        if self.delimiter.is_some() {
            return Ok(None);
        }

        let b = self.stream.peek_u8().ok_or(NodeError::UnexpectedEof)?;
        if b == NODE_START || b == NODE_END {
            self.delimiter = Some(b);
            return Ok(None);
        }

        self.stream.read_u8()?;
        if b == ESCAPE {
            let escaped = self.stream.read_u8()?;
            Ok(Some(escaped))
        } else {
            Ok(Some(b))
        }
    }

    pub fn read_escaped_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            match self.read_escaped_u8()? {
                Some(b) => out.push(b),
                None => return Err(NodeError::UnexpectedEof),
            }
        }
        Ok(out)
    }

    /// Reads a `u16_le` length prefix followed by that many payload bytes,
    /// decoded as UTF-8 with lossy replacement.
    pub fn read_string(&mut self) -> Result<String> {
        let len_bytes = self.read_escaped_bytes(2)?;
        let len = u16::from_le_bytes([len_bytes[0], len_bytes[1]]) as usize;
        let bytes = self.read_escaped_bytes(len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Drains the remainder of the payload, discarding bytes, until the
    /// delimiter. Returns the delimiter byte.
    pub fn drain_to_delimiter(&mut self) -> Result<u8> {
        while self.read_escaped_u8()?.is_some() {}
        self.delimiter.ok_or(NodeError::UnexpectedEof)
    }
}

/// A fully materialized node, used by tests and by callers that want a
/// generic tree instead of driving the streaming reader by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedNode {
    pub node_type: u8,
    pub payload: Vec<u8>,
    pub children: Vec<DecodedNode>,
}

pub fn read_node<'a>(stream: &mut ByteReader<'a>) -> Result<DecodedNode> {
    let (node_type, mut payload_reader) = begin_node(stream)?;

    let mut payload = Vec::new();
    while let Some(b) = payload_reader.read_escaped_u8()? {
        payload.push(b);
    }
    let delimiter = payload_reader.delimiter().expect("delimiter set after drain");
    drop(payload_reader);

    let mut children = Vec::new();
    if delimiter == NODE_START {
        loop {
            match stream.peek_u8() {
                Some(NODE_START) => children.push(read_node(stream)?),
                Some(NODE_END) => {
                    stream.read_u8()?;
                    break;
                }
                Some(_) => return Err(NodeError::UnbalancedNode("expected NODE_START or NODE_END")),
                None => return Err(NodeError::UnexpectedEof),
            }
        }
    } else {
        end_node(stream)?;
    }

    Ok(DecodedNode {
        node_type,
        payload,
        children,
    })
}
