use thiserror::Error;

/// Fatal errors produced while framing or unframing a node stream.
///
/// Every variant here is fatal to the load/save in progress: the caller
/// discards whatever partial tree it had built (spec'd in the parent
/// `mapforge_format` crate's `CodecError` propagation policy).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("unexpected end of stream while reading a node")]
    UnexpectedEof,
    #[error("expected file magic {expected:02x?}, found {found:02x?}")]
    BadMagic { expected: [u8; 4], found: [u8; 4] },
    #[error("unbalanced node: {0}")]
    UnbalancedNode(&'static str),
}

impl From<mapforge_io::StreamError> for NodeError {
    fn from(_: mapforge_io::StreamError) -> Self {
        NodeError::UnexpectedEof
    }
}
