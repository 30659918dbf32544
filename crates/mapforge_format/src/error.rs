use thiserror::Error;

/// Fatal errors that abort a load or save in progress. Non-fatal anomalies
/// go through `WarningSink`/`LoadReport` instead (see `config::LoaderConfig`).
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unexpected end of stream while reading a node")]
    UnexpectedEof,
    #[error("file magic not recognized")]
    BadMagic,
    #[error("unbalanced node: {0}")]
    UnbalancedNode(&'static str),
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("unknown item id {server_id} at {position:?}")]
    UnknownItemId {
        server_id: u16,
        position: Option<mapforge_model::Position>,
    },
    #[error("memory guard tripped: {0}")]
    MemoryGuardTrip(&'static str),
}

impl From<mapforge_nbt::NodeError> for CodecError {
    fn from(err: mapforge_nbt::NodeError) -> Self {
        match err {
            mapforge_nbt::NodeError::UnexpectedEof => CodecError::UnexpectedEof,
            mapforge_nbt::NodeError::BadMagic { .. } => CodecError::BadMagic,
            mapforge_nbt::NodeError::UnbalancedNode(what) => CodecError::UnbalancedNode(what),
        }
    }
}

impl From<mapforge_io::StreamError> for CodecError {
    fn from(_: mapforge_io::StreamError) -> Self {
        CodecError::UnexpectedEof
    }
}
