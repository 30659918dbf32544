/// Transport and session-level failures (spec.md §7 "Live engine errors").
/// These are handled locally by the engine (disconnect/reconnect); only
/// session-level transitions and chat/cursor callbacks surface to a host.
#[derive(Debug, thiserror::Error)]
pub enum LiveError {
    #[error("frame payload of {size} bytes exceeds the {limit} byte cap")]
    FrameTooLarge { size: u32, limit: u32 },

    #[error("packet rate limit exceeded")]
    RateLimit,

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("requested area of {area} tiles exceeds the cap of {cap}")]
    MapRequestTooLarge { area: i64, cap: i64 },

    #[error("transport closed")]
    TransportClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
