use crate::{Position, Tile, Warning};

/// Resolves server/client item ids and ground-ness. Owned by the host
/// application; borrowed by the codec for the duration of a load/save.
pub trait ItemCatalog {
    fn is_ground(&self, server_id: u16) -> bool;
    fn server_to_client(&self, server_id: u16) -> Option<u16>;
    fn client_to_server(&self, client_id: u16) -> Option<u16>;
}

/// Invoked by the editor host after each tile mutation; opaque to the
/// core, which never reads its own history back.
pub trait HistoryRecorder {
    fn record(&mut self, key: Position, before: Option<Tile>, after: Option<Tile>);
}

/// Receives every non-fatal anomaly the codec or live engine encounters.
pub trait WarningSink {
    fn emit(&mut self, warning: Warning);
}

/// A `WarningSink` that discards everything; useful for callers that only
/// want the `LoadReport` returned from a load.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWarningSink;

impl WarningSink for NullWarningSink {
    fn emit(&mut self, _warning: Warning) {}
}
