/// Fixed wire type codes (spec.md §6.2). Values match the prior
/// implementation's `PacketType` enum for the packets this protocol keeps;
/// `NODE_CHANGE`/`NODE_ADD`/`NODE_REMOVE` are not carried forward (no
/// undo/redo in scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PacketType {
    Login = 1,
    LoginError = 2,
    LoginSuccess = 3,
    TileUpdate = 13,
    MapRequest = 14,
    MapChunk = 15,
    Chat = 20,
    CursorUpdate = 21,
    ClientList = 22,
    Kick = 23,
}

impl PacketType {
    pub fn from_u16(value: u16) -> Option<Self> {
        Some(match value {
            1 => Self::Login,
            2 => Self::LoginError,
            3 => Self::LoginSuccess,
            13 => Self::TileUpdate,
            14 => Self::MapRequest,
            15 => Self::MapChunk,
            20 => Self::Chat,
            21 => Self::CursorUpdate,
            22 => Self::ClientList,
            23 => Self::Kick,
            _ => return None,
        })
    }

    pub fn as_u16(self) -> u16 {
        self as u16
    }
}
