//! Wire framing and packet codecs for the live collaborative editing
//! protocol (spec.md §6-7): a length-prefixed frame carrying one of a
//! fixed set of packet types, each with its own flat binary payload.

mod chat;
mod client_list;
mod cursor;
mod frame;
mod login;
mod map_chunk;
mod map_request;
mod packet_type;
mod tile_record;
mod tile_update;

pub use chat::{decode_chat, encode_chat};
pub use client_list::{decode_client_list, encode_client_list, ClientEntry};
pub use cursor::{decode_cursor, encode_cursor};
pub use frame::{encode_frame, FrameHeader, MAX_PAYLOAD_SIZE, PROTOCOL_VERSION};
pub use login::{decode_login, encode_login};
pub use map_chunk::{decode_map_chunk, encode_map_chunk, MapChunk};
pub use map_request::{decode_map_request, encode_map_request, MapRequest};
pub use packet_type::PacketType;
pub use tile_record::{TileRecord, HAS_GROUND, HAS_HOUSE};
pub use tile_update::{decode_tile_update, encode_tile_update, TILE_UPDATE_MAGIC};
