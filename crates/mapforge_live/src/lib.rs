//! Live collaborative map editing: a framed TCP protocol built on
//! [`mapforge_protocol`], applied against a shared [`mapforge_model::MapModel`]
//! (spec.md §4.5, §5).

mod auth;
mod ban_list;
mod chunk_accumulator;
mod chunking;
mod client;
mod cursor;
mod error;
mod frame_accumulator;
mod peer;
mod rate_limiter;
mod reconnect;
mod server;
mod session;
mod tile_bridge;

pub use auth::{check_password, constant_time_eq};
pub use ban_list::BanList;
pub use chunk_accumulator::ChunkAccumulator;
pub use chunking::{build_chunks, DEFAULT_CHUNK_TILE_BUDGET};
pub use client::{ClientConfig, LiveClient, LiveEvent};
pub use cursor::{peer_color, CursorRegistry, CursorThrottle, RemoteCursor, PEER_COLORS};
pub use error::LiveError;
pub use frame_accumulator::FrameAccumulator;
pub use peer::PeerHandle;
pub use rate_limiter::{RateLimiter, DEFAULT_RATE_CAP};
pub use reconnect::{attempts_exhausted, backoff_delay, ReconnectConfig};
pub use server::{LiveServer, ServerConfig};
pub use session::{ClientSessionState, ServerSessionState};
pub use tile_bridge::{apply_record, tile_to_record};

#[cfg(test)]
mod integration_tests {
    use std::time::Duration;

    use mapforge_model::{Item, MapModel, Position, Tile};
    use mapforge_protocol::MapRequest;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    async fn spawn_server(map: MapModel, config: ServerConfig) -> (LiveServer, std::net::SocketAddr) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = LiveServer::new(map, config);
        let accepting = server.clone();
        tokio::spawn(async move {
            let _ = accepting.serve_listener(listener).await;
        });
        (server, addr)
    }

    /// E5 (spec.md §8): a client that sends CHAT before LOGIN is
    /// disconnected without ever receiving a CLIENT_LIST broadcast.
    #[tokio::test]
    async fn e5_login_bypass_is_rejected() {
        let (_, addr) = spawn_server(MapModel::new(), ServerConfig::default()).await;
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();

        let frame = mapforge_protocol::encode_frame(mapforge_protocol::PacketType::Chat.as_u16(), b"hi");
        stream.write_all(&frame).await.unwrap();

        let mut buf = [0u8; 8];
        let read = stream.read(&mut buf).await.unwrap();
        assert_eq!(read, 0, "server must close the connection without replying");
    }

    /// E6 (spec.md §8): a MAP_REQUEST past the area cap yields no
    /// MAP_CHUNK frames.
    #[tokio::test]
    async fn e6_oversized_map_request_yields_no_chunks() {
        let mut map = MapModel::new();
        let mut tile = Tile::new(Position::new(0, 0, 0));
        tile.ground = Some(Item::new(100));
        map.put_tile(tile);

        let (_, addr) = spawn_server(map, ServerConfig::default()).await;
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();

        let login = mapforge_protocol::encode_frame(
            mapforge_protocol::PacketType::Login.as_u16(),
            &mapforge_protocol::encode_login("Alice", ""),
        );
        stream.write_all(&login).await.unwrap();

        let mut buf = [0u8; 4096];
        let read = stream.read(&mut buf).await.unwrap();
        assert!(read > 0, "expected LOGIN_SUCCESS");

        let request = MapRequest {
            x_min: 0,
            y_min: 0,
            x_max: 1000,
            y_max: 1000,
            z: 0,
        };
        assert!(request.area() > ServerConfig::default().map_request_area_cap);
        let frame = mapforge_protocol::encode_frame(
            mapforge_protocol::PacketType::MapRequest.as_u16(),
            &mapforge_protocol::encode_map_request(&request),
        );
        stream.write_all(&frame).await.unwrap();

        let followup = mapforge_protocol::encode_frame(mapforge_protocol::PacketType::Chat.as_u16(), b"");
        stream.write_all(&followup).await.unwrap();

        let read = tokio::time::timeout(Duration::from_millis(200), stream.read(&mut buf)).await;
        match read {
            Ok(Ok(n)) => {
                let frames_contain_map_chunk = n >= mapforge_protocol::FrameHeader::WIRE_LEN
                    && u16::from_le_bytes([buf[2], buf[3]]) == mapforge_protocol::PacketType::MapChunk.as_u16();
                assert!(!frames_contain_map_chunk, "oversized MAP_REQUEST must not produce a MAP_CHUNK");
            }
            _ => {}
        }
    }
}
