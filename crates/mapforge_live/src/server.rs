//! The live collaborative editing server (spec.md §4.5, §5). One acceptor
//! task hands each connection its own task; the shared map and connection
//! table are mutated only under their own lock, and broadcast iterates a
//! snapshot of the table rather than holding it across any I/O.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use mapforge_model::MapModel;
use mapforge_protocol::{
    decode_chat, decode_cursor, decode_login, decode_map_request, decode_tile_update, encode_chat,
    encode_client_list, encode_cursor, encode_frame, encode_map_chunk, ClientEntry, PacketType,
};
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

use crate::auth::check_password;
use crate::ban_list::BanList;
use crate::chunking::{build_chunks, DEFAULT_CHUNK_TILE_BUDGET};
use crate::cursor::peer_color;
use crate::error::LiveError;
use crate::frame_accumulator::FrameAccumulator;
use crate::peer::PeerHandle;
use crate::rate_limiter::{RateLimiter, DEFAULT_RATE_CAP};
use crate::session::ServerSessionState;
use crate::tile_bridge::apply_record;

/// Tunables for one [`LiveServer`] (spec.md §4.5.6 "Safety policies").
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub password: Option<String>,
    pub rate_limit_cap: u32,
    pub map_request_area_cap: i64,
    pub chunk_tile_budget: usize,
    pub outgoing_queue_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            password: None,
            rate_limit_cap: DEFAULT_RATE_CAP,
            map_request_area_cap: 65_536,
            chunk_tile_budget: DEFAULT_CHUNK_TILE_BUDGET,
            outgoing_queue_capacity: 256,
        }
    }
}

struct Shared {
    config: ServerConfig,
    map: Mutex<MapModel>,
    peers: Mutex<HashMap<u32, PeerHandle>>,
    bans: Mutex<BanList>,
    next_client_id: AtomicU32,
}

/// A running live editing server. Cheap to clone (an `Arc` internally);
/// clones share the same map, connection table and ban list.
#[derive(Clone)]
pub struct LiveServer {
    shared: Arc<Shared>,
}

impl LiveServer {
    pub fn new(map: MapModel, config: ServerConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                map: Mutex::new(map),
                peers: Mutex::new(HashMap::new()),
                bans: Mutex::new(BanList::new()),
                next_client_id: AtomicU32::new(0),
            }),
        }
    }

    pub fn ban_host(&self, host: IpAddr) {
        self.shared.bans.lock().ban(host);
    }

    pub fn unban_host(&self, host: &IpAddr) -> bool {
        self.shared.bans.lock().unban_host(host)
    }

    pub fn banned_hosts(&self) -> Vec<IpAddr> {
        self.shared.bans.lock().get_banned_hosts()
    }

    pub fn clear_banned_hosts(&self) -> usize {
        self.shared.bans.lock().clear_banned_hosts()
    }

    pub fn with_map<R>(&self, f: impl FnOnce(&MapModel) -> R) -> R {
        f(&self.shared.map.lock())
    }

    pub fn connected_client_count(&self) -> usize {
        self.shared.peers.lock().len()
    }

    /// Binds `addr` and serves connections until the listener itself
    /// errors. Each accepted connection gets its own task; the acceptor
    /// never blocks on one connection's I/O (spec.md §5).
    pub async fn serve(&self, addr: impl ToSocketAddrs) -> Result<(), LiveError> {
        let listener = TcpListener::bind(addr).await?;
        self.serve_listener(listener).await
    }

    /// Serves connections off an already-bound listener. Split out from
    /// [`Self::serve`] so a caller that needs the bound port up front (an
    /// ephemeral `:0` bind, for instance) can retrieve it before accepting.
    pub async fn serve_listener(&self, listener: TcpListener) -> Result<(), LiveError> {
        loop {
            let (stream, peer_addr) = listener.accept().await?;
            let shared = self.shared.clone();
            tokio::spawn(async move {
                handle_connection(shared, stream, peer_addr).await;
            });
        }
    }
}

async fn handle_connection(shared: Arc<Shared>, stream: TcpStream, peer_addr: SocketAddr) {
    if shared.bans.lock().is_banned(&peer_addr.ip()) {
        tracing::info!(%peer_addr, "rejected connection from banned host");
        return;
    }
    let _ = stream.set_nodelay(true);

    let (mut read_half, write_half) = stream.into_split();
    let (outgoing_tx, outgoing_rx) = flume::bounded::<Vec<u8>>(shared.config.outgoing_queue_capacity);
    let writer_task = tokio::spawn(writer_loop(write_half, outgoing_rx));

    let mut state = ServerSessionState::Accepted;
    let mut accumulator = FrameAccumulator::new();
    let mut limiter = RateLimiter::new(shared.config.rate_limit_cap);
    let mut client_id: Option<u32> = None;
    let mut name = String::new();
    let mut read_buf = [0u8; 4096];

    'connection: loop {
        let read = match read_half.read(&mut read_buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };

        let frames = match accumulator.push(&read_buf[..read]) {
            Ok(frames) => frames,
            Err(error) => {
                tracing::debug!(%peer_addr, %error, "disconnecting");
                break;
            }
        };

        for (packet_type, payload) in frames {
            if !limiter.check(Instant::now()) {
                tracing::debug!(%peer_addr, "rate limit exceeded, disconnecting");
                break 'connection;
            }

            let keep_going = dispatch(&shared, &outgoing_tx, &mut state, &mut client_id, &mut name, packet_type, &payload);
            if !keep_going {
                break 'connection;
            }
        }
    }

    writer_task.abort();
    if let Some(id) = client_id {
        shared.peers.lock().remove(&id);
        broadcast_client_list(&shared);
        tracing::info!(%peer_addr, client_id = id, "peer disconnected");
    }
}

async fn writer_loop(mut write_half: OwnedWriteHalf, rx: flume::Receiver<Vec<u8>>) {
    while let Ok(frame) = rx.recv_async().await {
        if write_half.write_all(&frame).await.is_err() {
            break;
        }
    }
}

/// Handles one decoded packet. Returns `false` when the connection should
/// be dropped: bad auth, any traffic before LOGIN (E5), or an unreadable
/// packet type before authentication.
fn dispatch(
    shared: &Arc<Shared>,
    outgoing: &flume::Sender<Vec<u8>>,
    state: &mut ServerSessionState,
    client_id: &mut Option<u32>,
    name: &mut String,
    packet_type: u16,
    payload: &[u8],
) -> bool {
    let Some(packet) = PacketType::from_u16(packet_type) else {
        return state.permits_unauthenticated_traffic();
    };

    match *state {
        ServerSessionState::Accepted => {
            if packet != PacketType::Login {
                return false;
            }
            let (peer_name, password) = decode_login(payload);
            if !check_password(shared.config.password.as_deref(), &password) {
                let _ = outgoing.try_send(encode_frame(PacketType::LoginError.as_u16(), b"bad credentials"));
                return false;
            }

            let id = shared.next_client_id.fetch_add(1, Ordering::SeqCst) + 1;
            *client_id = Some(id);
            *name = peer_name;
            let color = peer_color(id);

            shared.peers.lock().insert(id, PeerHandle::new(id, name.clone(), color, outgoing.clone()));
            let _ = outgoing.try_send(encode_frame(PacketType::LoginSuccess.as_u16(), &id.to_le_bytes()));
            broadcast_client_list(shared);
            *state = ServerSessionState::Authenticated;
            true
        }
        ServerSessionState::Authenticated | ServerSessionState::Syncing | ServerSessionState::Active => {
            let id = client_id.expect("authenticated state implies an assigned client id");
            match packet {
                PacketType::CursorUpdate => {
                    let (_claimed, x, y, z) = decode_cursor(payload);
                    broadcast_excluding(shared, id, PacketType::CursorUpdate, &encode_cursor(id, x, y, z));
                    true
                }
                PacketType::Chat => {
                    let (_claimed, _name, message) = decode_chat(payload);
                    broadcast_all(shared, PacketType::Chat, &encode_chat(id, name.as_str(), &message));
                    true
                }
                PacketType::TileUpdate => {
                    if let Some(records) = decode_tile_update(payload) {
                        {
                            let mut map = shared.map.lock();
                            for record in &records {
                                apply_record(&mut map, record);
                            }
                        }
                        broadcast_excluding(shared, id, PacketType::TileUpdate, payload);
                    }
                    true
                }
                PacketType::MapRequest => {
                    let request = decode_map_request(payload);
                    if request.area() > shared.config.map_request_area_cap {
                        tracing::debug!(client_id = id, area = request.area(), "map request rejected, area too large");
                        return true;
                    }

                    *state = ServerSessionState::Syncing;
                    let chunks = {
                        let map = shared.map.lock();
                        build_chunks(&map, &request, shared.config.chunk_tile_budget)
                    };
                    for chunk in &chunks {
                        let frame = encode_frame(PacketType::MapChunk.as_u16(), &encode_map_chunk(chunk));
                        let _ = outgoing.try_send(frame);
                    }
                    *state = ServerSessionState::Active;
                    true
                }
                _ => true,
            }
        }
        ServerSessionState::Disconnected => false,
    }
}

fn broadcast_all(shared: &Arc<Shared>, packet_type: PacketType, payload: &[u8]) {
    let frame = encode_frame(packet_type.as_u16(), payload);
    for peer in shared.peers.lock().values() {
        peer.send(frame.clone());
    }
}

fn broadcast_excluding(shared: &Arc<Shared>, sender_id: u32, packet_type: PacketType, payload: &[u8]) {
    let frame = encode_frame(packet_type.as_u16(), payload);
    for peer in shared.peers.lock().values() {
        if peer.client_id != sender_id {
            peer.send(frame.clone());
        }
    }
}

fn broadcast_client_list(shared: &Arc<Shared>) {
    let entries: Vec<ClientEntry> = shared
        .peers
        .lock()
        .values()
        .map(|peer| ClientEntry {
            client_id: peer.client_id,
            color: peer.color,
            name: peer.name.clone(),
        })
        .collect();
    broadcast_all(shared, PacketType::ClientList, &encode_client_list(&entries));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_safety_policies() {
        let config = ServerConfig::default();
        assert_eq!(config.rate_limit_cap, DEFAULT_RATE_CAP);
        assert_eq!(config.map_request_area_cap, 65_536);
    }

    /// E6 (spec.md §8): a request past the area cap is rejected without the
    /// map ever being consulted — checked here by asserting `dispatch`
    /// leaves the server in `Active` state (no SYNCING round trip occurred).
    #[test]
    fn e6_oversized_map_request_is_a_no_op() {
        let shared = Arc::new(Shared {
            config: ServerConfig::default(),
            map: Mutex::new(MapModel::new()),
            peers: Mutex::new(HashMap::new()),
            bans: Mutex::new(BanList::new()),
            next_client_id: AtomicU32::new(0),
        });
        let (outgoing_tx, outgoing_rx) = flume::unbounded();
        let mut state = ServerSessionState::Active;
        let mut client_id = Some(1u32);
        let mut name = "Alice".to_string();

        let request = mapforge_protocol::MapRequest {
            x_min: 0,
            y_min: 0,
            x_max: 1000,
            y_max: 1000,
            z: 0,
        };
        assert!(request.area() > shared.config.map_request_area_cap);
        let payload = mapforge_protocol::encode_map_request(&request);

        let keep_going = dispatch(
            &shared,
            &outgoing_tx,
            &mut state,
            &mut client_id,
            &mut name,
            PacketType::MapRequest.as_u16(),
            &payload,
        );
        assert!(keep_going);
        assert_eq!(state, ServerSessionState::Active);
        assert!(outgoing_rx.try_recv().is_err());
    }

    /// E5 (spec.md §8): traffic before LOGIN disconnects without reaching
    /// the authenticated branch.
    #[test]
    fn e5_traffic_before_login_disconnects() {
        let shared = Arc::new(Shared {
            config: ServerConfig::default(),
            map: Mutex::new(MapModel::new()),
            peers: Mutex::new(HashMap::new()),
            bans: Mutex::new(BanList::new()),
            next_client_id: AtomicU32::new(0),
        });
        let (outgoing_tx, _outgoing_rx) = flume::unbounded();
        let mut state = ServerSessionState::Accepted;
        let mut client_id = None;
        let mut name = String::new();

        let payload = mapforge_protocol::encode_chat(0, "Eve", "hi");
        let keep_going = dispatch(&shared, &outgoing_tx, &mut state, &mut client_id, &mut name, PacketType::Chat.as_u16(), &payload);
        assert!(!keep_going);
        assert!(client_id.is_none());
    }

    #[test]
    fn login_success_assigns_monotonic_client_ids_and_registers_peer() {
        let shared = Arc::new(Shared {
            config: ServerConfig::default(),
            map: Mutex::new(MapModel::new()),
            peers: Mutex::new(HashMap::new()),
            bans: Mutex::new(BanList::new()),
            next_client_id: AtomicU32::new(0),
        });
        let (outgoing_tx, outgoing_rx) = flume::unbounded();
        let mut state = ServerSessionState::Accepted;
        let mut client_id = None;
        let mut name = String::new();

        let payload = mapforge_protocol::encode_login("Alice", "");
        let keep_going = dispatch(&shared, &outgoing_tx, &mut state, &mut client_id, &mut name, PacketType::Login.as_u16(), &payload);
        assert!(keep_going);
        assert_eq!(client_id, Some(1));
        assert_eq!(state, ServerSessionState::Authenticated);
        assert_eq!(shared.peers.lock().len(), 1);
        assert!(outgoing_rx.try_recv().is_ok());
    }

    #[test]
    fn wrong_password_is_rejected_and_disconnects() {
        let shared = Arc::new(Shared {
            config: ServerConfig {
                password: Some("hunter2".into()),
                ..ServerConfig::default()
            },
            map: Mutex::new(MapModel::new()),
            peers: Mutex::new(HashMap::new()),
            bans: Mutex::new(BanList::new()),
            next_client_id: AtomicU32::new(0),
        });
        let (outgoing_tx, outgoing_rx) = flume::unbounded();
        let mut state = ServerSessionState::Accepted;
        let mut client_id = None;
        let mut name = String::new();

        let payload = mapforge_protocol::encode_login("Alice", "wrong");
        let keep_going = dispatch(&shared, &outgoing_tx, &mut state, &mut client_id, &mut name, PacketType::Login.as_u16(), &payload);
        assert!(!keep_going);
        assert!(client_id.is_none());
        assert!(outgoing_rx.try_recv().is_ok());
    }
}
