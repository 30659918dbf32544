//! The live collaborative editing client (spec.md §4.5.4, §5). One task
//! owns the socket and multiplexes reads, outgoing frames and reconnects;
//! the handle returned to the host is cheap to clone and never blocks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use mapforge_protocol::{
    decode_chat, decode_client_list, decode_cursor, decode_map_chunk, decode_tile_update, encode_chat, encode_cursor,
    encode_frame, encode_login, encode_map_request, encode_tile_update, ClientEntry, MapChunk, MapRequest, PacketType,
    TileRecord,
};
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Notify;
use tokio::time::timeout;

use crate::chunk_accumulator::ChunkAccumulator;
use crate::cursor::{CursorRegistry, CursorThrottle, RemoteCursor};
use crate::frame_accumulator::FrameAccumulator;
use crate::reconnect::{attempts_exhausted, backoff_delay, ReconnectConfig};
use crate::session::ClientSessionState;

/// Tunables for one [`LiveClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub reconnect: ReconnectConfig,
    pub cursor_throttle_ms: u64,
    pub cursor_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            reconnect: ReconnectConfig::default(),
            cursor_throttle_ms: 50,
            cursor_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Events delivered to the host application as they arrive off the wire.
#[derive(Debug, Clone)]
pub enum LiveEvent {
    LoginSuccess { client_id: u32 },
    LoginFailed,
    Chat { client_id: u32, name: String, message: String },
    Cursors(Vec<RemoteCursor>),
    TileUpdate(Vec<TileRecord>),
    MapSynced(Vec<MapChunk>),
    ClientList(Vec<ClientEntry>),
    Reconnecting { attempt: u32, delay: Duration },
    Disconnected,
}

struct Shutdown {
    flag: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// A handle to one auto-reconnecting connection. Cloning shares the same
/// underlying session.
#[derive(Clone)]
pub struct LiveClient {
    commands_tx: flume::Sender<Vec<u8>>,
    events_rx: flume::Receiver<LiveEvent>,
    state: Arc<Mutex<ClientSessionState>>,
    cursor_throttle: Arc<Mutex<CursorThrottle>>,
    shutdown: Arc<Shutdown>,
}

impl LiveClient {
    /// Spawns the background session task and returns immediately;
    /// connection progress and disconnects surface through `events()`.
    pub fn connect(addr: impl Into<String>, name: impl Into<String>, password: impl Into<String>, config: ClientConfig) -> Self {
        let (commands_tx, commands_rx) = flume::unbounded();
        let (events_tx, events_rx) = flume::unbounded();
        let state = Arc::new(Mutex::new(ClientSessionState::Disconnected));
        let shutdown = Arc::new(Shutdown::new());
        let cursor_throttle = Arc::new(Mutex::new(CursorThrottle::new(config.cursor_throttle_ms)));

        tokio::spawn(run(
            addr.into(),
            name.into(),
            password.into(),
            config,
            state.clone(),
            commands_rx,
            events_tx,
            shutdown.clone(),
        ));

        Self {
            commands_tx,
            events_rx,
            state,
            cursor_throttle,
            shutdown,
        }
    }

    pub fn state(&self) -> ClientSessionState {
        *self.state.lock()
    }

    pub fn events(&self) -> &flume::Receiver<LiveEvent> {
        &self.events_rx
    }

    /// Sends the current cursor position, coalesced by the configured
    /// throttle (spec.md §8 item 15).
    pub fn send_cursor(&self, x: i32, y: i32, z: u16) {
        let now = Instant::now();
        if let Some((x, y, z)) = self.cursor_throttle.lock().update_position(x, y, z, now, false) {
            self.push_frame(PacketType::CursorUpdate, &encode_cursor(0, x, y, z));
        }
    }

    /// Forces out a pending cursor update coalesced by the throttle.
    pub fn flush_cursor(&self) {
        let now = Instant::now();
        if let Some((x, y, z)) = self.cursor_throttle.lock().flush(now) {
            self.push_frame(PacketType::CursorUpdate, &encode_cursor(0, x, y, z));
        }
    }

    pub fn send_chat(&self, message: &str) {
        self.push_frame(PacketType::Chat, &encode_chat(0, "", message));
    }

    pub fn send_tile_update(&self, records: &[TileRecord]) {
        self.push_frame(PacketType::TileUpdate, &encode_tile_update(records));
    }

    pub fn request_map(&self, request: MapRequest) {
        self.push_frame(PacketType::MapRequest, &encode_map_request(&request));
    }

    /// Intentional disconnect; the session does not reconnect afterward.
    pub fn shutdown(&self) {
        self.shutdown.trigger();
    }

    fn push_frame(&self, packet_type: PacketType, payload: &[u8]) {
        let _ = self.commands_tx.send(encode_frame(packet_type.as_u16(), payload));
    }
}

async fn run(
    addr: String,
    name: String,
    password: String,
    config: ClientConfig,
    state: Arc<Mutex<ClientSessionState>>,
    commands_rx: flume::Receiver<Vec<u8>>,
    events_tx: flume::Sender<LiveEvent>,
    shutdown: Arc<Shutdown>,
) {
    let mut attempt = 0u32;

    loop {
        if shutdown.is_set() {
            *state.lock() = ClientSessionState::Disconnected;
            return;
        }

        *state.lock() = ClientSessionState::Connecting;
        let stream = match timeout(config.connect_timeout, TcpStream::connect(&addr)).await {
            Ok(Ok(stream)) => stream,
            _ => {
                if !reconnect_or_give_up(&config, &mut attempt, &state, &events_tx).await {
                    return;
                }
                continue;
            }
        };
        let _ = stream.set_nodelay(true);
        *state.lock() = ClientSessionState::Connected;

        let (mut read_half, mut write_half) = stream.into_split();
        let login_frame = encode_frame(PacketType::Login.as_u16(), &encode_login(&name, &password));
        if write_half.write_all(&login_frame).await.is_err() {
            if !reconnect_or_give_up(&config, &mut attempt, &state, &events_tx).await {
                return;
            }
            continue;
        }

        let mut accumulator = FrameAccumulator::new();
        let mut chunk_acc = ChunkAccumulator::new();
        let mut cursor_registry = CursorRegistry::new(32, config.cursor_timeout);
        let mut read_buf = [0u8; 4096];

        'session: loop {
            tokio::select! {
                _ = shutdown.notify.notified() => {
                    break 'session;
                }
                read_result = read_half.read(&mut read_buf) => {
                    match read_result {
                        Ok(0) | Err(_) => break 'session,
                        Ok(n) => {
                            let frames = match accumulator.push(&read_buf[..n]) {
                                Ok(frames) => frames,
                                Err(_) => break 'session,
                            };
                            let mut disconnect = false;
                            for (packet_type, payload) in frames {
                                if !handle_incoming(
                                    packet_type,
                                    &payload,
                                    &mut attempt,
                                    &state,
                                    &events_tx,
                                    &mut chunk_acc,
                                    &mut cursor_registry,
                                ) {
                                    disconnect = true;
                                    break;
                                }
                            }
                            if disconnect {
                                break 'session;
                            }
                        }
                    }
                }
                command = commands_rx.recv_async() => {
                    match command {
                        Ok(frame) => {
                            if write_half.write_all(&frame).await.is_err() {
                                break 'session;
                            }
                        }
                        Err(_) => break 'session,
                    }
                }
            }
        }

        if shutdown.is_set() {
            *state.lock() = ClientSessionState::Disconnected;
            return;
        }

        if !reconnect_or_give_up(&config, &mut attempt, &state, &events_tx).await {
            return;
        }
    }
}

/// Advances the reconnect attempt counter, sleeps the backoff delay
/// (spec.md §8 item 14) and returns whether the caller should retry.
async fn reconnect_or_give_up(
    config: &ClientConfig,
    attempt: &mut u32,
    state: &Arc<Mutex<ClientSessionState>>,
    events_tx: &flume::Sender<LiveEvent>,
) -> bool {
    *attempt += 1;
    if attempts_exhausted(&config.reconnect, *attempt) {
        *state.lock() = ClientSessionState::Disconnected;
        let _ = events_tx.send(LiveEvent::Disconnected);
        return false;
    }
    *state.lock() = ClientSessionState::Reconnecting;
    let delay = backoff_delay(&config.reconnect, *attempt);
    let _ = events_tx.send(LiveEvent::Reconnecting { attempt: *attempt, delay });
    tokio::time::sleep(delay).await;
    true
}

/// Applies one decoded packet. Returns `false` when the session should be
/// torn down (LOGIN_ERROR, KICK).
fn handle_incoming(
    packet_type: u16,
    payload: &[u8],
    attempt: &mut u32,
    state: &Arc<Mutex<ClientSessionState>>,
    events_tx: &flume::Sender<LiveEvent>,
    chunk_acc: &mut ChunkAccumulator,
    cursor_registry: &mut CursorRegistry,
) -> bool {
    let Some(packet) = PacketType::from_u16(packet_type) else {
        return true;
    };

    match packet {
        PacketType::LoginSuccess => {
            let client_id = if payload.len() >= 4 {
                u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]])
            } else {
                0
            };
            *attempt = 0;
            *state.lock() = ClientSessionState::Active;
            let _ = events_tx.send(LiveEvent::LoginSuccess { client_id });
            true
        }
        PacketType::LoginError => {
            let _ = events_tx.send(LiveEvent::LoginFailed);
            false
        }
        PacketType::Chat => {
            let (client_id, name, message) = decode_chat(payload);
            let _ = events_tx.send(LiveEvent::Chat { client_id, name, message });
            true
        }
        PacketType::CursorUpdate => {
            let (client_id, x, y, z) = decode_cursor(payload);
            cursor_registry.update(client_id, x, y, z, Instant::now());
            let _ = events_tx.send(LiveEvent::Cursors(cursor_registry.visible(Instant::now())));
            true
        }
        PacketType::TileUpdate => {
            if let Some(records) = decode_tile_update(payload) {
                let _ = events_tx.send(LiveEvent::TileUpdate(records));
            }
            true
        }
        PacketType::MapChunk => {
            if let Some(chunk) = decode_map_chunk(payload) {
                chunk_acc.accept(chunk);
                if chunk_acc.is_complete() {
                    if let Some(chunks) = std::mem::take(chunk_acc).into_ordered() {
                        let _ = events_tx.send(LiveEvent::MapSynced(chunks));
                    }
                }
            }
            true
        }
        PacketType::ClientList => {
            let _ = events_tx.send(LiveEvent::ClientList(decode_client_list(payload)));
            true
        }
        PacketType::Kick => false,
        PacketType::Login | PacketType::MapRequest => true,
    }
}
