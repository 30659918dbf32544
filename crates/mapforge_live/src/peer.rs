use flume::Sender;

/// A connected, authenticated peer as tracked by [`crate::server::LiveServer`]'s
/// connection table, grounded on the original editor's `LivePeer` record.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    pub client_id: u32,
    pub name: String,
    pub color: (u8, u8, u8),
    outgoing: Sender<Vec<u8>>,
}

impl PeerHandle {
    pub fn new(client_id: u32, name: String, color: (u8, u8, u8), outgoing: Sender<Vec<u8>>) -> Self {
        Self { client_id, name, color, outgoing }
    }

    /// Best-effort delivery. A full or closed queue drops the frame rather
    /// than stalling the broadcaster on one slow peer (spec.md §5
    /// "Backpressure").
    pub fn send(&self, frame: Vec<u8>) -> bool {
        self.outgoing.try_send(frame).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_succeeds_while_queue_has_room() {
        let (tx, rx) = flume::bounded(1);
        let peer = PeerHandle::new(1, "Alice".into(), (255, 0, 0), tx);
        assert!(peer.send(vec![1, 2, 3]));
        assert_eq!(rx.try_recv().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn send_fails_without_blocking_once_queue_is_full() {
        let (tx, _rx) = flume::bounded(1);
        let peer = PeerHandle::new(1, "Alice".into(), (255, 0, 0), tx);
        assert!(peer.send(vec![1]));
        assert!(!peer.send(vec![2]));
    }
}
