use std::time::{Duration, Instant};

/// Palette assigned to peers by `client_id`, matching the original
/// editor's `live_peer.py::PEER_COLORS` (8 colors, cycling).
pub const PEER_COLORS: [(u8, u8, u8); 8] = [
    (255, 0, 0),
    (0, 255, 0),
    (0, 0, 255),
    (255, 255, 0),
    (255, 0, 255),
    (0, 255, 255),
    (255, 128, 0),
    (128, 0, 255),
];

/// Assigns a stable color to a client id the same way the original
/// editor's `LivePeer.get_color` does (1-indexed, wrapping).
pub fn peer_color(client_id: u32) -> (u8, u8, u8) {
    let idx = client_id.saturating_sub(1) as usize % PEER_COLORS.len();
    PEER_COLORS[idx]
}

/// Client-side throttle for outbound cursor broadcasts (spec.md §4.5.6
/// "Cursor throttle"), standing alone from the transport the way the
/// original editor's `CursorBroadcaster` does.
#[derive(Debug)]
pub struct CursorThrottle {
    throttle: Duration,
    last_broadcast: Option<Instant>,
    last_position: (i32, i32, u16),
    pending: bool,
}

impl CursorThrottle {
    pub fn new(throttle_ms: u64) -> Self {
        Self {
            throttle: Duration::from_millis(throttle_ms),
            last_broadcast: None,
            last_position: (0, 0, 0),
            pending: false,
        }
    }

    /// Mirrors the original's 50ms default.
    pub fn with_defaults() -> Self {
        Self::new(50)
    }

    /// Records a new cursor position at `now`. Returns `Some(position)`
    /// when a broadcast should actually be sent now; returns `None` when
    /// the update is coalesced into a pending broadcast instead (spec.md
    /// §8 item 15).
    pub fn update_position(&mut self, x: i32, y: i32, z: u16, now: Instant, force: bool) -> Option<(i32, i32, u16)> {
        let position = (x, y, z);
        if position == self.last_position && !force {
            return None;
        }
        self.last_position = position;

        let elapsed_enough = self
            .last_broadcast
            .map(|t| now.duration_since(t) >= self.throttle)
            .unwrap_or(true);

        if !force && !elapsed_enough {
            self.pending = true;
            return None;
        }

        self.last_broadcast = Some(now);
        self.pending = false;
        Some(position)
    }

    /// Forces the pending position out, if any (spec.md §4.5.6).
    pub fn flush(&mut self, now: Instant) -> Option<(i32, i32, u16)> {
        if !self.pending {
            return None;
        }
        self.last_broadcast = Some(now);
        self.pending = false;
        Some(self.last_position)
    }
}

/// A remote cursor tracked for rendering, evicted on an LRU-by-last-update
/// basis past `max_cursors` and hidden past `timeout` (spec.md §4.5.6
/// "Cursor receive cap").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteCursor {
    pub client_id: u32,
    pub x: i32,
    pub y: i32,
    pub z: u16,
}

#[derive(Debug)]
struct TrackedCursor {
    cursor: RemoteCursor,
    last_update: Instant,
}

#[derive(Debug)]
pub struct CursorRegistry {
    max_cursors: usize,
    timeout: Duration,
    cursors: std::collections::HashMap<u32, TrackedCursor>,
}

impl CursorRegistry {
    pub fn new(max_cursors: usize, timeout: Duration) -> Self {
        Self {
            max_cursors,
            timeout,
            cursors: std::collections::HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(32, Duration::from_secs(10))
    }

    pub fn update(&mut self, client_id: u32, x: i32, y: i32, z: u16, now: Instant) {
        if !self.cursors.contains_key(&client_id) && self.cursors.len() >= self.max_cursors {
            if let Some(&oldest) = self
                .cursors
                .iter()
                .min_by_key(|(_, tracked)| tracked.last_update)
                .map(|(id, _)| id)
            {
                self.cursors.remove(&oldest);
            }
        }

        self.cursors.insert(
            client_id,
            TrackedCursor {
                cursor: RemoteCursor { client_id, x, y, z },
                last_update: now,
            },
        );
    }

    pub fn remove(&mut self, client_id: u32) -> bool {
        self.cursors.remove(&client_id).is_some()
    }

    /// Cursors not yet past `timeout` at `now`, for rendering.
    pub fn visible(&self, now: Instant) -> Vec<RemoteCursor> {
        self.cursors
            .values()
            .filter(|tracked| now.duration_since(tracked.last_update) <= self.timeout)
            .map(|tracked| tracked.cursor)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peer_colors_wrap_after_eight() {
        assert_eq!(peer_color(1), PEER_COLORS[0]);
        assert_eq!(peer_color(8), PEER_COLORS[7]);
        assert_eq!(peer_color(9), PEER_COLORS[0]);
    }

    /// Testable property 15 (spec.md §8): consecutive updates within the
    /// throttle window produce at most one broadcast; flush forces one.
    #[test]
    fn throttle_coalesces_rapid_updates() {
        let mut throttle = CursorThrottle::new(50);
        let t0 = Instant::now();

        assert_eq!(throttle.update_position(1, 1, 0, t0, false), Some((1, 1, 0)));
        assert_eq!(throttle.update_position(2, 2, 0, t0 + Duration::from_millis(10), false), None);
        assert_eq!(throttle.update_position(3, 3, 0, t0 + Duration::from_millis(20), false), None);

        assert_eq!(throttle.flush(t0 + Duration::from_millis(25)), Some((3, 3, 0)));
        assert_eq!(throttle.flush(t0 + Duration::from_millis(30)), None);
    }

    #[test]
    fn throttle_allows_broadcast_after_interval_elapses() {
        let mut throttle = CursorThrottle::new(50);
        let t0 = Instant::now();
        assert_eq!(throttle.update_position(1, 1, 0, t0, false), Some((1, 1, 0)));
        assert_eq!(
            throttle.update_position(2, 2, 0, t0 + Duration::from_millis(60), false),
            Some((2, 2, 0))
        );
    }

    #[test]
    fn registry_evicts_oldest_past_capacity() {
        let mut registry = CursorRegistry::new(2, Duration::from_secs(10));
        let t0 = Instant::now();
        registry.update(1, 0, 0, 0, t0);
        registry.update(2, 0, 0, 0, t0 + Duration::from_millis(1));
        registry.update(3, 0, 0, 0, t0 + Duration::from_millis(2));

        let visible: Vec<_> = registry.visible(t0 + Duration::from_millis(2)).into_iter().map(|c| c.client_id).collect();
        assert_eq!(visible.len(), 2);
        assert!(!visible.contains(&1));
    }

    #[test]
    fn registry_hides_stale_cursors() {
        let mut registry = CursorRegistry::new(32, Duration::from_secs(10));
        let t0 = Instant::now();
        registry.update(1, 5, 5, 0, t0);
        assert!(registry.visible(t0 + Duration::from_secs(11)).is_empty());
        assert!(!registry.visible(t0 + Duration::from_secs(5)).is_empty());
    }
}
