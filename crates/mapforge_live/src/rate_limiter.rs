use std::time::{Duration, Instant};

/// Default per-client packet rate cap (spec.md §4.5.6: "implementation
/// default: ~200").
pub const DEFAULT_RATE_CAP: u32 = 200;

const WINDOW: Duration = Duration::from_secs(1);

/// A sliding 1-second packet-count window, one per connection. O(1) memory
/// per peer (spec.md §5 "Scoped acquisition").
#[derive(Debug, Clone, Copy)]
pub struct RateLimiter {
    cap: u32,
    window_start: Instant,
    count: u32,
}

impl RateLimiter {
    pub fn new(cap: u32) -> Self {
        Self {
            cap,
            window_start: Instant::now(),
            count: 0,
        }
    }

    /// Records one packet against `now`. Returns `false` once `cap`
    /// packets have been admitted within the current window; the caller
    /// disconnects on the packet that crosses the threshold (spec.md §8
    /// item 10).
    pub fn check(&mut self, now: Instant) -> bool {
        if now.duration_since(self.window_start) >= WINDOW {
            self.window_start = now;
            self.count = 0;
        }

        if self.count >= self.cap {
            return false;
        }

        self.count += 1;
        true
    }
}
