use std::time::Duration;

use rand::Rng;

/// Exponential backoff configuration for client auto-reconnect (spec.md
/// §4.5.4), matching the original editor's `ReconnectConfig` defaults.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    pub jitter: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
            jitter: 0.1,
        }
    }
}

/// Computes the delay before reconnect attempt `attempt` (1-indexed),
/// `delay = min(base * factor^(attempt-1), max) + uniform(0, jitter*delay)`
/// (spec.md §4.5.4, §8 item 14).
pub fn backoff_delay(config: &ReconnectConfig, attempt: u32) -> Duration {
    let base = config.base_delay.as_secs_f64();
    let grown = base * config.backoff_factor.powi(attempt.saturating_sub(1) as i32);
    let capped = grown.min(config.max_delay.as_secs_f64());

    let jitter = if config.jitter > 0.0 {
        rand::thread_rng().gen_range(0.0..=(config.jitter * capped))
    } else {
        0.0
    };

    Duration::from_secs_f64(capped + jitter)
}

/// `0` means unlimited, matching the original's `max_attempts == 0`
/// sentinel.
pub fn attempts_exhausted(config: &ReconnectConfig, attempt: u32) -> bool {
    config.max_attempts > 0 && attempt > config.max_attempts
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Testable property 14 (spec.md §8): non-decreasing delays bounded
    /// by `max_delay`, jitter bounded by `jitter * delay`.
    #[test]
    fn delays_are_non_decreasing_and_bounded() {
        let config = ReconnectConfig::default();
        let mut previous_floor = 0.0;
        for attempt in 1..=8u32 {
            let delay = backoff_delay(&config, attempt).as_secs_f64();
            let floor = config.base_delay.as_secs_f64() * config.backoff_factor.powi((attempt - 1) as i32);
            let floor = floor.min(config.max_delay.as_secs_f64());
            assert!(floor >= previous_floor - 1e-9);
            assert!(delay <= config.max_delay.as_secs_f64() * (1.0 + config.jitter) + 1e-9);
            previous_floor = floor;
        }
    }

    #[test]
    fn caps_at_max_delay() {
        let config = ReconnectConfig {
            jitter: 0.0,
            ..ReconnectConfig::default()
        };
        let delay = backoff_delay(&config, 20);
        assert_eq!(delay, config.max_delay);
    }

    #[test]
    fn zero_max_attempts_never_exhausts() {
        let config = ReconnectConfig {
            max_attempts: 0,
            ..ReconnectConfig::default()
        };
        assert!(!attempts_exhausted(&config, 1_000_000));
    }

    #[test]
    fn exhausts_past_configured_max_attempts() {
        let config = ReconnectConfig::default();
        assert!(!attempts_exhausted(&config, 10));
        assert!(attempts_exhausted(&config, 11));
    }
}
