// Keyed minimum-gap throttle for high-frequency input events.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Something that can be throttled independently of other keys.
pub trait ThrottleKey: Copy + Eq + Hash {
    /// Minimum time between two handled events for this key.
    fn min_interval(&self) -> Duration;
}

/// Enforces a fixed minimum delay between handled events of the same key.
///
/// Owned by a single component instance; callers pass `now` so the clock
/// stays under their control.
#[derive(Debug, Clone)]
pub struct Throttle<K> {
    last_handled: HashMap<K, Instant>,
}

impl<K: ThrottleKey> Throttle<K> {
    pub fn new() -> Self {
        Self {
            last_handled: HashMap::new(),
        }
    }

    /// Returns true and records the event if the key's interval has elapsed
    /// since its last handled event. Dropped events are not recorded.
    pub fn try_acquire(&mut self, key: K, now: Instant) -> bool {
        if let Some(last) = self.last_handled.get(&key) {
            if now.saturating_duration_since(*last) < key.min_interval() {
                return false;
            }
        }
        self.last_handled.insert(key, now);
        true
    }
}

impl<K: ThrottleKey> Default for Throttle<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Input {
        Slow,
        Fast,
        Free,
    }

    impl ThrottleKey for Input {
        fn min_interval(&self) -> Duration {
            match self {
                Input::Slow => Duration::from_millis(800),
                Input::Fast => Duration::from_millis(100),
                Input::Free => Duration::ZERO,
            }
        }
    }

    #[test]
    fn test_first_event_passes() {
        let mut throttle = Throttle::new();
        assert!(throttle.try_acquire(Input::Slow, Instant::now()));
    }

    #[test]
    fn test_events_inside_interval_are_dropped() {
        let mut throttle = Throttle::new();
        let t0 = Instant::now();
        assert!(throttle.try_acquire(Input::Slow, t0));
        assert!(!throttle.try_acquire(Input::Slow, t0 + Duration::from_millis(10)));
        assert!(!throttle.try_acquire(Input::Slow, t0 + Duration::from_millis(799)));
        assert!(throttle.try_acquire(Input::Slow, t0 + Duration::from_millis(800)));
    }

    #[test]
    fn test_dropped_events_do_not_extend_the_window() {
        let mut throttle = Throttle::new();
        let t0 = Instant::now();
        assert!(throttle.try_acquire(Input::Fast, t0));
        assert!(!throttle.try_acquire(Input::Fast, t0 + Duration::from_millis(90)));
        assert!(throttle.try_acquire(Input::Fast, t0 + Duration::from_millis(100)));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut throttle = Throttle::new();
        let t0 = Instant::now();
        assert!(throttle.try_acquire(Input::Slow, t0));
        assert!(throttle.try_acquire(Input::Fast, t0));
        assert!(!throttle.try_acquire(Input::Slow, t0 + Duration::from_millis(200)));
        assert!(throttle.try_acquire(Input::Fast, t0 + Duration::from_millis(200)));
    }

    #[test]
    fn test_zero_interval_never_throttles() {
        let mut throttle = Throttle::new();
        let t0 = Instant::now();
        for _ in 0..5 {
            assert!(throttle.try_acquire(Input::Free, t0));
        }
    }
}
