//! Per-sender sliding-window rate limiting

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::clock::Clock;

/// Sliding-window counter keyed by sender id. A sender may record at most
/// `cap` events inside any trailing `window`; older events age out.
/// Thread-safe; time is injected so tests can drive the window.
pub struct SlidingWindow<C: Clock> {
    window: Duration,
    cap: usize,
    clock: C,
    events: Mutex<HashMap<u64, VecDeque<std::time::Instant>>>,
}

impl<C: Clock> SlidingWindow<C> {
    /// Create a limiter allowing `cap` events per `window` per sender.
    pub fn new(window: Duration, cap: usize, clock: C) -> Self {
        Self {
            window,
            cap,
            clock,
            events: Mutex::new(HashMap::new()),
        }
    }

    /// Record an event for `sender_id` if the sender is under the cap.
    /// Returns false (and records nothing) when the cap is reached.
    pub fn check_and_record(&self, sender_id: u64) -> bool {
        let now = self.clock.now();
        let mut events = self.events.lock().unwrap();
        let timestamps = events.entry(sender_id).or_default();

        while let Some(&oldest) = timestamps.front() {
            if now.duration_since(oldest) >= self.window {
                timestamps.pop_front();
            } else {
                break;
            }
        }

        if timestamps.len() >= self.cap {
            return false;
        }
        timestamps.push_back(now);
        true
    }
}
