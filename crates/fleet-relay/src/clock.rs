//! Clock trait abstraction for mocking time in tests.
//!
//! - `SystemClock`: delegates to `std::time::Instant`
//! - `MockClock`: returns a controllable instant advanced by the test

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Abstraction over the system clock.
/// Implement this trait to control time in tests.
pub trait Clock: Send + Sync + 'static {
    /// Return the current instant.
    fn now(&self) -> Instant;
}

/// Live implementation backed by the real monotonic clock.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Mock clock for unit tests: `now()` returns a fixed instant that moves
/// only when the test calls `advance()`.
#[derive(Clone)]
pub struct MockClock {
    current: Arc<Mutex<Instant>>,
}

impl MockClock {
    /// Create a mock clock fixed at construction time.
    pub fn new() -> Self {
        Self {
            current: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Advance the mock clock by `duration`.
    pub fn advance(&self, duration: Duration) {
        *self.current.lock().unwrap() += duration;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self.current.lock().unwrap()
    }
}
