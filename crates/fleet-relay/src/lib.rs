//! Relay coordination core for the satellite fleet
//!
//! Owns the shared delivery queue, the per-identity dispatch loop, the
//! sliding-window rate limiter, and the audit trail. Everything that
//! touches the network is behind the [`sink::RelaySink`] seam so the
//! coordination logic tests without a gateway connection.

pub mod audit;
pub mod clock;
pub mod dispatch;
pub mod mock;
pub mod queue;
pub mod rate_limit;
pub mod sink;

pub use audit::{AuditKind, AuditLog};
pub use clock::{Clock, MockClock, SystemClock};
pub use dispatch::DispatchWorker;
pub use queue::{MarkOutcome, PendingSend, RelayQueue};
pub use rate_limit::SlidingWindow;
pub use sink::{RelaySink, SinkError};
