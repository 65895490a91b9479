//! Delivery seam between the dispatch loop and the outside world.
//!
//! The dispatch loop only knows how to hand a message body to a
//! [`RelaySink`]; the gateway-backed implementation lives in the binary
//! crate and an in-memory recorder lives in [`crate::mock`] for tests.

use thiserror::Error;

/// Outbound delivery failure. Logged and audited, counted as processed
/// for the attempting identity, never surfaced to the original sender.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The shared destination does not resolve to a writable channel.
    /// Retrying cannot succeed; the job still retires once every
    /// identity has attempted it.
    #[error("destination channel is not writable: {0}")]
    InvalidDestination(String),

    /// Transient or unclassified delivery failure. Not retried either:
    /// an unbounded retry on a persistent failure would grow the queue.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// One identity's handle for posting to the shared destination channel.
#[allow(async_fn_in_trait)]
pub trait RelaySink {
    /// Post `content` to the shared destination through this identity's
    /// own connection.
    async fn send(&self, content: &str) -> Result<(), SinkError>;
}
