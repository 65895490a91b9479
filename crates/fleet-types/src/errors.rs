//! Error taxonomy for the inbound (enqueue-time) path.
//!
//! Everything here is user-visible and resolved synchronously when a
//! message arrives; delivery-time failures live in `fleet-relay`.

use thiserror::Error;

use crate::validate::MAX_CONTENT_CHARS;

/// Validation failure for a message body. Never fatal, never retried;
/// the `Display` text is the reply shown to the sender.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Your message is empty. Send some text to relay.")]
    EmptyContent,

    #[error("Your message is too long ({len} characters, max {MAX_CONTENT_CHARS}).")]
    TooLong { len: usize },

    #[error("Nested commands are not relayed. Drop the leading `/` and try again.")]
    NestedCommand,
}

/// Rejection decided before a message is classified. Like validation
/// errors these are reported to the sender and nothing is enqueued.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("You are not authorized to use this relay.")]
    Unauthorized,

    #[error("Rate limit exceeded. Wait a minute before sending more messages.")]
    RateLimited,
}
