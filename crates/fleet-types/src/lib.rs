//! Shared types for the satellite fleet relay

pub mod commands;
pub mod errors;
pub mod job;
pub mod policies;
pub mod validate;

pub use commands::{help_text, parse_command, ParsedCommand};
pub use errors::{RelayError, ValidationError};
pub use job::{BroadcastScope, RelayJob};
pub use policies::{SenderPolicy, SenderPolicyKind};
pub use validate::{validate_content, MAX_CONTENT_CHARS};
