//! Inbound direct-message classification
//!
//! A DM to any identity is either a broadcast through the whole fleet,
//! a help request, or (any other non-empty text) a broadcast from the
//! receiving identity alone. The parser only classifies; enqueueing is
//! the caller's side effect.

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::job::BroadcastScope;
use crate::validate::validate_content;

/// Prefix (followed by a space) selecting the broadcast-all form.
pub const BROADCAST_ALL_PREFIX: &str = "/all";

/// Body requesting the static help text.
pub const HELP_COMMAND: &str = "/help";

/// Leading character marking a command; a broadcast-all remainder that
/// starts with it is rejected to block recursive command injection.
pub const COMMAND_PREFIX_CHAR: char = '/';

/// Result of classifying an inbound DM body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ParsedCommand {
    /// Enqueue a relay job with the given validated content and scope.
    Broadcast {
        content: String,
        scope: BroadcastScope,
    },
    /// Reply with the help text; nothing is enqueued.
    Help,
}

/// Classify a raw DM body received by `identity`.
///
/// - `/all <text>` (case-insensitive, space required) → broadcast through
///   every identity; the remainder must not itself start with a command
///   prefix character.
/// - `/help` (case-insensitive) → help.
/// - anything else non-empty → broadcast from `identity` only.
pub fn parse_command(raw: &str, identity: &str) -> Result<ParsedCommand, ValidationError> {
    let trimmed = raw.trim();

    if trimmed.eq_ignore_ascii_case(HELP_COMMAND) {
        return Ok(ParsedCommand::Help);
    }

    if let Some(rest) = strip_prefix_ci(trimmed, BROADCAST_ALL_PREFIX) {
        // Only "/all<space>..." is the broadcast-all form; "/allies" or a
        // bare "/all" fall through to the plain-text branch below.
        if let Some(rest) = rest.strip_prefix(' ') {
            if rest.trim_start().starts_with(COMMAND_PREFIX_CHAR) {
                return Err(ValidationError::NestedCommand);
            }
            let content = validate_content(rest)?;
            return Ok(ParsedCommand::Broadcast {
                content,
                scope: BroadcastScope::AllIdentities,
            });
        }
    }

    let content = validate_content(trimmed)?;
    Ok(ParsedCommand::Broadcast {
        content,
        scope: BroadcastScope::SingleIdentity(identity.to_string()),
    })
}

/// Static help text listing the two commands and the plain-text behavior.
pub fn help_text() -> &'static str {
    "**Satellite Relay**\n\
     `/all <text>` — broadcast <text> through every satellite\n\
     `/help` — show this message\n\
     Any other text is relayed to the shared channel by this satellite only."
}

/// Case-insensitive prefix strip that never splits a UTF-8 boundary.
fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}
