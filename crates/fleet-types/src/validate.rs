//! Content validation for relay message bodies

use crate::errors::ValidationError;

/// Maximum relayed message length, counted in Unicode scalar values.
/// Matches the destination platform's message-length cap.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Trim surrounding whitespace and bound the length of a message body.
///
/// Pure and synchronous; callable from any context without locking.
pub fn validate_content(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    let len = trimmed.chars().count();
    if len > MAX_CONTENT_CHARS {
        return Err(ValidationError::TooLong { len });
    }
    Ok(trimmed.to_string())
}
