//! Transport payload encoding.
//!
//! Wire values are UTF-8 strings. The empty string is a distinguished
//! sentinel mapping to a zero-length payload, which is how a previously
//! announced attribute is retracted on its topic.

use crate::error::ValueError;

/// The sentinel wire value that retracts an attribute.
pub const EMPTY: &str = "";

/// Encode a wire string as a transport payload.
///
/// The empty-string sentinel maps to a zero-length byte sequence; any other
/// string maps to its UTF-8 bytes.
#[must_use]
pub fn encode(value: &str) -> Vec<u8> {
    value.as_bytes().to_vec()
}

/// Decode a transport payload back into a wire string.
///
/// # Errors
///
/// Returns [`ValueError::InvalidUtf8`] when the payload is not valid UTF-8.
pub fn decode(payload: &[u8]) -> Result<String, ValueError> {
    String::from_utf8(payload.to_vec()).map_err(|_| ValueError::InvalidUtf8)
}
