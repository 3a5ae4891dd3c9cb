//! Base64url helpers for the fields webauthn serializes that way.
//!
//! The spec mandates the unpadded `base64url` alphabet for challenges, so
//! decoding here is strict: padded or otherwise malformed input is rejected
//! rather than normalized.

use data_encoding::{DecodeError, BASE64URL_NOPAD};

/// Convert bytes to base64url without padding.
pub fn base64url(data: &[u8]) -> String {
    BASE64URL_NOPAD.encode(data)
}

/// Decode an unpadded base64url string.
pub fn try_from_base64url(input: &str) -> Result<Vec<u8>, DecodeError> {
    BASE64URL_NOPAD.decode(input.as_bytes())
}
