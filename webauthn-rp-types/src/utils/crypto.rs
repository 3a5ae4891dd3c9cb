//! Common cryptography primitives used when decoding and comparing the
//! ceremony data structures.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 of the given `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}
