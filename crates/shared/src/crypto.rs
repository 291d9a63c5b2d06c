//! Cryptographic helpers for token hashing.

use sha2::{Digest, Sha256};

/// Computes SHA-256 of the input and returns it as a lowercase hex string.
///
/// Used to hash session token identifiers (JTIs) before they are stored,
/// so a leaked sessions table cannot be replayed.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
