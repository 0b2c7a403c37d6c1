//! SHA-256 digests used for course hashes and issued-key messages.

use sha2::{Digest, Sha256};

/// Computes the lowercase hex SHA-256 digest of arbitrary bytes.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
