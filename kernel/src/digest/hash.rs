//! Canonical hashing: the one place content hashes are produced.
//!
//! SHA-256 over `domain_bytes || data`, rendered as `"sha256:<hex>"`.

use sha2::{Digest, Sha256};

pub use super::hash_domain::HashDomain;

const PREFIX: &str = "sha256:";

/// A domain-separated SHA-256 digest.
///
/// Keeps the raw bytes (for seeding) alongside the rendered form (for cache
/// keys and result attribution).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash {
    rendered: String,
    bytes: [u8; 32],
}

impl ContentHash {
    /// `"sha256:<hex>"`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// The 64 lowercase hex characters without the algorithm prefix.
    #[must_use]
    pub fn hex_digest(&self) -> &str {
        &self.rendered[PREFIX.len()..]
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// First eight digest bytes as a little-endian `u64`, for seeding RNGs.
    #[must_use]
    pub fn seed_u64(&self) -> u64 {
        let mut head = [0u8; 8];
        head.copy_from_slice(&self.bytes[..8]);
        u64::from_le_bytes(head)
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Hash `data` under `domain`.
#[must_use]
pub fn canonical_hash(domain: HashDomain, data: &[u8]) -> ContentHash {
    let bytes: [u8; 32] = Sha256::new()
        .chain_update(domain.as_bytes())
        .chain_update(data)
        .finalize()
        .into();
    ContentHash {
        rendered: format!("{PREFIX}{}", hex::encode(bytes)),
        bytes,
    }
}
