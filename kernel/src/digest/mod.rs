//! Content addressing: domain-separated SHA-256 digests.

pub mod hash;
pub mod hash_domain;
