//! Utility functions and helpers

use sha2::{Digest, Sha256};

/// Pseudonymize a visitor IP as `hex(SHA-256(salt || ip))`.
///
/// The digest cannot be mapped back to the address without the salt.
pub fn hash_visitor_ip(salt: &str, ip: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(ip.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short prefix of a hash, safe to put in log lines.
pub fn short_hash(hash: &str) -> &str {
    &hash[..hash.len().min(8)]
}
