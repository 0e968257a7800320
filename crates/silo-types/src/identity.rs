use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of an object or container owner.
///
/// An `OwnerId` is derived deterministically from an Ed25519 public key
/// using domain-separated BLAKE3, so a signature can be checked against
/// the owner recorded in a header without storing the key twice.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId([u8; 32]);

hash_identifier!(OwnerId);

impl OwnerId {
    /// Derive the owner identity bound to a public key.
    pub fn from_public_key(key: &[u8; 32]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"silo-owner-v1:");
        hasher.update(key);
        Self(*hasher.finalize().as_bytes())
    }

    /// Short identifier (`"own:"` + first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("own:{}", self.short_hex())
    }
}

impl fmt::Debug for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OwnerId({})", self.short_id())
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
