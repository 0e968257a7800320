//! Ed25519 keys used by the node.
//!
//! Two kinds of key sign objects: an owner's own key, whose public half
//! maps to the header's [`OwnerId`], and session keys the node generates
//! for delegated writes. Both sign the 32 bytes of the object id.

use std::fmt;

use ed25519_dalek::{Signer as _, Verifier as _};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use silo_types::{ObjectId, OwnerId};

pub const PUBLIC_KEY_LEN: usize = 32;
pub const SIGNATURE_LEN: usize = 64;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature does not verify")]
    InvalidSignature,
    #[error("bytes are not an ed25519 public key")]
    InvalidKey,
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Secret half of an owner or session key. `Debug` never prints it.
pub struct SigningKey {
    inner: ed25519_dalek::SigningKey,
}

impl SigningKey {
    pub fn generate() -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    pub fn from_bytes(secret: [u8; 32]) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::from_bytes(&secret),
        }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.inner.as_bytes()
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey {
            inner: self.inner.verifying_key(),
        }
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature(self.inner.sign(message))
    }

    /// Signature over an object id, as carried by `ObjectSignature`.
    pub fn sign_object_id(&self, id: &ObjectId) -> Signature {
        self.sign(id.as_bytes())
    }
}

impl Clone for SigningKey {
    fn clone(&self) -> Self {
        Self::from_bytes(*self.as_bytes())
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("public", &hex::encode(self.verifying_key().as_bytes()))
            .finish_non_exhaustive()
    }
}

/// Public half; this is what headers and session tokens store as raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct VerifyingKey {
    inner: ed25519_dalek::VerifyingKey,
}

impl VerifyingKey {
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Result<Self, SignatureError> {
        ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map(|inner| Self { inner })
            .map_err(|_| SignatureError::InvalidKey)
    }

    pub fn as_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.inner.to_bytes()
    }

    /// Owner that signs with this key.
    pub fn to_owner_id(&self) -> OwnerId {
        OwnerId::from_public_key(&self.as_bytes())
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        self.inner
            .verify(message, &signature.0)
            .map_err(|_| SignatureError::InvalidSignature)
    }

    pub fn verify_object_id(&self, id: &ObjectId, signature: &Signature) -> Result<(), SignatureError> {
        self.verify(id.as_bytes(), signature)
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerifyingKey({})", self.to_owner_id().short_id())
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// Detached Ed25519 signature. Serialized as a 64-byte string.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(ed25519_dalek::Signature);

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(ed25519_dalek::Signature::from_bytes(&bytes))
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0.to_bytes()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "Signature({}..)", hex::encode(&bytes[..6]))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<u8>::deserialize(deserializer)?;
        let bytes: [u8; SIGNATURE_LEN] = raw
            .try_into()
            .map_err(|v: Vec<u8>| de::Error::invalid_length(v.len(), &"64 signature bytes"))?;
        Ok(Self::from_bytes(bytes))
    }
}
