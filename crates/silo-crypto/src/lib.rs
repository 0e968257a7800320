//! Cryptographic primitives for the silo object node.
//!
//! Provides domain-separated BLAKE3 hashing for identifiers, Ed25519
//! signing/verification, and the payload [`ChecksumEngine`] over SHA-256
//! and the Tillich–Zémor homomorphic hash.
//!
//! All crypto operations wrap established libraries except the
//! Tillich–Zémor construction, which has no maintained Rust crate.

pub mod checksum;
pub mod hasher;
pub mod salt;
pub mod signer;
pub mod tz;

pub use checksum::{digest, ChecksumEngine};
pub use hasher::ContentHasher;
pub use salt::apply_salt;
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
pub use tz::TzHasher;
