use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Supported payload checksum algorithms.
///
/// The wire carries a numeric tag; [`ChecksumType::from_tag`] is the only
/// way to turn it into an algorithm, and unknown tags are rejected rather
/// than defaulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecksumType {
    /// Tillich–Zémor homomorphic hash (64-byte digest).
    TillichZemor,
    /// SHA-256 (32-byte digest).
    Sha256,
}

impl ChecksumType {
    /// Numeric wire tag. `0` is reserved for "unknown".
    pub const fn tag(self) -> u32 {
        match self {
            Self::TillichZemor => 1,
            Self::Sha256 => 2,
        }
    }

    pub fn from_tag(tag: u32) -> Result<Self, TypeError> {
        match tag {
            1 => Ok(Self::TillichZemor),
            2 => Ok(Self::Sha256),
            other => Err(TypeError::UnsupportedChecksum(other)),
        }
    }

    /// Length of the digest produced by this algorithm.
    pub const fn digest_len(self) -> usize {
        match self {
            Self::TillichZemor => 64,
            Self::Sha256 => 32,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::TillichZemor => "tz",
            Self::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for ChecksumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChecksumType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(Self::Sha256),
            "tz" | "tillich-zemor" => Ok(Self::TillichZemor),
            _ => Err(TypeError::UnsupportedChecksum(0)),
        }
    }
}

/// A checksum as declared in an object header: raw algorithm tag + digest.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum {
    pub tag: u32,
    pub sum: Vec<u8>,
}

impl Checksum {
    pub fn new(kind: ChecksumType, sum: Vec<u8>) -> Self {
        Self {
            tag: kind.tag(),
            sum,
        }
    }

    /// Resolve the algorithm tag.
    pub fn kind(&self) -> Result<ChecksumType, TypeError> {
        ChecksumType::from_tag(self.tag)
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = &self.sum[..self.sum.len().min(8)];
        write!(f, "Checksum(tag={}, {}..)", self.tag, hex::encode(shown))
    }
}
