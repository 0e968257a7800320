//! Tillich–Zémor homomorphic hash.
//!
//! Each input bit selects one of two SL2(GF(2^127)) generators and the
//! digest is the ordered product of those matrices. Because matrix products
//! are associative, `hash(a || b) == concat(hash(a), hash(b))`: digests of
//! adjacent payload ranges combine into the digest of the whole without
//! re-reading the data.

mod gf127;
mod sl2;

pub use gf127::Gf127;
pub use sl2::{Sl2, SL2_SIZE};

/// Digest length in bytes.
pub const DIGEST_SIZE: usize = SL2_SIZE;

/// Streaming Tillich–Zémor hasher.
#[derive(Clone, Debug)]
pub struct TzHasher {
    state: Sl2,
}

impl TzHasher {
    pub fn new() -> Self {
        Self {
            state: Sl2::IDENTITY,
        }
    }

    /// Feed bytes into the hash, most significant bit first.
    pub fn update(&mut self, data: &[u8]) {
        let mut state = self.state;
        for byte in data {
            for shift in (0..8).rev() {
                state = if (byte >> shift) & 1 == 1 {
                    state.mul_b()
                } else {
                    state.mul_a()
                };
            }
        }
        self.state = state;
    }

    /// Current digest without consuming the hasher.
    pub fn digest(&self) -> [u8; DIGEST_SIZE] {
        self.state.to_bytes()
    }

    /// Return to the empty-input state.
    pub fn reset(&mut self) {
        self.state = Sl2::IDENTITY;
    }
}

impl Default for TzHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot digest of `data`.
pub fn hash(data: &[u8]) -> [u8; DIGEST_SIZE] {
    let mut hasher = TzHasher::new();
    hasher.update(data);
    hasher.digest()
}

/// Combine digests of consecutive ranges into the digest of their
/// concatenation. Returns `None` if any digest is malformed.
pub fn concat<'a, I>(digests: I) -> Option<[u8; DIGEST_SIZE]>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut acc = Sl2::IDENTITY;
    for digest in digests {
        acc = acc * Sl2::from_bytes(digest)?;
    }
    Some(acc.to_bytes())
}

/// Check that `whole` is the digest of the concatenation of `parts`.
pub fn validate<'a, I>(whole: &[u8], parts: I) -> bool
where
    I: IntoIterator<Item = &'a [u8]>,
{
    matches!(concat(parts), Some(combined) if combined.as_slice() == whole)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_input_is_identity() {
        assert_eq!(hash(b""), Sl2::IDENTITY.to_bytes());
    }

    #[test]
    fn different_inputs_differ() {
        assert_ne!(hash(b"abc"), hash(b"abd"));
        assert_ne!(hash(b"ab"), hash(b"ba"));
    }

    #[test]
    fn streaming_matches_one_shot() {
        let mut hasher = TzHasher::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        assert_eq!(hasher.digest(), hash(b"hello world"));
    }

    #[test]
    fn reset_clears_state() {
        let mut hasher = TzHasher::new();
        hasher.update(b"garbage");
        hasher.reset();
        hasher.update(b"data");
        assert_eq!(hasher.digest(), hash(b"data"));
    }

    #[test]
    fn concat_rejects_malformed_digest() {
        let good = hash(b"x");
        assert!(concat([good.as_slice(), &[1u8, 2, 3][..]]).is_none());
    }

    #[test]
    fn validate_detects_wrong_split() {
        let whole = hash(b"abcdef");
        let a = hash(b"abc");
        let b = hash(b"def");
        assert!(validate(&whole, [a.as_slice(), b.as_slice()]));
        assert!(!validate(&whole, [b.as_slice(), a.as_slice()]));
    }

    proptest! {
        #[test]
        fn hash_is_homomorphic(
            left in proptest::collection::vec(any::<u8>(), 0..64),
            right in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let mut whole = left.clone();
            whole.extend_from_slice(&right);
            let combined = concat([hash(&left).as_slice(), hash(&right).as_slice()]).unwrap();
            prop_assert_eq!(combined, hash(&whole));
        }
    }
}
