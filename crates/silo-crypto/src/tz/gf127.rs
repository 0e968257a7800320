use std::fmt;
use std::ops::{Add, Mul};

const MSB: u64 = 1 << 63;

/// Element of GF(2^127) with reduction polynomial `x^127 + x^63 + 1`.
///
/// Bits 0..64 live in `lo`, bits 64..127 in `hi`; bit 63 of `hi` is always
/// clear.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Gf127 {
    lo: u64,
    hi: u64,
}

impl Gf127 {
    pub const ZERO: Self = Self { lo: 0, hi: 0 };
    pub const ONE: Self = Self { lo: 1, hi: 0 };
    /// The polynomial `x`.
    pub const X: Self = Self { lo: 2, hi: 0 };

    /// Build an element from its two words, reducing a set bit 127.
    pub fn new(lo: u64, hi: u64) -> Self {
        if hi & MSB == 0 {
            return Self { lo, hi };
        }
        Self {
            lo: lo ^ MSB ^ 1,
            hi: hi & !MSB,
        }
    }

    /// Multiply by `x`.
    pub fn mul_x(self) -> Self {
        let overflow = (self.hi >> 62) & 1 == 1;
        let hi = ((self.hi << 1) | (self.lo >> 63)) & !MSB;
        let mut lo = self.lo << 1;
        if overflow {
            // x^127 = x^63 + 1
            lo ^= MSB | 1;
        }
        Self { lo, hi }
    }

    fn bit(&self, i: u32) -> bool {
        if i < 64 {
            (self.lo >> i) & 1 == 1
        } else {
            (self.hi >> (i - 64)) & 1 == 1
        }
    }

    /// Big-endian encoding: high word first.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.hi.to_be_bytes());
        out[8..].copy_from_slice(&self.lo.to_be_bytes());
        out
    }

    /// Decode a big-endian element. Returns `None` if bit 127 is set.
    pub fn from_bytes(bytes: &[u8; 16]) -> Option<Self> {
        let mut hi = [0u8; 8];
        let mut lo = [0u8; 8];
        hi.copy_from_slice(&bytes[..8]);
        lo.copy_from_slice(&bytes[8..]);
        let hi = u64::from_be_bytes(hi);
        if hi & MSB != 0 {
            return None;
        }
        Some(Self {
            lo: u64::from_be_bytes(lo),
            hi,
        })
    }
}

impl Add for Gf127 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            lo: self.lo ^ rhs.lo,
            hi: self.hi ^ rhs.hi,
        }
    }
}

impl Mul for Gf127 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let mut acc = Self::ZERO;
        for i in (0..127).rev() {
            acc = acc.mul_x();
            if rhs.bit(i) {
                acc = acc + self;
            }
        }
        acc
    }
}

impl fmt::Debug for Gf127 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gf127({:016x}{:016x})", self.hi, self.lo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_is_multiplicative_identity() {
        let a = Gf127::new(0xdead_beef, 0x1234);
        assert_eq!(a * Gf127::ONE, a);
        assert_eq!(Gf127::ONE * a, a);
    }

    #[test]
    fn addition_is_self_inverse() {
        let a = Gf127::new(77, 88);
        assert_eq!(a + a, Gf127::ZERO);
    }

    #[test]
    fn mul_by_x_matches_mul_x() {
        let a = Gf127::new(u64::MAX, u64::MAX >> 1);
        assert_eq!(a * Gf127::X, a.mul_x());
    }

    #[test]
    fn x_to_the_127_reduces() {
        let mut p = Gf127::ONE;
        for _ in 0..127 {
            p = p.mul_x();
        }
        // x^127 = x^63 + 1
        assert_eq!(p, Gf127::new(MSB | 1, 0));
    }

    #[test]
    fn multiplication_commutes() {
        let a = Gf127::new(0x0123_4567_89ab_cdef, 0x7edc_ba98_7654_3210);
        let b = Gf127::new(0xfeed_face, 0x0bad_cafe);
        assert_eq!(a * b, b * a);
    }

    #[test]
    fn new_reduces_bit_127() {
        let reduced = Gf127::new(0, MSB);
        assert_eq!(reduced, Gf127::new(MSB | 1, 0));
    }

    #[test]
    fn bytes_roundtrip() {
        let a = Gf127::new(42, 7);
        assert_eq!(Gf127::from_bytes(&a.to_bytes()), Some(a));
        let mut bad = [0u8; 16];
        bad[0] = 0x80;
        assert_eq!(Gf127::from_bytes(&bad), None);
    }
}
