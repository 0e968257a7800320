use std::ops::Mul;

use super::gf127::Gf127;

/// 2x2 matrix over GF(2^127) with determinant 1.
///
/// Layout is row-major: `[[a, b], [c, d]]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sl2 {
    a: Gf127,
    b: Gf127,
    c: Gf127,
    d: Gf127,
}

/// Encoded size of a matrix: four 16-byte elements.
pub const SL2_SIZE: usize = 64;

impl Sl2 {
    pub const IDENTITY: Self = Self {
        a: Gf127::ONE,
        b: Gf127::ZERO,
        c: Gf127::ZERO,
        d: Gf127::ONE,
    };

    /// Right-multiply by the generator for a `0` bit: `[[x, 1], [1, 0]]`.
    pub fn mul_a(self) -> Self {
        Self {
            a: self.a.mul_x() + self.b,
            b: self.a,
            c: self.c.mul_x() + self.d,
            d: self.c,
        }
    }

    /// Right-multiply by the generator for a `1` bit: `[[x, x+1], [1, 1]]`.
    pub fn mul_b(self) -> Self {
        let a = self.a.mul_x() + self.b;
        let c = self.c.mul_x() + self.d;
        Self {
            a,
            b: a + self.a,
            c,
            d: c + self.c,
        }
    }

    pub fn to_bytes(&self) -> [u8; SL2_SIZE] {
        let mut out = [0u8; SL2_SIZE];
        for (slot, elem) in out.chunks_exact_mut(16).zip([self.a, self.b, self.c, self.d]) {
            slot.copy_from_slice(&elem.to_bytes());
        }
        out
    }

    /// Decode a matrix. Returns `None` on a wrong length or an unreduced
    /// element.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != SL2_SIZE {
            return None;
        }
        let mut elems = [Gf127::ZERO; 4];
        for (elem, chunk) in elems.iter_mut().zip(bytes.chunks_exact(16)) {
            let mut buf = [0u8; 16];
            buf.copy_from_slice(chunk);
            *elem = Gf127::from_bytes(&buf)?;
        }
        let [a, b, c, d] = elems;
        Some(Self { a, b, c, d })
    }
}

impl Mul for Sl2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            a: self.a * rhs.a + self.b * rhs.c,
            b: self.a * rhs.b + self.b * rhs.d,
            c: self.c * rhs.a + self.d * rhs.c,
            d: self.c * rhs.b + self.d * rhs.d,
        }
    }
}
