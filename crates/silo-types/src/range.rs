use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A byte range within an object payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub offset: u64,
    pub length: u64,
}

impl Range {
    pub const fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// Exclusive end offset, or `None` if `offset + length` overflows.
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.length)
    }

    /// Returns `true` if the range lies within a payload of `len` bytes.
    pub fn fits(&self, len: u64) -> bool {
        matches!(self.end(), Some(end) if end <= len)
    }
}

/// `offset:length`
impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.offset, self.length)
    }
}

impl FromStr for Range {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (off, len) = s
            .split_once(':')
            .ok_or_else(|| TypeError::InvalidRange(format!("expected offset:length, got {s:?}")))?;
        let offset = off
            .trim()
            .parse()
            .map_err(|_| TypeError::InvalidRange(format!("bad offset {off:?}")))?;
        let length = len
            .trim()
            .parse()
            .map_err(|_| TypeError::InvalidRange(format!("bad length {len:?}")))?;
        Ok(Self { offset, length })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_is_inclusive_of_end() {
        assert!(Range::new(0, 100).fits(100));
        assert!(Range::new(50, 50).fits(100));
        assert!(!Range::new(50, 51).fits(100));
        assert!(Range::new(100, 0).fits(100));
    }

    #[test]
    fn overflow_never_fits() {
        let r = Range::new(u64::MAX, 2);
        assert_eq!(r.end(), None);
        assert!(!r.fits(u64::MAX));
    }

    #[test]
    fn parse_and_display() {
        let r: Range = "10:20".parse().unwrap();
        assert_eq!(r, Range::new(10, 20));
        assert_eq!(r.to_string(), "10:20");
        assert!("10".parse::<Range>().is_err());
        assert!("a:1".parse::<Range>().is_err());
    }
}
