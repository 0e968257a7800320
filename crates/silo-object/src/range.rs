use silo_crypto::ChecksumEngine;
use silo_types::{ChecksumType, Range};

use crate::error::{ObjectError, ObjectResult};

/// Computes salted digests over ranges of a payload.
///
/// One engine is reused for all ranges and reset between them.
#[derive(Debug)]
pub struct RangeHasher {
    engine: ChecksumEngine,
}

impl RangeHasher {
    pub fn new(kind: ChecksumType) -> Self {
        Self {
            engine: ChecksumEngine::new(kind),
        }
    }

    /// Like [`RangeHasher::new`] but from a wire tag.
    pub fn from_tag(tag: u32) -> ObjectResult<Self> {
        let kind = ChecksumType::from_tag(tag).map_err(|_| ObjectError::UnsupportedChecksum(tag))?;
        Ok(Self::new(kind))
    }

    pub fn kind(&self) -> ChecksumType {
        self.engine.kind()
    }

    /// One digest per range, in request order.
    ///
    /// All or nothing: if any range ends past the payload the request fails
    /// with [`ObjectError::RangeOutOfBounds`] and no digest is returned.
    /// The salt restarts at the first byte of every range.
    pub fn hash_ranges(
        &mut self,
        payload: &[u8],
        ranges: &[Range],
        salt: &[u8],
    ) -> ObjectResult<Vec<Vec<u8>>> {
        let size = payload.len() as u64;
        if let Some(bad) = ranges.iter().find(|r| !r.fits(size)) {
            return Err(ObjectError::RangeOutOfBounds { range: *bad, size });
        }

        let mut digests = Vec::with_capacity(ranges.len());
        for range in ranges {
            let start = range.offset as usize;
            let end = start + range.length as usize;
            self.engine.update_salted(&payload[start..end], salt);
            digests.push(self.engine.finalize_reset());
        }
        Ok(digests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silo_crypto::{apply_salt, digest, tz};

    fn payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 % 256) as u8).collect()
    }

    #[test]
    fn range_ending_at_payload_end_succeeds() {
        let data = payload(100);
        let mut hasher = RangeHasher::new(ChecksumType::Sha256);
        let out = hasher.hash_ranges(&data, &[Range::new(90, 10)], b"").unwrap();
        assert_eq!(out, vec![digest(ChecksumType::Sha256, &data[90..])]);
    }

    #[test]
    fn one_past_end_fails_whole_request() {
        let data = payload(100);
        let mut hasher = RangeHasher::new(ChecksumType::Sha256);
        let err = hasher
            .hash_ranges(&data, &[Range::new(0, 10), Range::new(90, 11)], b"")
            .unwrap_err();
        assert!(matches!(
            err,
            ObjectError::RangeOutOfBounds { range, size: 100 } if range == Range::new(90, 11)
        ));
    }

    #[test]
    fn overflowing_range_is_out_of_bounds() {
        let mut hasher = RangeHasher::new(ChecksumType::Sha256);
        let err = hasher
            .hash_ranges(&payload(10), &[Range::new(u64::MAX, 2)], b"")
            .unwrap_err();
        assert!(matches!(err, ObjectError::RangeOutOfBounds { .. }));
    }

    #[test]
    fn salted_ranges_are_independent() {
        let data = payload(100);
        let salt = b"S-salt";
        for kind in [ChecksumType::Sha256, ChecksumType::TillichZemor] {
            let mut hasher = RangeHasher::new(kind);
            let out = hasher
                .hash_ranges(&data, &[Range::new(0, 50), Range::new(50, 50)], salt)
                .unwrap();
            assert_eq!(out.len(), 2);
            assert_eq!(out[0], digest(kind, &apply_salt(&data[..50], salt)));
            assert_eq!(out[1], digest(kind, &apply_salt(&data[50..], salt)));
        }
    }

    #[test]
    fn empty_range_list_and_zero_length_range() {
        let data = payload(10);
        let mut hasher = RangeHasher::new(ChecksumType::Sha256);
        assert!(hasher.hash_ranges(&data, &[], b"").unwrap().is_empty());
        let out = hasher.hash_ranges(&data, &[Range::new(10, 0)], b"").unwrap();
        assert_eq!(out[0], digest(ChecksumType::Sha256, b""));
    }

    #[test]
    fn unsalted_tz_ranges_compose_to_whole() {
        let data = payload(64);
        let mut hasher = RangeHasher::new(ChecksumType::TillichZemor);
        let parts = hasher
            .hash_ranges(&data, &[Range::new(0, 20), Range::new(20, 44)], b"")
            .unwrap();
        let whole = tz::hash(&data);
        assert!(tz::validate(&whole, parts.iter().map(Vec::as_slice)));
    }

    #[test]
    fn unknown_tag_rejected() {
        assert!(matches!(
            RangeHasher::from_tag(0),
            Err(ObjectError::UnsupportedChecksum(0))
        ));
        assert_eq!(RangeHasher::from_tag(1).unwrap().kind(), ChecksumType::TillichZemor);
    }
}
