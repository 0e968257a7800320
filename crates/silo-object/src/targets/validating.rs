use std::sync::Arc;

use silo_crypto::ChecksumEngine;
use silo_store::{Object, ObjectType};
use silo_types::{Address, ObjectId};
use tracing::{debug, warn};

use crate::error::{ObjectError, ObjectResult};
use crate::format::FormatValidator;
use crate::target::ObjectTarget;

/// Checks a client-signed object while its payload streams through.
///
/// - `begin`: first chunk fits the declared size, declared size fits the
///   node limit, checksum algorithm is known, header passes the
///   [`FormatValidator`].
/// - `append`: a chunk that would overrun the declared size is refused
///   before it is hashed or forwarded.
/// - `finalize`: delivered size equals the declared size and the digest
///   equals the declared checksum; only then is the next stage finalized.
pub struct ValidatingTarget<T> {
    next: T,
    validator: Arc<FormatValidator>,
    max_payload_size: u64,
    state: Option<Progress>,
}

struct Progress {
    address: Address,
    hasher: ChecksumEngine,
    expected: Vec<u8>,
    declared: u64,
    written: u64,
    /// Payload copy kept only for tombstones, which are decoded on finalize.
    tombstone: Option<Vec<u8>>,
}

impl<T: ObjectTarget> ValidatingTarget<T> {
    pub fn new(next: T, validator: Arc<FormatValidator>, max_payload_size: u64) -> Self {
        Self {
            next,
            validator,
            max_payload_size,
            state: None,
        }
    }

    /// Payload bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.state.as_ref().map_or(0, |s| s.written)
    }
}

impl<T: ObjectTarget> ObjectTarget for ValidatingTarget<T> {
    fn begin(&mut self, mut object: Object) -> ObjectResult<()> {
        if self.state.is_some() {
            return Err(ObjectError::Stream("header already received".into()));
        }
        let first_chunk = std::mem::take(&mut object.payload);
        let declared = object.header.payload_size;

        if first_chunk.len() as u64 > declared {
            return Err(ObjectError::WrongPayloadSize {
                declared,
                written: first_chunk.len() as u64,
            });
        }
        if declared > self.max_payload_size {
            return Err(ObjectError::ExceedingMaxSize {
                size: declared,
                max: self.max_payload_size,
            });
        }

        let checksum = object
            .header
            .payload_checksum
            .as_ref()
            .ok_or(ObjectError::UnsupportedChecksum(0))?;
        let kind = checksum
            .kind()
            .map_err(|_| ObjectError::UnsupportedChecksum(checksum.tag))?;
        let expected = checksum.sum.clone();

        self.validator.validate(&object)?;

        let tombstone = (object.header.object_type == ObjectType::Tombstone).then(Vec::new);
        let address = object.address();
        self.next.begin(object)?;
        self.state = Some(Progress {
            address,
            hasher: ChecksumEngine::new(kind),
            expected,
            declared,
            written: 0,
            tombstone,
        });
        debug!(%address, declared, checksum = %kind, "validated header");

        if !first_chunk.is_empty() {
            self.append(&first_chunk)?;
        }
        Ok(())
    }

    fn append(&mut self, chunk: &[u8]) -> ObjectResult<usize> {
        let progress = self
            .state
            .as_mut()
            .ok_or_else(|| ObjectError::Stream("payload before header".into()))?;
        let len = chunk.len() as u64;
        match progress.written.checked_add(len) {
            Some(total) if total <= progress.declared => {}
            _ => {
                return Err(ObjectError::WrongPayloadSize {
                    declared: progress.declared,
                    written: progress.written.saturating_add(len),
                })
            }
        }

        progress.hasher.update(chunk);
        if let Some(buf) = &mut progress.tombstone {
            buf.extend_from_slice(chunk);
        }
        let n = self.next.append(chunk)?;
        progress.written += n as u64;
        Ok(n)
    }

    fn finalize(&mut self) -> ObjectResult<ObjectId> {
        let mut progress = self
            .state
            .take()
            .ok_or_else(|| ObjectError::Stream("finalize before header".into()))?;

        if progress.written != progress.declared {
            return Err(ObjectError::WrongPayloadSize {
                declared: progress.declared,
                written: progress.written,
            });
        }
        let computed = progress.hasher.finalize_reset();
        if computed != progress.expected {
            return Err(ObjectError::ChecksumMismatch {
                expected: hex::encode(&progress.expected),
                computed: hex::encode(&computed),
            });
        }

        let tombstone = match &progress.tombstone {
            Some(payload) => Some(self.validator.decode_tombstone(payload)?),
            None => None,
        };

        let id = self.next.finalize()?;
        // The tombstone is stored at this point; a failed inhume must not
        // turn the put into an error.
        if let Some(tombstone) = tombstone {
            if let Err(e) = self.validator.on_tombstone_stored(&progress.address, &tombstone) {
                warn!(tombstone = %progress.address, error = %e, "could not inhume tombstone members");
            }
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::LocalTarget;
    use silo_container::{Container, InMemoryContainers};
    use silo_crypto::{digest, SigningKey};
    use crate::format::DeleteHandler;
    use silo_store::{Header, InMemoryEngine, StorageEngine, Tombstone};
    use silo_types::{Checksum, ChecksumType, ContainerId, Epoch};

    struct Fixture {
        key: SigningKey,
        cid: ContainerId,
        engine: Arc<InMemoryEngine>,
        validator: Arc<FormatValidator>,
    }

    fn fixture() -> Fixture {
        let key = SigningKey::generate();
        let containers = Arc::new(InMemoryContainers::new());
        let cid = containers
            .put(Container::new(key.verifying_key().to_owner_id()))
            .unwrap();
        Fixture {
            key,
            cid,
            engine: Arc::new(InMemoryEngine::new()),
            validator: Arc::new(FormatValidator::new(containers)),
        }
    }

    fn target(f: &Fixture, max: u64) -> ValidatingTarget<LocalTarget> {
        ValidatingTarget::new(LocalTarget::new(f.engine.clone()), f.validator.clone(), max)
    }

    fn object(f: &Fixture, declared: u64, checksum: Option<Checksum>, first: &[u8]) -> Object {
        let mut header = Header::new(f.cid, f.key.verifying_key().to_owner_id());
        header.payload_size = declared;
        header.payload_checksum = checksum;
        Object::signed(header, first.to_vec(), &f.key).unwrap()
    }

    fn sha(data: &[u8]) -> Option<Checksum> {
        Some(Checksum::new(ChecksumType::Sha256, digest(ChecksumType::Sha256, data)))
    }

    #[test]
    fn first_chunk_longer_than_declared() {
        let f = fixture();
        let err = target(&f, 1024)
            .begin(object(&f, 2, sha(b"abc"), b"abc"))
            .unwrap_err();
        assert!(matches!(err, ObjectError::WrongPayloadSize { declared: 2, written: 3 }));
    }

    #[test]
    fn declared_size_over_limit() {
        let f = fixture();
        let err = target(&f, 4).begin(object(&f, 5, sha(b""), b"")).unwrap_err();
        assert!(matches!(err, ObjectError::ExceedingMaxSize { size: 5, max: 4 }));
    }

    #[test]
    fn declared_size_at_limit_accepted() {
        let f = fixture();
        let mut t = target(&f, 4);
        t.begin(object(&f, 4, sha(b"abcd"), b"ab")).unwrap();
        t.append(b"cd").unwrap();
        t.finalize().unwrap();
    }

    #[test]
    fn unknown_or_missing_checksum() {
        let f = fixture();
        let bogus = Some(Checksum { tag: 0, sum: vec![] });
        let err = target(&f, 1024).begin(object(&f, 0, bogus, b"")).unwrap_err();
        assert!(matches!(err, ObjectError::UnsupportedChecksum(0)));

        let err = target(&f, 1024).begin(object(&f, 0, None, b"")).unwrap_err();
        assert!(matches!(err, ObjectError::UnsupportedChecksum(0)));

        let other = Some(Checksum { tag: 42, sum: vec![] });
        let err = target(&f, 1024).begin(object(&f, 0, other, b"")).unwrap_err();
        assert!(matches!(err, ObjectError::UnsupportedChecksum(42)));
    }

    #[test]
    fn overrun_on_final_chunk_is_refused_before_forwarding() {
        let f = fixture();
        let mut t = target(&f, 1024);
        t.begin(object(&f, 4, sha(b"abcd"), b"")).unwrap();
        t.append(b"abc").unwrap();
        let err = t.append(b"de").unwrap_err();
        assert!(matches!(err, ObjectError::WrongPayloadSize { declared: 4, written: 5 }));
        assert_eq!(t.written(), 3);
        assert_eq!(t.next.buffered(), 3);
    }

    #[test]
    fn under_delivery_fails_finalize() {
        let f = fixture();
        let mut t = target(&f, 1024);
        t.begin(object(&f, 4, sha(b"abcd"), b"ab")).unwrap();
        let err = t.finalize().unwrap_err();
        assert!(matches!(err, ObjectError::WrongPayloadSize { declared: 4, written: 2 }));
        assert!(f.engine.is_empty());
    }

    #[test]
    fn checksum_mismatch_stores_nothing() {
        let f = fixture();
        let mut t = target(&f, 1024);
        t.begin(object(&f, 4, sha(b"abcd"), b"")).unwrap();
        t.append(b"abcx").unwrap();
        assert!(matches!(t.finalize(), Err(ObjectError::ChecksumMismatch { .. })));
        assert!(f.engine.is_empty());
    }

    #[test]
    fn tillich_zemor_checksum_verified() {
        let f = fixture();
        let tz = Some(Checksum::new(
            ChecksumType::TillichZemor,
            digest(ChecksumType::TillichZemor, b"payload"),
        ));
        let obj = object(&f, 7, tz, b"pay");
        let addr = obj.address();
        let mut t = target(&f, 1024);
        t.begin(obj).unwrap();
        t.append(b"load").unwrap();
        t.finalize().unwrap();
        assert_eq!(f.engine.get(&addr).unwrap().payload, b"payload");
    }

    struct FailingDeletes;

    impl DeleteHandler for FailingDeletes {
        fn delete_objects(&self, _tombstone: &Address, _members: &[Address]) -> ObjectResult<()> {
            Err(ObjectError::Stream("inhume unavailable".into()))
        }
    }

    #[test]
    fn tombstone_stored_when_inhume_fails() {
        let mut f = fixture();
        let containers = Arc::new(InMemoryContainers::new());
        f.cid = containers
            .put(Container::new(f.key.verifying_key().to_owner_id()))
            .unwrap();
        f.validator = Arc::new(
            FormatValidator::new(containers).with_delete_handler(Arc::new(FailingDeletes)),
        );

        let payload = Tombstone::new(vec![ObjectId::from_hash([4; 32])], Epoch::new(9))
            .encode()
            .unwrap();
        let mut header = Header::new(f.cid, f.key.verifying_key().to_owner_id());
        header.object_type = ObjectType::Tombstone;
        header.payload_size = payload.len() as u64;
        header.payload_checksum = sha(&payload);
        let obj = Object::signed(header, payload.clone(), &f.key).unwrap();
        let addr = obj.address();

        let mut t = target(&f, 1024);
        t.begin(obj).unwrap();
        assert_eq!(t.finalize().unwrap(), addr.object);
        assert_eq!(f.engine.get(&addr).unwrap().payload, payload);
    }

    #[test]
    fn chunk_before_header_rejected() {
        let f = fixture();
        let mut t = target(&f, 1024);
        assert!(matches!(t.append(b"x"), Err(ObjectError::Stream(_))));
    }
}
