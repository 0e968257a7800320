use std::sync::Arc;

use silo_crypto::ChecksumEngine;
use silo_session::PrivateToken;
use silo_store::{Header, Object, ObjectSignature, CURRENT_VERSION};
use silo_types::{Checksum, ChecksumType, EpochSource, ObjectId};
use tracing::debug;

use crate::error::{ObjectError, ObjectResult};
use crate::target::ObjectTarget;

/// Completes and signs objects on the owner's behalf with a session key.
///
/// The header is held back until `finalize`: only then are the payload
/// size, checksums and creation epoch known, so the next target receives
/// payload chunks first and the sealed header last.
pub struct FormatTarget<T> {
    next: T,
    session: PrivateToken,
    epochs: Arc<dyn EpochSource>,
    header: Option<Header>,
    sha: ChecksumEngine,
    tz: Option<ChecksumEngine>,
    size: u64,
}

impl<T: ObjectTarget> FormatTarget<T> {
    pub fn new(next: T, session: PrivateToken, epochs: Arc<dyn EpochSource>) -> Self {
        Self {
            next,
            session,
            epochs,
            header: None,
            sha: ChecksumEngine::new(ChecksumType::Sha256),
            tz: Some(ChecksumEngine::new(ChecksumType::TillichZemor)),
            size: 0,
        }
    }

    pub fn with_homomorphic_hash(mut self, enabled: bool) -> Self {
        if !enabled {
            self.tz = None;
        }
        self
    }
}

impl<T: ObjectTarget> ObjectTarget for FormatTarget<T> {
    fn begin(&mut self, mut object: Object) -> ObjectResult<()> {
        let first_chunk = std::mem::take(&mut object.payload);
        let mut header = object.header;
        header.version = CURRENT_VERSION;
        header.session = Some(self.session.token().clone());
        self.header = Some(header);

        if !first_chunk.is_empty() {
            self.append(&first_chunk)?;
        }
        Ok(())
    }

    fn append(&mut self, chunk: &[u8]) -> ObjectResult<usize> {
        self.sha.update(chunk);
        if let Some(tz) = &mut self.tz {
            tz.update(chunk);
        }
        let n = self.next.append(chunk)?;
        self.size += n as u64;
        Ok(n)
    }

    fn finalize(&mut self) -> ObjectResult<ObjectId> {
        let mut header = self
            .header
            .take()
            .ok_or_else(|| ObjectError::Stream("finalize before header".into()))?;
        header.creation_epoch = self.epochs.current_epoch();
        header.payload_size = self.size;
        header.payload_checksum = Some(Checksum::new(ChecksumType::Sha256, self.sha.finalize_reset()));
        header.homomorphic_hash = self
            .tz
            .as_mut()
            .map(|tz| Checksum::new(ChecksumType::TillichZemor, tz.finalize_reset()));

        let id = header
            .compute_id()
            .map_err(ObjectError::storage("encode header"))?;
        let signature = ObjectSignature::sign(self.session.signing_key(), &id);
        debug!(id = %id.short_hex(), session = %self.session.token().id, "object signed with session key");

        self.next.begin(Object {
            id,
            header,
            signature: Some(signature),
            payload: Vec::new(),
        })?;
        self.next.finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::LocalTarget;
    use silo_crypto::{digest, SigningKey};
    use silo_store::{InMemoryEngine, StorageEngine};
    use silo_types::{Address, ContainerId, Epoch, NetworkState, SessionId, SessionToken};

    fn session(owner_key: &SigningKey) -> PrivateToken {
        let key = SigningKey::generate();
        let token = SessionToken {
            id: SessionId::new(),
            owner: owner_key.verifying_key().to_owner_id(),
            expires_at: Epoch::new(100),
            session_key: key.verifying_key().as_bytes(),
        };
        PrivateToken::new(token, key)
    }

    #[test]
    fn seals_and_signs_header() {
        let owner = SigningKey::generate();
        let private = session(&owner);
        let engine = Arc::new(InMemoryEngine::new());
        let epochs = Arc::new(NetworkState::new(Epoch::new(12)));
        let mut target = FormatTarget::new(LocalTarget::new(engine.clone()), private.clone(), epochs);

        let cid = ContainerId::from_hash([3; 32]);
        let header = Header::new(cid, owner.verifying_key().to_owner_id());
        target.begin(Object::unsigned(header, b"hello ".to_vec())).unwrap();
        target.append(b"world").unwrap();
        let id = target.finalize().unwrap();

        let stored = engine.get(&Address::new(cid, id)).unwrap();
        assert_eq!(stored.payload, b"hello world");
        let h = &stored.header;
        assert_eq!(h.payload_size, 11);
        assert_eq!(h.creation_epoch, Epoch::new(12));
        assert_eq!(h.session.as_ref(), Some(private.token()));
        assert_eq!(
            h.payload_checksum.as_ref().unwrap().sum,
            digest(ChecksumType::Sha256, b"hello world")
        );
        assert_eq!(
            h.homomorphic_hash.as_ref().unwrap().sum,
            digest(ChecksumType::TillichZemor, b"hello world")
        );
        assert_eq!(h.compute_id().unwrap(), id);

        let sig = stored.signature.unwrap();
        assert_eq!(sig.key, private.token().session_key);
        assert!(sig.verify(&id).is_ok());
    }

    #[test]
    fn homomorphic_hash_can_be_disabled() {
        let owner = SigningKey::generate();
        let engine = Arc::new(InMemoryEngine::new());
        let epochs = Arc::new(NetworkState::new(Epoch::new(1)));
        let mut target = FormatTarget::new(LocalTarget::new(engine.clone()), session(&owner), epochs)
            .with_homomorphic_hash(false);
        let cid = ContainerId::from_hash([3; 32]);
        target
            .begin(Object::unsigned(Header::new(cid, owner.verifying_key().to_owner_id()), vec![1, 2]))
            .unwrap();
        let id = target.finalize().unwrap();
        let stored = engine.head(&Address::new(cid, id), true).unwrap();
        assert!(stored.header.homomorphic_hash.is_none());
        assert!(stored.header.payload_checksum.is_some());
    }
}
