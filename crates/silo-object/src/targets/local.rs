use std::sync::Arc;

use silo_store::{Object, StorageEngine};
use silo_types::ObjectId;
use tracing::info;

use crate::error::{ObjectError, ObjectResult};
use crate::target::ObjectTarget;

/// Sink stage: accumulates the payload and stores the object on finalize.
///
/// Payload may arrive before the header; bytes carried by the object given
/// to `begin` are appended at the point `begin` is called. Nothing reaches
/// the engine until `finalize`, so dropping the target discards the write.
pub struct LocalTarget {
    engine: Arc<dyn StorageEngine>,
    object: Option<Object>,
    payload: Vec<u8>,
}

impl LocalTarget {
    pub fn new(engine: Arc<dyn StorageEngine>) -> Self {
        Self {
            engine,
            object: None,
            payload: Vec::new(),
        }
    }

    /// Bytes buffered so far.
    pub fn buffered(&self) -> usize {
        self.payload.len()
    }
}

impl ObjectTarget for LocalTarget {
    fn begin(&mut self, mut object: Object) -> ObjectResult<()> {
        self.payload.append(&mut object.payload);
        self.object = Some(object);
        Ok(())
    }

    fn append(&mut self, chunk: &[u8]) -> ObjectResult<usize> {
        self.payload.extend_from_slice(chunk);
        Ok(chunk.len())
    }

    fn finalize(&mut self) -> ObjectResult<ObjectId> {
        let mut object = self
            .object
            .take()
            .ok_or_else(|| ObjectError::Stream("finalize before header".into()))?;
        object.payload = std::mem::take(&mut self.payload);

        let address = object.address();
        self.engine
            .put(&object)
            .map_err(ObjectError::storage("put"))?;
        info!(%address, bytes = object.payload.len(), "object stored");
        Ok(object.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silo_crypto::SigningKey;
    use silo_store::{Header, InMemoryEngine};
    use silo_types::ContainerId;

    fn object(payload: &[u8]) -> Object {
        let key = SigningKey::generate();
        let header = Header::new(ContainerId::from_hash([1; 32]), key.verifying_key().to_owner_id());
        Object::signed(header, payload.to_vec(), &key).unwrap()
    }

    #[test]
    fn header_then_chunks() {
        let engine = Arc::new(InMemoryEngine::new());
        let mut target = LocalTarget::new(engine.clone());
        let obj = object(b"ab");
        target.begin(obj.clone()).unwrap();
        assert_eq!(target.append(b"cd").unwrap(), 2);
        let id = target.finalize().unwrap();
        assert_eq!(id, obj.id);
        assert_eq!(engine.get(&obj.address()).unwrap().payload, b"abcd");
    }

    #[test]
    fn chunks_then_header() {
        let engine = Arc::new(InMemoryEngine::new());
        let mut target = LocalTarget::new(engine.clone());
        target.append(b"early").unwrap();
        assert_eq!(target.buffered(), 5);
        let obj = object(b"");
        target.begin(obj.clone()).unwrap();
        target.finalize().unwrap();
        assert_eq!(engine.get(&obj.address()).unwrap().payload, b"early");
    }

    #[test]
    fn finalize_without_header_fails() {
        let engine = Arc::new(InMemoryEngine::new());
        let mut target = LocalTarget::new(engine.clone());
        target.append(b"x").unwrap();
        assert!(matches!(target.finalize(), Err(ObjectError::Stream(_))));
        assert!(engine.is_empty());
    }

    #[test]
    fn dropped_target_stores_nothing() {
        let engine = Arc::new(InMemoryEngine::new());
        {
            let mut target = LocalTarget::new(engine.clone());
            target.begin(object(b"abc")).unwrap();
            target.append(b"def").unwrap();
        }
        assert!(engine.is_empty());
    }
}
