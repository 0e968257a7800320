use std::sync::Arc;

use silo_container::ContainerSource;
use silo_session::{SessionAuthorizer, SessionRegistry};
use silo_store::{HeaderView, Object, SearchFilter, StorageEngine};
use silo_types::{Address, ContainerId, EpochSource, ObjectId, Range, SessionToken};
use tracing::debug;

use crate::config::ObjectConfig;
use crate::error::{ObjectError, ObjectResult};
use crate::format::{EngineDeleteHandler, FormatValidator};
use crate::put::PutStream;
use crate::range::RangeHasher;
use crate::read::{GetResponseStream, PayloadChunks, RangeResponseStream};
use crate::target::WriteChain;

/// The object service of a node.
///
/// Cheap to clone; every clone shares the same engine, registries and
/// epoch source. Each operation passes the container gate before it
/// touches storage.
#[derive(Clone)]
pub struct ObjectService {
    config: ObjectConfig,
    engine: Arc<dyn StorageEngine>,
    validator: Arc<FormatValidator>,
    authorizer: SessionAuthorizer,
    epochs: Arc<dyn EpochSource>,
}

impl ObjectService {
    pub fn new(
        config: ObjectConfig,
        engine: Arc<dyn StorageEngine>,
        containers: Arc<dyn ContainerSource>,
        sessions: Arc<dyn SessionRegistry>,
        epochs: Arc<dyn EpochSource>,
    ) -> Self {
        let authorizer = SessionAuthorizer::new(sessions, epochs.clone());
        let validator = FormatValidator::new(containers)
            .with_session_authorizer(authorizer.clone())
            .with_delete_handler(Arc::new(EngineDeleteHandler::new(engine.clone())));
        Self {
            config,
            engine,
            validator: Arc::new(validator),
            authorizer,
            epochs,
        }
    }

    pub fn config(&self) -> &ObjectConfig {
        &self.config
    }

    /// Open a client-streaming write.
    pub fn put(&self) -> PutStream {
        PutStream::new(self.clone())
    }

    /// Pick the write chain for an object whose header just arrived.
    ///
    /// A signed object runs the validation chain. An unsigned object needs
    /// a live session for its owner and runs the delegated chain. Anything
    /// else is refused before payload is accepted.
    pub(crate) fn open_chain(
        &self,
        object: &Object,
        session: Option<&SessionToken>,
    ) -> ObjectResult<WriteChain> {
        let header = &object.header;
        self.validator.check_container(&header.container)?;

        if object.signature.is_some() {
            return Ok(WriteChain::validation(
                self.engine.clone(),
                self.validator.clone(),
                self.config.max_payload_size,
            ));
        }

        let Some(token) = session else {
            return Err(ObjectError::Unauthorized(
                "object carries neither a signature nor a session token".into(),
            ));
        };
        if header.owner.is_null() {
            return Err(ObjectError::FormatInvalid("missing owner".into()));
        }
        let private = self.authorizer.authorize(&header.owner, &token.id)?;
        debug!(session = %token.id, owner = %header.owner.short_id(), "delegated write authorized");
        Ok(WriteChain::delegated(
            self.engine.clone(),
            private,
            self.epochs.clone(),
            self.config.homomorphic_hashing,
        ))
    }

    /// Stream an object: header first, then payload chunks.
    pub async fn get<S>(&self, address: &Address, sink: &mut S) -> ObjectResult<()>
    where
        S: GetResponseStream + ?Sized,
    {
        self.validator.check_container(&address.container)?;
        let object = self.engine.get(address).map_err(ObjectError::storage("get"))?;
        debug!(%address, bytes = object.payload.len(), "streaming object");

        sink.send_header(object.header_view()).await?;
        for chunk in PayloadChunks::new(&object.payload, self.config.chunk_size) {
            sink.send_chunk(chunk.to_vec()).await?;
        }
        Ok(())
    }

    /// Stream a byte range of a payload.
    pub async fn get_range<S>(&self, address: &Address, range: Range, sink: &mut S) -> ObjectResult<()>
    where
        S: RangeResponseStream + ?Sized,
    {
        self.validator.check_container(&address.container)?;
        let data = self
            .engine
            .get_range(address, range)
            .map_err(ObjectError::storage("get range"))?;
        debug!(%address, %range, "streaming range");

        for chunk in PayloadChunks::new(&data, self.config.chunk_size) {
            sink.send_chunk(chunk.to_vec()).await?;
        }
        Ok(())
    }

    /// Header of a stored object. With `raw` set, removed objects are
    /// still returned.
    pub fn head(&self, address: &Address, raw: bool) -> ObjectResult<HeaderView> {
        self.validator.check_container(&address.container)?;
        self.engine
            .head(address, raw)
            .map_err(ObjectError::storage("head"))
    }

    /// Ids of live objects in `container` matching all filters.
    pub fn search(&self, container: &ContainerId, filters: &[SearchFilter]) -> ObjectResult<Vec<ObjectId>> {
        self.validator.check_container(container)?;
        self.engine
            .select(container, filters)
            .map_err(ObjectError::storage("select"))
    }

    /// Salted digests over ranges of a stored payload, loaded once.
    pub fn range_hash(
        &self,
        address: &Address,
        checksum_tag: u32,
        salt: &[u8],
        ranges: &[Range],
    ) -> ObjectResult<Vec<Vec<u8>>> {
        self.validator.check_container(&address.container)?;
        let mut hasher = RangeHasher::from_tag(checksum_tag)?;
        let object = self.engine.get(address).map_err(ObjectError::storage("get"))?;
        let digests = hasher.hash_ranges(&object.payload, ranges, salt)?;
        debug!(%address, ranges = ranges.len(), checksum = %hasher.kind(), "range hashes computed");
        Ok(digests)
    }
}

impl std::fmt::Debug for ObjectService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectService")
            .field("config", &self.config)
            .finish()
    }
}
