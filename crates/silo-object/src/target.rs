use std::sync::Arc;

use silo_store::{Object, StorageEngine};
use silo_session::PrivateToken;
use silo_types::{EpochSource, ObjectId};

use crate::error::ObjectResult;
use crate::format::FormatValidator;
use crate::targets::{FormatTarget, LocalTarget, PayloadSizeLimiter, ValidatingTarget};

/// One stage of an object write.
///
/// Stages compose by owning the next stage. A target is driven by exactly
/// one stream: `begin` once, `append` any number of times, `finalize`
/// once. After an error the target must not be driven further.
pub trait ObjectTarget: Send {
    /// Accept the object header. `object.payload` may carry a first chunk.
    fn begin(&mut self, object: Object) -> ObjectResult<()>;

    /// Accept a payload chunk and return how many bytes were taken.
    fn append(&mut self, chunk: &[u8]) -> ObjectResult<usize>;

    /// Complete the write and return the object id.
    fn finalize(&mut self) -> ObjectResult<ObjectId>;
}

/// The two write chain shapes a put stream can run.
pub enum WriteChain {
    /// Client-signed object: validator → local store.
    Validation(ValidatingTarget<LocalTarget>),
    /// Session-delegated object: size limiter → node signer → local store.
    Delegated(PayloadSizeLimiter<FormatTarget<LocalTarget>>),
}

impl WriteChain {
    pub fn validation(
        engine: Arc<dyn StorageEngine>,
        validator: Arc<FormatValidator>,
        max_payload_size: u64,
    ) -> Self {
        Self::Validation(ValidatingTarget::new(
            LocalTarget::new(engine),
            validator,
            max_payload_size,
        ))
    }

    /// The delegated chain trusts the chunking: its limiter is unbounded.
    pub fn delegated(
        engine: Arc<dyn StorageEngine>,
        session: PrivateToken,
        epochs: Arc<dyn EpochSource>,
        homomorphic_hashing: bool,
    ) -> Self {
        let format = FormatTarget::new(LocalTarget::new(engine), session, epochs)
            .with_homomorphic_hash(homomorphic_hashing);
        Self::Delegated(PayloadSizeLimiter::new(format, u64::MAX))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Delegated(_) => "delegated",
        }
    }
}

impl ObjectTarget for WriteChain {
    fn begin(&mut self, object: Object) -> ObjectResult<()> {
        match self {
            Self::Validation(t) => t.begin(object),
            Self::Delegated(t) => t.begin(object),
        }
    }

    fn append(&mut self, chunk: &[u8]) -> ObjectResult<usize> {
        match self {
            Self::Validation(t) => t.append(chunk),
            Self::Delegated(t) => t.append(chunk),
        }
    }

    fn finalize(&mut self) -> ObjectResult<ObjectId> {
        match self {
            Self::Validation(t) => t.finalize(),
            Self::Delegated(t) => t.finalize(),
        }
    }
}

impl std::fmt::Debug for WriteChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WriteChain({})", self.name())
    }
}
