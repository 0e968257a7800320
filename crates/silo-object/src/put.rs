use silo_store::Object;
use silo_types::{ObjectId, SessionToken};
use tracing::{debug, warn};

use crate::error::{ObjectError, ObjectResult};
use crate::service::ObjectService;
use crate::target::{ObjectTarget, WriteChain};

enum PutState {
    AwaitingHeader,
    Streaming(WriteChain),
    Closed,
    Failed,
}

/// Per-call state of a client-streaming write.
///
/// The first part must be the header (`init`); the chain is chosen then.
/// Payload chunks are forwarded through the chain as they arrive. Any
/// error is terminal. Dropping the stream before `close` discards the
/// buffered payload without touching the storage engine.
pub struct PutStream {
    service: ObjectService,
    state: PutState,
}

impl PutStream {
    pub(crate) fn new(service: ObjectService) -> Self {
        Self {
            service,
            state: PutState::AwaitingHeader,
        }
    }

    /// Header part: object id, header, signature and an optional first
    /// chunk in `object.payload`, plus the session token from the request
    /// envelope.
    pub fn init(&mut self, object: Object, session: Option<SessionToken>) -> ObjectResult<()> {
        match std::mem::replace(&mut self.state, PutState::Failed) {
            PutState::AwaitingHeader => {}
            PutState::Streaming(_) => return Err(self.fail(ObjectError::Stream("duplicate header part".into()))),
            PutState::Closed | PutState::Failed => {
                return Err(ObjectError::Stream("stream is finished".into()))
            }
        }

        let address = object.address();
        let mut chain = match self.service.open_chain(&object, session.as_ref()) {
            Ok(chain) => chain,
            Err(e) => return Err(self.fail(e)),
        };
        debug!(%address, chain = chain.name(), "put stream initialised");
        if let Err(e) = chain.begin(object) {
            return Err(self.fail(e));
        }
        self.state = PutState::Streaming(chain);
        Ok(())
    }

    /// Payload chunk part.
    pub fn chunk(&mut self, data: &[u8]) -> ObjectResult<()> {
        let result = match &mut self.state {
            PutState::Streaming(chain) => chain.append(data).map(|_| ()),
            PutState::AwaitingHeader => Err(ObjectError::Stream("chunk before header part".into())),
            PutState::Closed | PutState::Failed => {
                return Err(ObjectError::Stream("stream is finished".into()))
            }
        };
        result.map_err(|e| self.fail(e))
    }

    /// Complete the write. Exactly one storage `put` happens here on
    /// success.
    pub fn close(&mut self) -> ObjectResult<ObjectId> {
        match std::mem::replace(&mut self.state, PutState::Closed) {
            PutState::Streaming(mut chain) => chain.finalize().map_err(|e| self.fail(e)),
            PutState::AwaitingHeader => Err(self.fail(ObjectError::Stream("no header part received".into()))),
            PutState::Closed | PutState::Failed => {
                self.state = PutState::Failed;
                Err(ObjectError::Stream("stream is finished".into()))
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, PutState::Closed | PutState::Failed)
    }

    fn fail(&mut self, err: ObjectError) -> ObjectError {
        warn!(error = %err, code = err.code(), "put rejected");
        self.state = PutState::Failed;
        err
    }
}

impl std::fmt::Debug for PutStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            PutState::AwaitingHeader => "awaiting-header",
            PutState::Streaming(chain) => chain.name(),
            PutState::Closed => "closed",
            PutState::Failed => "failed",
        };
        f.debug_struct("PutStream").field("state", &state).finish()
    }
}
