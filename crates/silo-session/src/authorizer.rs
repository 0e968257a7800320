use std::sync::Arc;

use silo_types::{EpochSource, OwnerId, SessionId};
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::store::{PrivateToken, SessionRegistry};

/// Resolves the private token for a delegated write and checks its expiry
/// against the current epoch.
#[derive(Clone)]
pub struct SessionAuthorizer {
    registry: Arc<dyn SessionRegistry>,
    epochs: Arc<dyn EpochSource>,
}

impl SessionAuthorizer {
    pub fn new(registry: Arc<dyn SessionRegistry>, epochs: Arc<dyn EpochSource>) -> Self {
        Self { registry, epochs }
    }

    /// A token is usable while `current_epoch < expires_at`.
    pub fn authorize(&self, owner: &OwnerId, id: &SessionId) -> SessionResult<PrivateToken> {
        let token = self
            .registry
            .lookup(owner, id)?
            .ok_or(SessionError::NotFound {
                owner: *owner,
                id: *id,
            })?;
        let current = self.epochs.current_epoch();
        if token.token().is_expired_at(current) {
            debug!(session = %id, expires_at = %token.expires_at(), %current, "session expired");
            return Err(SessionError::Expired {
                expires_at: token.expires_at(),
                current,
            });
        }
        Ok(token)
    }
}

impl std::fmt::Debug for SessionAuthorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthorizer")
            .field("current_epoch", &self.epochs.current_epoch())
            .finish()
    }
}
