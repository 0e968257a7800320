use silo_types::{Epoch, OwnerId, SessionId};

/// Errors from session lookup and authorization.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    /// No private token is registered for the owner and id.
    #[error("session {id} not found for owner {owner}")]
    NotFound { owner: OwnerId, id: SessionId },

    /// The token expired at or before the current epoch.
    #[error("session expired at epoch {expires_at} (current epoch {current})")]
    Expired { expires_at: Epoch, current: Epoch },

    /// A registry lock was poisoned by a panicking writer.
    #[error("session registry lock poisoned")]
    LockPoisoned,
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
