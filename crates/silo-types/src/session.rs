use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::epoch::Epoch;
use crate::identity::OwnerId;

/// Identifier of a delegated-signing session (UUID v7).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a new time-ordered session id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public part of a session token.
///
/// This is what a client presents in a request envelope and what the node
/// stamps into objects it signs on the owner's behalf. The private signing
/// key never leaves the node's session registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken {
    pub id: SessionId,
    /// Owner the session acts for.
    pub owner: OwnerId,
    /// First epoch at which the session is no longer usable.
    pub expires_at: Epoch,
    /// Ed25519 public key of the session-scoped signing key.
    pub session_key: [u8; 32],
}

impl SessionToken {
    /// A token is expired once the current epoch reaches its expiry epoch.
    pub fn is_expired_at(&self, current: Epoch) -> bool {
        self.expires_at <= current
    }
}
