use std::collections::HashMap;
use std::sync::RwLock;

use silo_crypto::SigningKey;
use silo_types::{Epoch, OwnerId, SessionId, SessionToken};
use tracing::debug;

use crate::error::{SessionError, SessionResult};

/// A session token together with the private key the node signs with.
#[derive(Clone, Debug)]
pub struct PrivateToken {
    token: SessionToken,
    key: SigningKey,
}

impl PrivateToken {
    pub fn new(token: SessionToken, key: SigningKey) -> Self {
        Self { token, key }
    }

    /// The public part, stamped into headers of objects signed with it.
    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }

    pub fn expires_at(&self) -> Epoch {
        self.token.expires_at
    }
}

/// Lookup of private session tokens by owner and session id.
pub trait SessionRegistry: Send + Sync {
    fn lookup(&self, owner: &OwnerId, id: &SessionId) -> SessionResult<Option<PrivateToken>>;
}

/// In-memory store of private session tokens.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: RwLock<HashMap<(OwnerId, SessionId), PrivateToken>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a fresh session key for `owner` valid until `expires_at`
    /// (exclusive) and return the public token.
    pub fn create(&self, owner: OwnerId, expires_at: Epoch) -> SessionResult<SessionToken> {
        let key = SigningKey::generate();
        let token = SessionToken {
            id: SessionId::new(),
            owner,
            expires_at,
            session_key: key.verifying_key().as_bytes(),
        };
        let mut tokens = self.tokens.write().map_err(|_| SessionError::LockPoisoned)?;
        tokens.insert((owner, token.id), PrivateToken::new(token.clone(), key));
        debug!(session = %token.id, owner = %owner.short_id(), %expires_at, "session created");
        Ok(token)
    }

    pub fn get(&self, owner: &OwnerId, id: &SessionId) -> SessionResult<Option<PrivateToken>> {
        let tokens = self.tokens.read().map_err(|_| SessionError::LockPoisoned)?;
        Ok(tokens.get(&(*owner, *id)).cloned())
    }

    /// Drop every token expired at `epoch`. Returns how many were removed.
    pub fn prune(&self, epoch: Epoch) -> SessionResult<usize> {
        let mut tokens = self.tokens.write().map_err(|_| SessionError::LockPoisoned)?;
        let before = tokens.len();
        tokens.retain(|_, t| !t.token.is_expired_at(epoch));
        let removed = before - tokens.len();
        if removed > 0 {
            debug!(%epoch, removed, "expired sessions pruned");
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.tokens.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionRegistry for TokenStore {
    fn lookup(&self, owner: &OwnerId, id: &SessionId) -> SessionResult<Option<PrivateToken>> {
        self.get(owner, id)
    }
}
