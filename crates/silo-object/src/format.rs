use std::sync::Arc;

use silo_container::ContainerSource;
use silo_session::SessionAuthorizer;
use silo_store::{Header, Object, ObjectSignature, StorageEngine, Tombstone, CURRENT_VERSION};
use silo_types::{Address, ContainerId};
use tracing::{debug, info};

use crate::error::{ObjectError, ObjectResult};

// ---------------------------------------------------------------------------
// DeleteHandler
// ---------------------------------------------------------------------------

/// Hook invoked after a tombstone object has been stored.
pub trait DeleteHandler: Send + Sync {
    fn delete_objects(&self, tombstone: &Address, members: &[Address]) -> ObjectResult<()>;
}

/// [`DeleteHandler`] that inhumes tombstone members in a storage engine.
pub struct EngineDeleteHandler {
    engine: Arc<dyn StorageEngine>,
}

impl EngineDeleteHandler {
    pub fn new(engine: Arc<dyn StorageEngine>) -> Self {
        Self { engine }
    }
}

impl DeleteHandler for EngineDeleteHandler {
    fn delete_objects(&self, tombstone: &Address, members: &[Address]) -> ObjectResult<()> {
        self.engine
            .inhume(tombstone, members)
            .map_err(ObjectError::storage("inhume"))?;
        info!(%tombstone, count = members.len(), "tombstone members inhumed");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FormatValidator
// ---------------------------------------------------------------------------

/// Structural validation of client-signed objects.
///
/// Header checks run before any payload is accepted; tombstone content
/// checks run once the payload is complete. A signature by a session key
/// only counts when the node's session registry holds that key for the
/// header owner and the session has not expired.
pub struct FormatValidator {
    containers: Arc<dyn ContainerSource>,
    sessions: Option<SessionAuthorizer>,
    delete_handler: Option<Arc<dyn DeleteHandler>>,
}

impl FormatValidator {
    pub fn new(containers: Arc<dyn ContainerSource>) -> Self {
        Self {
            containers,
            sessions: None,
            delete_handler: None,
        }
    }

    pub fn with_session_authorizer(mut self, authorizer: SessionAuthorizer) -> Self {
        self.sessions = Some(authorizer);
        self
    }

    pub fn with_delete_handler(mut self, handler: Arc<dyn DeleteHandler>) -> Self {
        self.delete_handler = Some(handler);
        self
    }

    /// Container gate: fail unless the container is registered.
    pub fn check_container(&self, id: &ContainerId) -> ObjectResult<()> {
        if self.containers.exists(id)? {
            Ok(())
        } else {
            Err(ObjectError::ContainerUnknown(*id))
        }
    }

    /// Validate header, identity and signature of `object`.
    pub fn validate(&self, object: &Object) -> ObjectResult<()> {
        let header = &object.header;
        if header.version != CURRENT_VERSION {
            return Err(invalid(format!("unsupported version {}", header.version)));
        }
        if header.owner.is_null() {
            return Err(invalid("missing owner"));
        }
        if header.container.is_null() {
            return Err(invalid("missing container"));
        }
        self.check_container(&header.container)?;

        if object.id.is_null() {
            return Err(invalid("missing object id"));
        }
        let computed = header
            .compute_id()
            .map_err(ObjectError::storage("encode header"))?;
        if computed != object.id {
            return Err(invalid(format!(
                "id {} does not match header ({})",
                object.id.short_hex(),
                computed.short_hex()
            )));
        }

        let signature = object
            .signature
            .as_ref()
            .ok_or_else(|| invalid("missing signature"))?;
        signature
            .verify(&object.id)
            .map_err(|e| invalid(format!("signature: {e}")))?;
        self.check_signer(header, signature)?;

        debug!(id = %object.id.short_hex(), "object format valid");
        Ok(())
    }

    /// The signer must be the owner itself or a live session key the
    /// registry issued to the owner. The token stamped in the header is
    /// only a pointer into the registry.
    fn check_signer(&self, header: &Header, signature: &ObjectSignature) -> ObjectResult<()> {
        if signature.signer() == header.owner {
            return Ok(());
        }
        let stamped = header
            .session
            .as_ref()
            .filter(|token| token.owner == header.owner && token.session_key == signature.key)
            .ok_or_else(|| invalid("signer is neither the owner nor its session key"))?;
        let Some(authorizer) = &self.sessions else {
            return Err(invalid("session-key signatures are not accepted"));
        };

        let private = authorizer.authorize(&header.owner, &stamped.id)?;
        if private.token().session_key != signature.key {
            return Err(ObjectError::SessionNotFound {
                owner: header.owner,
                id: stamped.id,
            });
        }
        Ok(())
    }

    pub fn decode_tombstone(&self, payload: &[u8]) -> ObjectResult<Tombstone> {
        let tombstone =
            Tombstone::decode(payload).map_err(|e| invalid(format!("tombstone payload: {e}")))?;
        if tombstone.members.is_empty() {
            return Err(invalid("tombstone has no members"));
        }
        Ok(tombstone)
    }

    /// Run the delete hook for a stored tombstone.
    pub fn on_tombstone_stored(&self, address: &Address, tombstone: &Tombstone) -> ObjectResult<()> {
        let Some(handler) = &self.delete_handler else {
            return Ok(());
        };
        let members: Vec<Address> = tombstone
            .members
            .iter()
            .map(|id| Address::new(address.container, *id))
            .collect();
        handler.delete_objects(address, &members)
    }
}

fn invalid(reason: impl Into<String>) -> ObjectError {
    ObjectError::FormatInvalid(reason.into())
}
