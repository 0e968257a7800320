//! The [`Container`] description and its identity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use silo_crypto::ContentHasher;
use silo_types::{ContainerId, OwnerId};
use uuid::Uuid;

use crate::error::{ContainerError, Result};

/// Attribute keys starting with this prefix are reserved for the node.
pub const RESERVED_PREFIX: &str = "__SILO__";

/// A container: the namespace objects are stored into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub owner: OwnerId,
    /// Basic access-control bit mask. Stored but not enforced by the gate.
    pub basic_acl: u32,
    pub attributes: BTreeMap<String, String>,
    /// Random nonce so equal descriptions yield distinct containers.
    pub nonce: Uuid,
}

impl Container {
    pub fn new(owner: OwnerId) -> Self {
        Self {
            owner,
            basic_acl: 0,
            attributes: BTreeMap::new(),
            nonce: Uuid::now_v7(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Content-derived container id.
    pub fn id(&self) -> Result<ContainerId> {
        let bytes =
            serde_json::to_vec(self).map_err(|e| ContainerError::Serialization(e.to_string()))?;
        Ok(ContentHasher::CONTAINER.container_id(&bytes))
    }

    /// Check attribute keys before registration.
    pub fn validate(&self) -> Result<()> {
        for key in self.attributes.keys() {
            if key.is_empty() {
                return Err(ContainerError::InvalidAttribute {
                    key: key.clone(),
                    reason: "key is empty".into(),
                });
            }
            if key.starts_with(RESERVED_PREFIX) {
                return Err(ContainerError::InvalidAttribute {
                    key: key.clone(),
                    reason: format!("prefix {RESERVED_PREFIX} is reserved"),
                });
            }
        }
        Ok(())
    }
}
