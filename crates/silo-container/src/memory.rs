//! In-memory container registry.
//!
//! [`InMemoryContainers`] stores container descriptions in a `HashMap`
//! protected by a `RwLock`. It is the registry the node serves from and
//! the [`ContainerSource`] its object service consults.

use std::collections::HashMap;
use std::sync::RwLock;

use silo_types::{ContainerId, OwnerId};
use tracing::debug;

use crate::error::{ContainerError, Result};
use crate::traits::ContainerSource;
use crate::types::Container;

#[derive(Debug, Default)]
pub struct InMemoryContainers {
    containers: RwLock<HashMap<ContainerId, Container>>,
}

impl InMemoryContainers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container and return its id. Re-registering the same
    /// description is a no-op.
    pub fn put(&self, container: Container) -> Result<ContainerId> {
        container.validate()?;
        let id = container.id()?;
        let mut map = self
            .containers
            .write()
            .map_err(|_| ContainerError::LockPoisoned)?;
        map.entry(id).or_insert(container);
        debug!(container = %id, "container registered");
        Ok(id)
    }

    /// Ids of containers owned by `owner`, sorted.
    pub fn list(&self, owner: &OwnerId) -> Result<Vec<ContainerId>> {
        let map = self
            .containers
            .read()
            .map_err(|_| ContainerError::LockPoisoned)?;
        let mut ids: Vec<ContainerId> = map
            .iter()
            .filter(|(_, c)| c.owner == *owner)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Remove a container. Returns `true` if it was registered.
    pub fn delete(&self, id: &ContainerId) -> Result<bool> {
        let mut map = self
            .containers
            .write()
            .map_err(|_| ContainerError::LockPoisoned)?;
        let removed = map.remove(id).is_some();
        if removed {
            debug!(container = %id, "container deleted");
        }
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.containers.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContainerSource for InMemoryContainers {
    fn get(&self, id: &ContainerId) -> Result<Option<Container>> {
        let map = self
            .containers
            .read()
            .map_err(|_| ContainerError::LockPoisoned)?;
        Ok(map.get(id).cloned())
    }
}
