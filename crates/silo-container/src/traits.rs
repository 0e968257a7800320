//! The [`ContainerSource`] trait consulted by the container gate.

use silo_types::ContainerId;

use crate::error::Result;
use crate::types::Container;

/// Read access to known containers.
///
/// Every object operation passes through this gate before touching storage.
pub trait ContainerSource: Send + Sync {
    /// Look up a container. Returns `Ok(None)` if it is not registered.
    fn get(&self, id: &ContainerId) -> Result<Option<Container>>;

    /// Whether the container is registered.
    fn exists(&self, id: &ContainerId) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }
}
