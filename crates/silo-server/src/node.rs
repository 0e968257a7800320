use std::sync::Arc;

use silo_container::InMemoryContainers;
use silo_object::ObjectService;
use silo_session::TokenStore;
use silo_store::{FsEngine, InMemoryEngine, StorageEngine};
use silo_types::{Epoch, NetworkState};
use tracing::info;

use crate::config::{NodeConfig, StorageBackend};
use crate::error::{ServerError, ServerResult};

/// Shared application state behind every handler.
#[derive(Clone)]
pub struct Node {
    pub config: Arc<NodeConfig>,
    pub objects: ObjectService,
    pub containers: Arc<InMemoryContainers>,
    pub sessions: Arc<TokenStore>,
    pub network: Arc<NetworkState>,
}

impl Node {
    pub fn new(config: NodeConfig) -> ServerResult<Self> {
        config.validate()?;

        let engine: Arc<dyn StorageEngine> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(InMemoryEngine::new()),
            StorageBackend::Fs => {
                let path = config.storage.path.clone().ok_or_else(|| {
                    ServerError::Config("storage.path is required for the fs backend".into())
                })?;
                Arc::new(FsEngine::open(path)?)
            }
        };

        let containers = Arc::new(InMemoryContainers::new());
        let sessions = Arc::new(TokenStore::new());
        let network = Arc::new(NetworkState::new(Epoch::new(config.network.epoch)));
        let objects = ObjectService::new(
            config.object.clone(),
            engine,
            containers.clone(),
            sessions.clone(),
            network.clone(),
        );

        info!(
            backend = config.storage.backend.name(),
            epoch = config.network.epoch,
            "node initialised"
        );
        Ok(Self {
            config: Arc::new(config),
            objects,
            containers,
            sessions,
            network,
        })
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("backend", &self.config.storage.backend)
            .field("containers", &self.containers.len())
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use silo_types::EpochSource;

    #[test]
    fn memory_node_starts_at_configured_epoch() {
        let mut config = NodeConfig::default();
        config.network.epoch = 7;
        let node = Node::new(config).unwrap();
        assert_eq!(node.network.current_epoch(), Epoch::new(7));
        assert!(node.containers.is_empty());
    }

    #[test]
    fn fs_node_opens_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = NodeConfig {
            storage: StorageConfig {
                backend: StorageBackend::Fs,
                path: Some(dir.path().join("objects")),
            },
            ..Default::default()
        };
        assert!(Node::new(config).is_ok());
    }
}
