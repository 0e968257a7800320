use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use silo_object::ObjectConfig;

use crate::error::{ServerError, ServerResult};

/// Full node configuration, loaded from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub server: ServerConfig,
    pub network: NetworkConfig,
    pub storage: StorageConfig,
    pub object: ObjectConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Epoch the node starts at.
    pub epoch: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Fs,
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Fs => "fs",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory of the `fs` backend.
    pub path: Option<PathBuf>,
}

impl NodeConfig {
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> ServerResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.storage.backend == StorageBackend::Fs && self.storage.path.is_none() {
            return Err(ServerError::Config(
                "storage.path is required for the fs backend".into(),
            ));
        }
        self.object
            .validate()
            .map_err(|e| ServerError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = NodeConfig::default();
        assert_eq!(c.server.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(c.storage.backend, StorageBackend::Memory);
        assert_eq!(c.network.epoch, 0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn default_toml_loads_back() {
        let text = NodeConfig::default().to_toml().unwrap();
        assert_eq!(NodeConfig::from_toml(&text).unwrap(), NodeConfig::default());
    }

    #[test]
    fn partial_sections_take_defaults() {
        let c = NodeConfig::from_toml(
            r#"
            [network]
            epoch = 12

            [object]
            chunk_size = 1024
            "#,
        )
        .unwrap();
        assert_eq!(c.network.epoch, 12);
        assert_eq!(c.object.chunk_size, 1024);
        assert_eq!(c.object.max_payload_size, ObjectConfig::default().max_payload_size);
    }

    #[test]
    fn fs_backend_needs_path() {
        let err = NodeConfig::from_toml("[storage]\nbackend = \"fs\"\n").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));

        let c = NodeConfig::from_toml("[storage]\nbackend = \"fs\"\npath = \"/var/lib/silo\"\n")
            .unwrap();
        assert_eq!(c.storage.path, Some(PathBuf::from("/var/lib/silo")));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        assert!(NodeConfig::from_toml("[object]\nchunk_size = 0\n").is_err());
    }
}
