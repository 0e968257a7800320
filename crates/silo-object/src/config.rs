use serde::{Deserialize, Serialize};

use crate::error::{ObjectError, ObjectResult};

/// Configuration for the object service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectConfig {
    /// Largest payload a client may declare on the validation path.
    pub max_payload_size: u64,
    /// Largest chunk sent on streamed reads.
    pub chunk_size: usize,
    /// Whether objects signed by the node also carry a Tillich–Zémor hash.
    pub homomorphic_hashing: bool,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            max_payload_size: 64 * 1024 * 1024,
            chunk_size: 4096,
            homomorphic_hashing: true,
        }
    }
}

impl ObjectConfig {
    pub fn validate(&self) -> ObjectResult<()> {
        if self.chunk_size == 0 {
            return Err(ObjectError::Config("chunk_size must be positive".into()));
        }
        if self.max_payload_size == 0 {
            return Err(ObjectError::Config("max_payload_size must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ObjectConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, 4096);
        assert_eq!(config.max_payload_size, 64 * 1024 * 1024);
        assert!(config.homomorphic_hashing);
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let config = ObjectConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ObjectError::Config(_))));
    }
}
