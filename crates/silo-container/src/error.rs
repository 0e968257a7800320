//! Error types for container operations.

use silo_types::ContainerId;
use thiserror::Error;

/// Errors that can occur during container registry operations.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The container is not registered.
    #[error("container not found: {0}")]
    NotFound(ContainerId),

    /// An attribute key is empty or uses the reserved prefix.
    #[error("invalid container attribute {key:?}: {reason}")]
    InvalidAttribute { key: String, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A registry lock was poisoned by a panicking writer.
    #[error("container registry lock poisoned")]
    LockPoisoned,
}

/// Convenience type alias for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
