use silo_types::{Address, Range};

/// Errors from storage engine operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object is stored under the address.
    #[error("object not found: {0}")]
    NotFound(Address),

    /// The object was inhumed by a tombstone.
    #[error("object already removed: {0}")]
    AlreadyRemoved(Address),

    /// The requested range does not fit in the stored payload.
    #[error("range {range} out of bounds for {address} (payload size {size})")]
    RangeOutOfBounds {
        address: Address,
        range: Range,
        size: u64,
    },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored bytes failed an integrity check.
    #[error("corrupt object {address}: {reason}")]
    Corrupt { address: Address, reason: String },
}

impl From<bincode::Error> for StoreError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
