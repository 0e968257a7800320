use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("unsupported checksum type: {0}")]
    UnsupportedChecksum(u32),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
