use silo_container::ContainerError;
use silo_session::SessionError;
use silo_store::StoreError;
use silo_types::{Address, ContainerId, Epoch, OwnerId, Range, SessionId};

/// Errors from object operations. Every variant is terminal for the call
/// that produced it.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// Declared and delivered payload sizes disagree.
    #[error("wrong payload size: declared {declared}, written {written}")]
    WrongPayloadSize { declared: u64, written: u64 },

    /// Payload is larger than the node accepts.
    #[error("payload size {size} exceeds limit {max}")]
    ExceedingMaxSize { size: u64, max: u64 },

    /// Checksum algorithm tag is not one the node implements.
    #[error("unsupported checksum type {0}")]
    UnsupportedChecksum(u32),

    /// Computed payload digest differs from the declared one.
    #[error("payload checksum mismatch: declared {expected}, computed {computed}")]
    ChecksumMismatch { expected: String, computed: String },

    /// No private session token for the owner and session id.
    #[error("session {id} not found for owner {owner}")]
    SessionNotFound { owner: OwnerId, id: SessionId },

    /// The session token expired at or before the current epoch.
    #[error("session expired at epoch {expires_at} (current epoch {current})")]
    SessionExpired { expires_at: Epoch, current: Epoch },

    /// Range does not fit in the stored payload.
    #[error("range {range} out of bounds (payload size {size})")]
    RangeOutOfBounds { range: Range, size: u64 },

    /// The container gate refused the request.
    #[error("container not found: {0}")]
    ContainerUnknown(ContainerId),

    /// Structural validation of the object failed.
    #[error("invalid object format: {0}")]
    FormatInvalid(String),

    /// Neither an object signature nor a session token was supplied.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("object not found: {0}")]
    NotFound(Address),

    #[error("object already removed: {0}")]
    AlreadyRemoved(Address),

    /// Parts arrived out of order on a put stream.
    #[error("stream protocol violation: {0}")]
    Stream(String),

    /// A storage engine operation failed.
    #[error("storage {op} failed: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("container lookup failed: {0}")]
    ContainerLookup(#[from] ContainerError),

    #[error("session lookup failed: {0}")]
    SessionLookup(String),

    /// A response sink went away mid-stream.
    #[error("response stream closed: {0}")]
    SinkClosed(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl ObjectError {
    /// Classify a storage failure, keeping the operation name on errors
    /// that have no dedicated variant.
    pub fn storage(op: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| match source {
            StoreError::NotFound(address) => Self::NotFound(address),
            StoreError::AlreadyRemoved(address) => Self::AlreadyRemoved(address),
            StoreError::RangeOutOfBounds { range, size, .. } => {
                Self::RangeOutOfBounds { range, size }
            }
            source => Self::Storage { op, source },
        }
    }

    /// Stable name of the error kind, used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::WrongPayloadSize { .. } => "WrongPayloadSize",
            Self::ExceedingMaxSize { .. } => "ExceedingMaxSize",
            Self::UnsupportedChecksum(_) => "UnsupportedChecksum",
            Self::ChecksumMismatch { .. } => "ChecksumMismatch",
            Self::SessionNotFound { .. } => "SessionNotFound",
            Self::SessionExpired { .. } => "SessionExpired",
            Self::RangeOutOfBounds { .. } => "RangeOutOfBounds",
            Self::ContainerUnknown(_) => "ContainerUnknown",
            Self::FormatInvalid(_) => "FormatInvalid",
            Self::Unauthorized(_) => "Unauthorized",
            Self::NotFound(_) => "NotFound",
            Self::AlreadyRemoved(_) => "AlreadyRemoved",
            Self::Stream(_) => "StreamViolation",
            Self::Storage { .. } => "Storage",
            Self::ContainerLookup(_) | Self::SessionLookup(_) => "Internal",
            Self::SinkClosed(_) => "Cancelled",
            Self::Config(_) => "Config",
        }
    }
}

impl From<SessionError> for ObjectError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound { owner, id } => Self::SessionNotFound { owner, id },
            SessionError::Expired {
                expires_at,
                current,
            } => Self::SessionExpired {
                expires_at,
                current,
            },
            other => Self::SessionLookup(other.to_string()),
        }
    }
}

/// Result alias for object operations.
pub type ObjectResult<T> = Result<T, ObjectError>;

#[cfg(test)]
mod tests {
    use super::*;
    use silo_types::ObjectId;

    fn addr() -> Address {
        Address::new(ContainerId::from_hash([1; 32]), ObjectId::from_hash([2; 32]))
    }

    #[test]
    fn storage_errors_are_classified() {
        let err = ObjectError::storage("get")(StoreError::NotFound(addr()));
        assert!(matches!(err, ObjectError::NotFound(_)));

        let err = ObjectError::storage("get")(StoreError::RangeOutOfBounds {
            address: addr(),
            range: Range::new(5, 10),
            size: 8,
        });
        assert!(matches!(err, ObjectError::RangeOutOfBounds { size: 8, .. }));
    }

    #[test]
    fn io_errors_keep_operation_name() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = ObjectError::storage("put")(StoreError::Io(io));
        assert!(matches!(err, ObjectError::Storage { op: "put", .. }));
        assert!(err.to_string().starts_with("storage put failed"));
    }

    #[test]
    fn session_errors_map_to_taxonomy() {
        let err: ObjectError = SessionError::Expired {
            expires_at: Epoch::new(3),
            current: Epoch::new(3),
        }
        .into();
        assert_eq!(err.code(), "SessionExpired");
    }
}
