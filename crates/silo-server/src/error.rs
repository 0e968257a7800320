use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use silo_container::ContainerError;
use silo_object::ObjectError;
use silo_protocol::{ErrorResponse, ProtocolError};
use silo_session::SessionError;
use silo_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("container registry: {0}")]
    Container(#[from] ContainerError),

    #[error("session registry: {0}")]
    Session(#[from] SessionError),

    #[error("storage: {0}")]
    Store(#[from] StoreError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Object(e) => match e {
                ObjectError::WrongPayloadSize { .. }
                | ObjectError::ExceedingMaxSize { .. }
                | ObjectError::UnsupportedChecksum(_)
                | ObjectError::ChecksumMismatch { .. }
                | ObjectError::FormatInvalid(_)
                | ObjectError::Stream(_) => StatusCode::BAD_REQUEST,
                ObjectError::RangeOutOfBounds { .. } => StatusCode::RANGE_NOT_SATISFIABLE,
                ObjectError::SessionNotFound { .. }
                | ObjectError::SessionExpired { .. }
                | ObjectError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                ObjectError::ContainerUnknown(_) | ObjectError::NotFound(_) => StatusCode::NOT_FOUND,
                ObjectError::AlreadyRemoved(_) => StatusCode::GONE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Protocol(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Container(ContainerError::InvalidAttribute { .. }) => StatusCode::BAD_REQUEST,
            Self::Container(ContainerError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Container(_)
            | Self::Session(_)
            | Self::Store(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error kind name sent in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Object(e) => e.code(),
            Self::Protocol(_) => "Protocol",
            Self::Container(ContainerError::InvalidAttribute { .. }) => "FormatInvalid",
            Self::Container(ContainerError::NotFound(_)) => "ContainerUnknown",
            Self::BadRequest(_) => "BadRequest",
            Self::NotFound(_) => "NotFound",
            _ => "Internal",
        }
    }

    pub fn to_body(&self) -> ErrorResponse {
        ErrorResponse::new(self.code(), self.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(self.to_body())).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use silo_types::{ContainerId, Range};

    #[test]
    fn object_errors_map_to_status() {
        let err = ServerError::from(ObjectError::ContainerUnknown(ContainerId::null()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "ContainerUnknown");

        let err = ServerError::from(ObjectError::RangeOutOfBounds {
            range: Range::new(0, 10),
            size: 4,
        });
        assert_eq!(err.status_code(), StatusCode::RANGE_NOT_SATISFIABLE);

        let err = ServerError::from(ObjectError::Unauthorized("no signature".into()));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn body_carries_code_and_message() {
        let body = ServerError::BadRequest("bad hex".into()).to_body();
        assert_eq!(body.code, "BadRequest");
        assert!(body.message.contains("bad hex"));
    }
}
