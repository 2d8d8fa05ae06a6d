//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local fixture could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::Http(e) if e.is_timeout() => ErrorCode::UpstreamTimeout,
            ClientError::Http(e) if e.is_decode() => ErrorCode::UpstreamInvalidResponse,
            ClientError::Http(_) => ErrorCode::UpstreamUnavailable,
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                ErrorCode::UpstreamInvalidResponse
            }
            ClientError::Unauthorized | ClientError::Forbidden(_) => ErrorCode::UpstreamUnauthorized,
            ClientError::NotFound(_) | ClientError::Validation(_) => ErrorCode::UpstreamRejected,
            ClientError::Internal(_) => ErrorCode::UpstreamUnavailable,
            ClientError::Io(_) => ErrorCode::SnapshotUnavailable,
        };
        AppError::upstream(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_upstream_codes() {
        let err: AppError = ClientError::Unauthorized.into();
        assert_eq!(err.code, ErrorCode::UpstreamUnauthorized);

        let err: AppError = ClientError::NotFound("/api/orders".into()).into();
        assert_eq!(err.code, ErrorCode::UpstreamRejected);
        assert!(err.message.contains("/api/orders"));

        let err: AppError = ClientError::Internal("boom".into()).into();
        assert_eq!(err.code, ErrorCode::UpstreamUnavailable);
    }

    #[test]
    fn test_bad_json_is_invalid_response() {
        let json_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let err: AppError = ClientError::from(json_err).into();
        assert_eq!(err.code, ErrorCode::UpstreamInvalidResponse);
    }
}
