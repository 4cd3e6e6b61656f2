//! Error types for the `/Usuarios` client.

use usuarios_common::ErrorBody;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure: connection, TLS, timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend reported an error through its `{message}` payload.
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// Non-success status without a readable error payload.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Success status but the body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// Client misconfiguration (bad base URL, builder failure).
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Build the error for a non-success response, preferring the backend's
    /// own `message` when the body carries one.
    pub fn from_status_body(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(err) => ApiError::Backend {
                status,
                message: err.message,
            },
            Err(_) => ApiError::Status(status),
        }
    }

    /// The user-facing message reported by the backend, if any. Stores fall
    /// back to their own fixed message when this is `None`.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Backend { message, .. } => Some(message),
            _ => None,
        }
    }

    /// HTTP status of the failed response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            ApiError::Status(status) => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_body_with_message() {
        let err = ApiError::from_status_body(401, br#"{"message":"bad credentials"}"#);
        assert_eq!(err.backend_message(), Some("bad credentials"));
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "bad credentials");
    }

    #[test]
    fn test_from_status_body_without_message() {
        let err = ApiError::from_status_body(500, b"<html>oops</html>");
        assert_eq!(err.backend_message(), None);
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "unexpected status 500");
    }

    #[test]
    fn test_from_status_body_empty() {
        let err = ApiError::from_status_body(404, b"");
        assert!(matches!(err, ApiError::Status(404)));
    }

    #[test]
    fn test_from_status_body_json_without_message_field() {
        let err = ApiError::from_status_body(400, br#"{"detail":"nope"}"#);
        assert!(matches!(err, ApiError::Status(400)));
    }

    #[test]
    fn test_config_has_no_backend_message() {
        let err = ApiError::Config("bad url".to_string());
        assert_eq!(err.backend_message(), None);
        assert_eq!(err.status(), None);
    }
}
