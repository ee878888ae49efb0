/*
[INPUT]:  Error sources (HTTP, API, serialization, auth, streaming)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Bybit adapter
#[derive(Error, Debug)]
pub enum BybitError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-zero return code
    #[error("API error (code {code}): {message}")]
    Api { code: i64, message: String },

    /// Credentials rejected or missing where required
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Streaming transport error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// API return codes signalling rejected credentials
const AUTH_RET_CODES: &[i64] = &[10003, 10004, 10005];

impl BybitError {
    /// Check if the error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BybitError::Http(_) | BybitError::WebSocket(_) | BybitError::InvalidResponse(_)
        )
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, BybitError::Authentication { .. })
    }

    /// Create an API error from an HTTP status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        BybitError::Api {
            code: status.as_u16() as i64,
            message: message.into(),
        }
    }

    /// Map an envelope return code to the right variant
    pub fn from_ret_code(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if AUTH_RET_CODES.contains(&code) {
            BybitError::Authentication { message }
        } else {
            BybitError::Api { code, message }
        }
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, BybitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_retryable() {
        let ws_err = BybitError::WebSocket("connection reset".to_string());
        assert!(ws_err.is_retryable());

        let auth_err = BybitError::Authentication {
            message: "invalid api_key".to_string(),
        };
        assert!(!auth_err.is_retryable());
    }

    #[test]
    fn test_ret_code_mapping() {
        assert!(BybitError::from_ret_code(10003, "invalid api_key").is_auth_error());
        match BybitError::from_ret_code(10002, "request expired") {
            BybitError::Api { code, message } => {
                assert_eq!(code, 10002);
                assert_eq!(message, "request expired");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_creation() {
        let err = BybitError::api_error(StatusCode::BAD_REQUEST, "Invalid symbol");
        match err {
            BybitError::Api { code, message } => {
                assert_eq!(code, 400);
                assert_eq!(message, "Invalid symbol");
            }
            _ => panic!("Expected Api error variant"),
        }
    }
}
