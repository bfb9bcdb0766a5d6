//! HTTP client error types.

use dash_commerce::GatewayError;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to send the request or read the response.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// The backend answered with a non-success envelope.
    #[error("API error {code}: {message}")]
    ApiError { code: String, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl FetchError {
    /// Check if the request never produced a usable answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FetchError::RequestError(_)
                | FetchError::InvalidUrl(_)
                | FetchError::HttpError { .. }
                | FetchError::Timeout
        )
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else if e.is_builder() {
            FetchError::InvalidUrl(e.to_string())
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}

impl From<FetchError> for GatewayError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::ApiError { code, message } => GatewayError::Domain { code, message },
            FetchError::ParseError(message) | FetchError::JsonError(message) => {
                GatewayError::InvalidResponse(message)
            }
            other => GatewayError::Transport(other.to_string()),
        }
    }
}
