//! The backend's response envelope.
//!
//! Every endpoint answers `{"EC": "0", "EM": "...", "DT": ...}`: `EC` is the
//! result code (`"0"` on success), `EM` a human message, `DT` the payload.

use crate::FetchError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Result code of a successful call.
pub const SUCCESS_CODE: &str = "0";

/// Decoded `{EC, EM, DT}` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(rename = "EC", deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(rename = "EM", default)]
    pub message: String,
    #[serde(rename = "DT", default)]
    pub data: Option<T>,
}

// Some endpoints send EC as a number.
fn code_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unexpected EC value: {}",
            other
        ))),
    }
}

impl<T> ApiEnvelope<T> {
    /// Check if `EC` is the success code.
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Payload of a successful envelope, which may be absent.
    pub fn into_result(self) -> Result<Option<T>, FetchError> {
        if self.is_success() {
            Ok(self.data)
        } else {
            Err(FetchError::ApiError {
                code: self.code,
                message: self.message,
            })
        }
    }

    /// Payload of a successful envelope, which must be present.
    pub fn into_data(self) -> Result<T, FetchError> {
        self.into_result()?
            .ok_or_else(|| FetchError::ParseError("missing DT payload".to_string()))
    }
}

impl<T: DeserializeOwned> ApiEnvelope<T> {
    /// Parse an envelope from a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, FetchError> {
        serde_json::from_slice(body).map_err(|e| FetchError::ParseError(e.to_string()))
    }
}
