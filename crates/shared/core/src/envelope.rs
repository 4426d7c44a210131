//! API response envelope
//!
//! Every exchange response is wrapped as
//! `{ "success": bool, "message"?: string, "data"?: <T>, "error"?: { "code": int, "message": string } }`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the exchange
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("API error {code}: {message}")]
pub struct ApiError {
    pub code: i64,
    pub message: String,
}

impl ApiError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Response envelope; `data` stays opaque JSON unless a payload type is given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            error: None,
        }
    }

    /// Failed response carrying an error body
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            data: None,
            error: Some(ApiError::new(code, message)),
        }
    }

    /// Attach a human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Check the success flag, keeping whatever data was sent
    pub fn check(self) -> Result<Option<T>, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .error
                .unwrap_or_else(|| ApiError::new(0, self.message.unwrap_or_default())))
        }
    }

    /// Unwrap the payload; a success without data is an error
    pub fn into_result(self) -> Result<T, ApiError> {
        self.check()?
            .ok_or_else(|| ApiError::new(0, "response marked success but carried no data"))
    }
}
