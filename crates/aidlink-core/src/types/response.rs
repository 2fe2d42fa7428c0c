//! Response envelope types spoken by the coordination server.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Standard response envelope wrapping every payload-carrying endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The response payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message, usually present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the envelope into the payload.
    ///
    /// A success envelope without a payload and a failure envelope both
    /// become errors; HTTP status mapping happens before the body is
    /// parsed, so a failure here means the server answered 2xx with
    /// `success: false`.
    pub fn into_result(self) -> AppResult<T> {
        if self.success {
            self.data
                .ok_or_else(|| AppError::internal("response envelope is missing its payload"))
        } else {
            let message = self
                .message
                .unwrap_or_else(|| "request rejected by the coordination server".to_string());
            Err(AppError::internal(message))
        }
    }
}

/// Response envelope for endpoints that acknowledge without a payload
/// (deletes, mark-all-read, and similar).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiAck {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiAck {
    /// Convert the acknowledgement into a unit result.
    pub fn into_result(self) -> AppResult<()> {
        if self.success {
            Ok(())
        } else {
            let message = self
                .message
                .unwrap_or_else(|| "request rejected by the coordination server".to_string());
            Err(AppError::internal(message))
        }
    }
}
