//! Response envelope

use serde::Serialize;

/// Uniform response envelope
///
/// Every response body, success or failure, carries `success` and
/// `message`; `data` is present only when an operation returns a payload.
#[derive(Serialize)]
pub struct ApiResponse<T = ()> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success envelope with a payload
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse {
    /// Success envelope with no payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}
