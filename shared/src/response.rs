//! API Response types
//!
//! Envelope used by the backend's mutation endpoints. List endpoints return
//! looser shapes; those go through the client's normalization boundary
//! instead of deserializing into this type directly.

use serde::{Deserialize, Serialize};

/// Standard mutation response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            message: None,
            data: Some(data),
        }
    }
}
